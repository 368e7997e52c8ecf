// SocLookup - core/dispatch.rs
//
// Browser-dispatch port. The core only produces URLs; opening them is the
// host's concern. Callers treat `open` as fire-and-forget: an error is
// logged and never aborts a lookup or a batch.

use crate::util::error::BrowserError;
use url::Url;

/// Hands a resolved URL to a browser (or anything that acts like one).
pub trait UrlOpener: Send + Sync {
    /// Open `url`. With `in_background` the browser should not take focus.
    fn open(&self, url: &Url, in_background: bool) -> Result<(), BrowserError>;
}

/// Open every URL in order, logging failures. Returns how many succeeded.
pub fn open_all(opener: &dyn UrlOpener, urls: &[Url], in_background: bool) -> usize {
    let mut opened = 0;
    for url in urls {
        match opener.open(url, in_background) {
            Ok(()) => opened += 1,
            Err(e) => tracing::warn!(url = %url, error = %e, "Failed to open URL"),
        }
    }
    opened
}
