// SocLookup - app/state.rs
//
// Application state. Holds the service catalog, the shared search history,
// the browser opener and the batch manager for one process.
// Constructed once at startup and passed by reference; nothing here is a
// global.

use crate::app::batch::{self, BatchManager, BatchRequest};
use crate::core::catalog::ServiceCatalog;
use crate::core::classifier;
use crate::core::dispatch::{self, UrlOpener};
use crate::core::history::HistoryStore;
use crate::core::model::{ArtifactType, ClassificationOutcome, LookupService};
use crate::core::resolver::{self, ServiceFilter};
use crate::core::store::KeyValueStore;
use crate::platform::config::AppConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

/// Result of a single interactive lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// The value was resolved and recorded in history.
    Resolved {
        kind: ArtifactType,
        value: String,
        urls: Vec<Url>,
        opened: usize,
    },

    /// The value did not classify; nothing was recorded.
    Rejected(ClassificationOutcome),
}

/// Top-level application state.
pub struct AppState {
    /// Validated configuration in effect.
    pub config: AppConfig,

    /// Service catalog with user overrides applied.
    pub catalog: ServiceCatalog,

    /// Search history, shared with the batch worker.
    pub history: Arc<Mutex<HistoryStore>>,

    /// Where resolved URLs are sent.
    pub opener: Arc<dyn UrlOpener>,

    /// Background batch lifecycle.
    pub batch: BatchManager,
}

impl AppState {
    /// Load catalog and history from `store`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        opener: Arc<dyn UrlOpener>,
        config: AppConfig,
    ) -> Self {
        let catalog = ServiceCatalog::load(Arc::clone(&store));
        let history = HistoryStore::load(store, config.max_history);

        Self {
            config,
            catalog,
            history: Arc::new(Mutex::new(history)),
            opener,
            batch: BatchManager::new(),
        }
    }

    /// Exclusive access to the history.
    pub fn history(&self) -> MutexGuard<'_, HistoryStore> {
        batch::lock_history(&self.history)
    }

    /// Enabled services, cloned so a worker can own them.
    pub fn enabled_snapshot(&self) -> Vec<LookupService> {
        self.catalog
            .services()
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect()
    }

    /// Classify `input` (unless `forced` names the type), resolve it against
    /// enabled services, optionally open the URLs and record the search.
    ///
    /// A forced type still rejects empty input.
    pub fn lookup(
        &self,
        input: &str,
        forced: Option<ArtifactType>,
        open: bool,
        in_background: bool,
    ) -> LookupResult {
        let value = input.trim();
        let kind = match forced {
            Some(kind) if !value.is_empty() => kind,
            Some(_) => return LookupResult::Rejected(ClassificationOutcome::Empty),
            None => match classifier::classify(value) {
                ClassificationOutcome::Valid(kind) => kind,
                other => {
                    tracing::debug!(outcome = %other, "Lookup rejected");
                    return LookupResult::Rejected(other);
                }
            },
        };

        let urls = resolver::resolve(&self.catalog, kind, value, ServiceFilter::EnabledOnly);
        let opened = if open {
            dispatch::open_all(self.opener.as_ref(), &urls, in_background)
        } else {
            0
        };

        self.history().add_search(value, kind);

        tracing::info!(kind = %kind, urls = urls.len(), opened, "Lookup complete");
        LookupResult::Resolved {
            kind,
            value: value.to_string(),
            urls,
            opened,
        }
    }

    /// Start a batch over the currently enabled services.
    pub fn start_batch(&mut self, request: BatchRequest) {
        let services = self.enabled_snapshot();
        let history = Arc::clone(&self.history);
        let opener = Arc::clone(&self.opener);
        self.batch.start(request, services, history, opener);
    }

    /// Apply a new history bound, evicting if necessary.
    pub fn set_max_history(&mut self, max_size: usize) {
        let mut history = self.history();
        history.set_max_size(max_size);
        let applied = history.max_size();
        drop(history);
        self.config.max_history = applied;
    }
}
