// SocLookup - platform/browser.rs
//
// Browser launchers implementing the `UrlOpener` port.
//
// Platform behaviour of the system default:
// - **macOS**: `open [-g] <url>`; `-g` keeps the browser in the background.
// - **Windows**: `rundll32 url.dll,FileProtocolHandler <url>`. `cmd /C start`
//   is avoided because it splits URLs on `&`.
// - **Linux/other**: `xdg-open <url>`.
//
// Launchers are spawned detached and never waited on. A configured browser
// command that fails to start falls back to the system default.

use crate::core::dispatch::UrlOpener;
use crate::util::error::BrowserError;
use std::process::{Command, Stdio};
use url::Url;

/// Opens URLs in a real browser.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser {
    /// Optional command line, e.g. `"firefox --new-tab"`. The URL is
    /// appended as the final argument.
    command: Option<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &Url, in_background: bool) -> Result<(), BrowserError> {
        if let Some(ref command) = self.command {
            match open_with_command(command, url) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Configured browser failed; falling back to system default"
                ),
            }
        }
        open_with_system_default(url, in_background)
    }
}

/// Logs URLs instead of opening them. Used for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl UrlOpener for DryRun {
    fn open(&self, url: &Url, in_background: bool) -> Result<(), BrowserError> {
        tracing::debug!(url = %url, in_background, "Dry run: URL not opened");
        Ok(())
    }
}

fn open_with_command(command: &str, url: &Url) -> Result<(), BrowserError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| BrowserError::EmptyCommand {
        url: url.to_string(),
    })?;
    let args: Vec<&str> = parts.collect();

    spawn_detached(program, &args, url)
}

fn open_with_system_default(url: &Url, in_background: bool) -> Result<(), BrowserError> {
    #[cfg(target_os = "macos")]
    {
        let args: &[&str] = if in_background { &["-g"] } else { &[] };
        spawn_detached("open", args, url)
    }
    #[cfg(target_os = "windows")]
    {
        let _ = in_background;
        spawn_detached("rundll32", &["url.dll,FileProtocolHandler"], url)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let _ = in_background;
        spawn_detached("xdg-open", &[], url)
    }
}

fn spawn_detached(program: &str, args: &[&str], url: &Url) -> Result<(), BrowserError> {
    Command::new(program)
        .args(args)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        // Not waited on: the launcher exits quickly and is reaped when the
        // process ends.
        .map(|_child| {
            tracing::trace!(program, url = %url, "Browser launcher spawned");
        })
        .map_err(|source| BrowserError::Launch {
            url: url.to_string(),
            program: program.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_command_is_ignored() {
        let browser = SystemBrowser::new(Some("   ".to_string()));
        assert!(browser.command.is_none());
    }

    #[test]
    fn test_missing_program_reports_launch_error() {
        let url = Url::parse("https://example.org/").unwrap();
        let err = open_with_command("soclookup-no-such-browser-binary --flag", &url).unwrap_err();
        match err {
            BrowserError::Launch { program, .. } => {
                assert_eq!(program, "soclookup-no-such-browser-binary")
            }
            other => panic!("expected Launch error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_command_reports_error() {
        let url = Url::parse("https://example.org/").unwrap();
        assert!(matches!(
            open_with_command("", &url),
            Err(BrowserError::EmptyCommand { .. })
        ));
    }

    #[test]
    fn test_dry_run_always_succeeds() {
        let url = Url::parse("https://example.org/").unwrap();
        assert!(DryRun.open(&url, true).is_ok());
    }
}
