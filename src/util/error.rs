// SocLookup - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors keep their source
// so diagnostic logging can print the full causal chain.
//
// Classification failures are NOT errors: they are ordinary values of
// `ClassificationOutcome` and never appear here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SocLookup operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SocLookupError {
    /// Key/value persistence failed.
    Store(StoreError),

    /// History export failed.
    Export(ExportError),

    /// Handing a URL to the browser failed.
    Browser(BrowserError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SocLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Storage error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Browser(e) => write!(f, "Browser error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SocLookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Browser(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by a key/value store adapter.
///
/// Callers treat these as best-effort: a failed save is logged and the
/// in-memory state stays authoritative for the running process.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: PathBuf, source: io::Error },

    /// A value could not be serialised before saving.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Store I/O error '{}': {source}", path.display())
            }
            Self::Serialize { key, source } => {
                write!(f, "Failed to serialise value for key '{key}': {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for SocLookupError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to history and report export.
#[derive(Debug)]
pub enum ExportError {
    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },

    /// The rendered export was not valid UTF-8.
    Encoding {
        source: std::string::FromUtf8Error,
    },

    /// I/O error writing the export to its destination.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
            Self::Encoding { source } => write!(f, "Export produced invalid UTF-8: {source}"),
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::Encoding { source } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for SocLookupError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Browser errors
// ---------------------------------------------------------------------------

/// Errors raised while handing a URL to a browser process.
#[derive(Debug)]
pub enum BrowserError {
    /// The launcher process could not be spawned.
    Launch {
        url: String,
        program: String,
        source: io::Error,
    },

    /// A configured browser command was empty.
    EmptyCommand { url: String },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch {
                url,
                program,
                source,
            } => write!(f, "Could not launch '{program}' for '{url}': {source}"),
            Self::EmptyCommand { url } => {
                write!(f, "No browser command configured to open '{url}'")
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            Self::EmptyCommand { .. } => None,
        }
    }
}

impl From<BrowserError> for SocLookupError {
    fn from(e: BrowserError) -> Self {
        Self::Browser(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SocLookupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for SocLookup results.
pub type Result<T> = std::result::Result<T, SocLookupError>;
