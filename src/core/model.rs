// SocLookup - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// Artifact type
// =============================================================================

/// Kind of indicator an analyst can pivot on.
///
/// Used as the category key for lookup services, history records and
/// batch runs. The serialised form is the lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    Ip,
    Domain,
    Sha256,
    Asn,
    Mail,
}

impl ArtifactType {
    /// Returns all variants in catalog order.
    pub fn all() -> &'static [ArtifactType] {
        &[
            ArtifactType::Ip,
            ArtifactType::Domain,
            ArtifactType::Sha256,
            ArtifactType::Asn,
            ArtifactType::Mail,
        ]
    }

    /// Human-readable label, used in exports and history search.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactType::Ip => "IP",
            ArtifactType::Domain => "Domain",
            ArtifactType::Sha256 => "SHA-256",
            ArtifactType::Asn => "ASN",
            ArtifactType::Mail => "Email",
        }
    }

    /// Stable machine name (matches the serialised form).
    pub fn key(&self) -> &'static str {
        match self {
            ArtifactType::Ip => "ip",
            ArtifactType::Domain => "domain",
            ArtifactType::Sha256 => "sha256",
            ArtifactType::Asn => "asn",
            ArtifactType::Mail => "mail",
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ip" => Ok(ArtifactType::Ip),
            "domain" => Ok(ArtifactType::Domain),
            "sha256" | "sha" | "sha-256" => Ok(ArtifactType::Sha256),
            "asn" => Ok(ArtifactType::Asn),
            "mail" | "email" => Ok(ArtifactType::Mail),
            other => Err(format!(
                "unknown artifact type '{other}' (expected ip, domain, sha256, asn or mail)"
            )),
        }
    }
}

// =============================================================================
// Classification outcome
// =============================================================================

/// Result of classifying a free-form input string.
///
/// `Invalid` and `Empty` are ordinary outcomes, not errors: every caller
/// checks the variant before resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Valid(ArtifactType),
    Invalid(String),
    Empty,
}

impl ClassificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ClassificationOutcome::Valid(_))
    }

    /// The detected type, if the outcome is `Valid`.
    pub fn detected_type(&self) -> Option<ArtifactType> {
        match self {
            ClassificationOutcome::Valid(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The rejection reason, if the outcome is `Invalid`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ClassificationOutcome::Invalid(reason) => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationOutcome::Valid(kind) => write!(f, "{kind}"),
            ClassificationOutcome::Invalid(reason) => write!(f, "invalid: {reason}"),
            ClassificationOutcome::Empty => f.write_str("empty"),
        }
    }
}

// =============================================================================
// Lookup service
// =============================================================================

/// An external threat-intelligence service reachable by URL template.
///
/// Identity is `id`. Only `enabled` changes after construction, and only
/// through `ServiceCatalog`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupService {
    /// Stable identifier, used as the key of the persisted override map.
    pub id: String,

    /// Display name (e.g. "VirusTotal").
    pub name: String,

    /// URL containing the literal `{value}` placeholder exactly once.
    pub url_template: String,

    /// Artifact type this service accepts.
    pub category: ArtifactType,

    /// Whether the service participates in resolution.
    pub enabled: bool,
}

// =============================================================================
// Search record
// =============================================================================

/// One entry of the search history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Unique record identifier.
    pub id: Uuid,

    /// The searched value, as submitted.
    pub value: String,

    /// Artifact type the value was searched as.
    #[serde(rename = "type")]
    pub kind: ArtifactType,

    /// When the search was made (UTC).
    pub timestamp: DateTime<Utc>,
}

impl SearchRecord {
    /// Create a record stamped with the current time.
    pub fn new(value: impl Into<String>, kind: ArtifactType) -> Self {
        Self::with_timestamp(value, kind, Utc::now())
    }

    /// Create a record with an explicit timestamp.
    pub fn with_timestamp(
        value: impl Into<String>,
        kind: ArtifactType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value: value.into(),
            kind,
            timestamp,
        }
    }

    /// Display label of the record's type.
    pub fn display_type(&self) -> &'static str {
        self.kind.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_type_parses_aliases() {
        assert_eq!("IP".parse::<ArtifactType>().unwrap(), ArtifactType::Ip);
        assert_eq!("sha".parse::<ArtifactType>().unwrap(), ArtifactType::Sha256);
        assert_eq!("Email".parse::<ArtifactType>().unwrap(), ArtifactType::Mail);
        assert!("url".parse::<ArtifactType>().is_err());
    }

    #[test]
    fn test_artifact_type_serialises_lowercase() {
        let json = serde_json::to_string(&ArtifactType::Sha256).unwrap();
        assert_eq!(json, "\"sha256\"");
    }

    #[test]
    fn test_outcome_accessors() {
        let valid = ClassificationOutcome::Valid(ArtifactType::Asn);
        assert!(valid.is_valid());
        assert_eq!(valid.detected_type(), Some(ArtifactType::Asn));
        assert_eq!(valid.error_message(), None);

        let invalid = ClassificationOutcome::Invalid("nope".to_string());
        assert!(!invalid.is_valid());
        assert_eq!(invalid.detected_type(), None);
        assert_eq!(invalid.error_message(), Some("nope"));

        assert_eq!(ClassificationOutcome::Empty.to_string(), "empty");
    }

    #[test]
    fn test_search_record_ids_are_unique() {
        let a = SearchRecord::new("8.8.8.8", ArtifactType::Ip);
        let b = SearchRecord::new("8.8.8.8", ArtifactType::Ip);
        assert_ne!(a.id, b.id);
        assert_eq!(a.display_type(), "IP");
    }
}
