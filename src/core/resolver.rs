// SocLookup - core/resolver.rs
//
// Turns an artifact value into lookup URLs by substituting it into the
// URL templates of the catalog's services.
// Core layer: pure logic, no I/O.

use crate::core::catalog::ServiceCatalog;
use crate::core::model::{ArtifactType, LookupService};
use crate::util::constants::URL_PLACEHOLDER;
use url::Url;

/// Which services of a category take part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceFilter {
    /// Only services the user has enabled.
    #[default]
    EnabledOnly,
    /// Every service in the category, enabled or not.
    All,
}

/// Resolve `value` against the catalog's services for `kind`.
///
/// Empty input yields an empty list. Templates that produce an invalid URL
/// are skipped, so the result may be shorter than the service count.
/// Output order follows catalog order.
pub fn resolve(
    catalog: &ServiceCatalog,
    kind: ArtifactType,
    value: &str,
    filter: ServiceFilter,
) -> Vec<Url> {
    let services = match filter {
        ServiceFilter::EnabledOnly => catalog.enabled_services(kind),
        ServiceFilter::All => catalog.all_services(kind),
    };
    resolve_with(services, kind, value)
}

/// Resolve `value` against an explicit list of services.
///
/// Services whose category differs from `kind` are ignored.
pub fn resolve_with<'a, I>(services: I, kind: ArtifactType, value: &str) -> Vec<Url>
where
    I: IntoIterator<Item = &'a LookupService>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let normalized = normalize_value(kind, trimmed);

    services
        .into_iter()
        .filter(|service| service.category == kind)
        .filter_map(|service| {
            let candidate = service.url_template.replace(URL_PLACEHOLDER, normalized);
            let url = parse_url(&candidate);
            if url.is_none() {
                tracing::debug!(service = %service.id, "Template produced an invalid URL; skipped");
            }
            url
        })
        .collect()
}

/// Category-specific clean-up applied before substitution.
///
/// ASN values lose a leading case-insensitive "AS" so "AS15169" and
/// "15169" resolve identically; templates add their own prefix. Every other
/// category passes through unchanged.
pub fn normalize_value(kind: ArtifactType, value: &str) -> &str {
    match kind {
        ArtifactType::Asn => {
            let has_prefix = value
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("as"));
            if has_prefix {
                &value[2..]
            } else {
                value
            }
        }
        _ => value,
    }
}

/// Parse a substituted template, rejecting characters that are never
/// legal unescaped in a URL. `Url::parse` alone would silently
/// percent-encode them, hiding input that should not reach a browser.
fn parse_url(candidate: &str) -> Option<Url> {
    const FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

    let clean = candidate
        .chars()
        .all(|c| c.is_ascii_graphic() && !FORBIDDEN.contains(&c));
    if !clean {
        return None;
    }
    Url::parse(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::default_services;
    use crate::core::store::MemoryStore;
    use std::sync::Arc;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::load(Arc::new(MemoryStore::new()))
    }

    fn service(id: &str, template: &str, category: ArtifactType) -> LookupService {
        LookupService {
            id: id.to_string(),
            name: id.to_string(),
            url_template: template.to_string(),
            category,
            enabled: true,
        }
    }

    #[test]
    fn test_empty_input_is_noop() {
        assert!(resolve(&catalog(), ArtifactType::Ip, "   ", ServiceFilter::EnabledOnly).is_empty());
    }

    #[test]
    fn test_ip_urls_follow_enabled_order() {
        let catalog = catalog();
        let urls = resolve(&catalog, ArtifactType::Ip, " 8.8.8.8 ", ServiceFilter::EnabledOnly);
        assert_eq!(urls.len(), catalog.enabled_services(ArtifactType::Ip).len());
        assert_eq!(
            urls[0].as_str(),
            "https://www.virustotal.com/gui/ip-address/8.8.8.8/details"
        );
        assert_eq!(urls[1].as_str(), "https://otx.alienvault.com/indicator/ip/8.8.8.8");
    }

    #[test]
    fn test_all_filter_includes_disabled() {
        let catalog = catalog();
        let enabled = resolve(&catalog, ArtifactType::Sha256, "ab", ServiceFilter::EnabledOnly);
        let all = resolve(&catalog, ArtifactType::Sha256, "ab", ServiceFilter::All);
        assert_eq!(all.len(), 10);
        assert!(enabled.len() < all.len());
    }

    #[test]
    fn test_asn_prefix_normalised() {
        let catalog = catalog();
        let with_prefix = resolve(&catalog, ArtifactType::Asn, "AS15169", ServiceFilter::EnabledOnly);
        let bare = resolve(&catalog, ArtifactType::Asn, "15169", ServiceFilter::EnabledOnly);
        let lower = resolve(&catalog, ArtifactType::Asn, "as15169", ServiceFilter::EnabledOnly);
        assert_eq!(with_prefix, bare);
        assert_eq!(lower, bare);
        assert_eq!(bare[0].as_str(), "https://ipinfo.io/AS15169");
        assert!(bare.iter().any(|u| u.as_str() == "https://bgpview.io/asn/15169"));
    }

    #[test]
    fn test_prefix_stripping_is_asn_only() {
        assert_eq!(normalize_value(ArtifactType::Domain, "asdf.com"), "asdf.com");
        assert_eq!(normalize_value(ArtifactType::Asn, "As7018"), "7018");
        assert_eq!(normalize_value(ArtifactType::Asn, "7018"), "7018");
        assert_eq!(normalize_value(ArtifactType::Asn, "A"), "A");
    }

    #[test]
    fn test_invalid_urls_dropped_silently() {
        let services = vec![
            service("good", "https://example.org/q/{value}", ArtifactType::Domain),
            service("spaced", "https://example.org/q?v={value}", ArtifactType::Domain),
        ];
        let urls = resolve_with(&services, ArtifactType::Domain, "bad value");
        assert!(urls.is_empty());

        let urls = resolve_with(&services, ArtifactType::Domain, "example.com");
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_unparseable_template_dropped() {
        let services = vec![
            service("broken", "not a url {value}", ArtifactType::Ip),
            service("relative", "/relative/{value}", ArtifactType::Ip),
            service("ok", "https://example.org/{value}", ArtifactType::Ip),
        ];
        let urls = resolve_with(&services, ArtifactType::Ip, "1.1.1.1");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://example.org/1.1.1.1");
    }

    #[test]
    fn test_every_placeholder_replaced() {
        let services = vec![service(
            "twice",
            "https://example.org/{value}?again={value}",
            ArtifactType::Ip,
        )];
        let urls = resolve_with(&services, ArtifactType::Ip, "9.9.9.9");
        assert_eq!(urls[0].as_str(), "https://example.org/9.9.9.9?again=9.9.9.9");
    }

    #[test]
    fn test_defaults_all_resolve_for_typical_values() {
        let samples = [
            (ArtifactType::Ip, "8.8.8.8"),
            (ArtifactType::Domain, "example.com"),
            (
                ArtifactType::Sha256,
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            ),
            (ArtifactType::Asn, "AS13335"),
            (ArtifactType::Mail, "example.com"),
        ];
        let services = default_services();
        for (kind, value) in samples {
            let expected = services.iter().filter(|s| s.category == kind).count();
            assert_eq!(resolve_with(&services, kind, value).len(), expected, "{kind}");
        }
    }
}
