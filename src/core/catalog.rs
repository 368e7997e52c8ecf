// SocLookup - core/catalog.rs
//
// Catalog of lookup services per artifact type, with enable/disable state.
//
// The built-in table is immutable. The live catalog is that table with the
// user's persisted `id -> enabled` overrides merged on top at load time.
// Overrides for ids that no longer exist are ignored; services missing from
// the override map keep their built-in default.

use crate::core::model::{ArtifactType, LookupService};
use crate::core::store::{self, KeyValueStore};
use crate::util::constants::STORE_KEY_SERVICES;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

// =============================================================================
// Built-in service table
// =============================================================================

/// One row of the built-in table.
struct ServiceSeed {
    id: &'static str,
    name: &'static str,
    url_template: &'static str,
    category: ArtifactType,
    enabled: bool,
}

const fn on(
    id: &'static str,
    name: &'static str,
    url_template: &'static str,
    category: ArtifactType,
) -> ServiceSeed {
    ServiceSeed {
        id,
        name,
        url_template,
        category,
        enabled: true,
    }
}

const fn off(
    id: &'static str,
    name: &'static str,
    url_template: &'static str,
    category: ArtifactType,
) -> ServiceSeed {
    ServiceSeed {
        id,
        name,
        url_template,
        category,
        enabled: false,
    }
}

use ArtifactType::{Asn, Domain, Ip, Mail, Sha256};

/// Built-in services, grouped by category. Order within a category is the
/// order URLs are produced and opened in.
///
/// ASN templates carry their own literal "AS"/"as" prefix; the resolver
/// strips any prefix from the user's input before substitution.
static DEFAULT_SERVICES: &[ServiceSeed] = &[
    // -- IP --
    on("vt-ip", "VirusTotal", "https://www.virustotal.com/gui/ip-address/{value}/details", Ip),
    on("otx-ip", "AlienVault OTX", "https://otx.alienvault.com/indicator/ip/{value}", Ip),
    on("gn-ip", "GreyNoise", "https://viz.greynoise.io/ip/{value}", Ip),
    on("abuse-ip", "AbuseIPDB", "https://www.abuseipdb.com/check/{value}", Ip),
    on("ipinfo", "IPInfo", "https://ipinfo.io/{value}", Ip),
    on("shodan", "Shodan", "https://www.shodan.io/host/{value}", Ip),
    on("censys-ip", "Censys", "https://search.censys.io/hosts/{value}", Ip),
    on("threat-crowd-ip", "ThreatCrowd", "https://threatcrowd.org/ip.php?ip={value}", Ip),
    on(
        "cisco-talos-ip",
        "Cisco Talos",
        "https://talosintelligence.com/reputation_center/lookup?search={value}",
        Ip,
    ),
    on("ibm-xforce-ip", "IBM X-Force", "https://exchange.xforce.ibmcloud.com/ip/{value}", Ip),
    on("pulsedive-ip", "Pulsedive", "https://pulsedive.com/indicator/?ioc={value}", Ip),
    off("threathunter-ip", "ThreatHunter", "https://threathunter.io/ip/{value}", Ip),
    on("ipvoid", "IPVoid", "https://www.ipvoid.com/ip-blacklist-check/?ip={value}", Ip),
    off("spamhaus-ip", "Spamhaus", "https://www.spamhaus.org/query/ip/{value}", Ip),
    on("threatminer-ip", "ThreatMiner", "https://www.threatminer.org/host.php?q={value}", Ip),
    // -- Domain --
    on("vt-domain", "VirusTotal", "https://www.virustotal.com/gui/domain/{value}/details", Domain),
    on("otx-domain", "AlienVault OTX", "https://otx.alienvault.com/indicator/domain/{value}", Domain),
    on("urlscan", "URLScan.io", "https://urlscan.io/search/#{value}", Domain),
    on("gn-domain", "GreyNoise", "https://viz.greynoise.io/query/{value}", Domain),
    on(
        "threat-crowd-domain",
        "ThreatCrowd",
        "https://threatcrowd.org/domain.php?domain={value}",
        Domain,
    ),
    on(
        "cisco-talos-domain",
        "Cisco Talos",
        "https://talosintelligence.com/reputation_center/lookup?search={value}",
        Domain,
    ),
    on("ibm-xforce-domain", "IBM X-Force", "https://exchange.xforce.ibmcloud.com/url/{value}", Domain),
    on("pulsedive-domain", "Pulsedive", "https://pulsedive.com/indicator/?ioc={value}", Domain),
    on("whois", "WHOIS Lookup", "https://who.is/whois/{value}", Domain),
    on("threatminer-domain", "ThreatMiner", "https://www.threatminer.org/domain.php?q={value}", Domain),
    on("securitytrails", "SecurityTrails", "https://securitytrails.com/domain/{value}/dns", Domain),
    // -- SHA-256 --
    on("vt-file", "VirusTotal", "https://www.virustotal.com/gui/file/{value}/details", Sha256),
    on("malware-bazaar", "MalwareBazaar", "https://bazaar.abuse.ch/sample/{value}", Sha256),
    on(
        "hybrid-analysis",
        "Hybrid Analysis",
        "https://www.hybrid-analysis.com/search?query={value}",
        Sha256,
    ),
    on("any-run", "ANY.RUN", "https://app.any.run/submissions/#filehash:{value}", Sha256),
    off("joe-sandbox", "Joe Sandbox", "https://www.joesandbox.com/search?q={value}", Sha256),
    off(
        "reversing-labs",
        "ReversingLabs",
        "https://a1000.reversinglabs.com/accounts/login/?next=/search/v2/%3Fquery%3D{value}",
        Sha256,
    ),
    on(
        "metadefender",
        "MetaDefender",
        "https://metadefender.opswat.com/results/file/{value}/regular/overview",
        Sha256,
    ),
    on("threatminer-hash", "ThreatMiner", "https://www.threatminer.org/sample.php?q={value}", Sha256),
    on("kaspersky-opentip", "Kaspersky Opentip", "https://opentip.kaspersky.com/{value}", Sha256),
    off("intezer", "Intezer Analyze", "https://analyze.intezer.com/files/{value}", Sha256),
    // -- ASN --
    on("ipinfo-asn", "IPInfo ASN", "https://ipinfo.io/AS{value}", Asn),
    on("he-bgp", "Hurricane Electric BGP", "https://bgp.he.net/AS{value}", Asn),
    on("bgpview", "BGPView", "https://bgpview.io/asn/{value}", Asn),
    on("peeringdb", "PeeringDB", "https://www.peeringdb.com/asn/{value}", Asn),
    on("ripe-asn", "RIPE Stat", "https://stat.ripe.net/AS{value}", Asn),
    on("bgp-tools", "BGP.Tools", "https://bgp.tools/as/{value}", Asn),
    on("robtex-asn", "Robtex ASN", "https://www.robtex.com/as/as{value}.html", Asn),
    off(
        "ultratools-asn",
        "UltraTools ASN",
        "https://www.ultratools.com/tools/asnInfoResult?asn={value}",
        Asn,
    ),
    // -- Mail --
    on(
        "mx-toolbox-mx",
        "MXToolbox MX",
        "https://mxtoolbox.com/SuperTool.aspx?action=mx%3a{value}#&run=toolpage",
        Mail,
    ),
    on(
        "mx-toolbox-spf",
        "MXToolbox SPF",
        "https://mxtoolbox.com/SuperTool.aspx?action=spf%3a{value}#&run=toolpage",
        Mail,
    ),
    on(
        "mx-toolbox-dmarc",
        "MXToolbox DMARC",
        "https://mxtoolbox.com/SuperTool.aspx?action=dmarc%3a{value}#&run=toolpage",
        Mail,
    ),
    off("dmarcian", "Dmarcian", "https://dmarcian.com/domain-checker/?domain={value}", Mail),
    off("hunter-email", "Hunter.io", "https://hunter.io/email-verifier/{value}", Mail),
];

/// Fresh copy of the built-in service table.
pub fn default_services() -> Vec<LookupService> {
    DEFAULT_SERVICES
        .iter()
        .map(|seed| LookupService {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            url_template: seed.url_template.to_string(),
            category: seed.category,
            enabled: seed.enabled,
        })
        .collect()
}

// =============================================================================
// Live catalog
// =============================================================================

/// Enabled/total counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: ArtifactType,
    pub enabled: usize,
    pub total: usize,
}

/// The process-wide service catalog.
///
/// Owns its service list; callers only get shared references. Every
/// mutation is persisted immediately through the store.
pub struct ServiceCatalog {
    services: Vec<LookupService>,
    store: Arc<dyn KeyValueStore>,
}

impl ServiceCatalog {
    /// Build the catalog from the built-in table and any persisted overrides.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut services = default_services();

        if let Some(overrides) =
            store::load_json::<HashMap<String, bool>>(store.as_ref(), STORE_KEY_SERVICES)
        {
            let mut applied = 0;
            for service in &mut services {
                if let Some(&enabled) = overrides.get(&service.id) {
                    service.enabled = enabled;
                    applied += 1;
                }
            }
            tracing::debug!(
                applied,
                ignored = overrides.len() - applied,
                "Applied persisted service overrides"
            );
        }

        tracing::info!(services = services.len(), "Service catalog loaded");
        Self { services, store }
    }

    /// Every service, in catalog order.
    pub fn services(&self) -> &[LookupService] {
        &self.services
    }

    /// Look up a service by id.
    pub fn get(&self, id: &str) -> Option<&LookupService> {
        self.services.iter().find(|s| s.id == id)
    }

    /// All services of `category`, enabled or not, in catalog order.
    pub fn all_services(&self, category: ArtifactType) -> Vec<&LookupService> {
        self.services
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Enabled services of `category`, in catalog order.
    pub fn enabled_services(&self, category: ArtifactType) -> Vec<&LookupService> {
        self.services
            .iter()
            .filter(|s| s.category == category && s.enabled)
            .collect()
    }

    /// Flip the enabled state of `id`. Unknown ids are a silent no-op.
    ///
    /// Returns the new state, or `None` if the id is unknown.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let service = self.services.iter_mut().find(|s| s.id == id)?;
        service.enabled = !service.enabled;
        let enabled = service.enabled;
        tracing::debug!(id, enabled, "Service toggled");
        self.persist();
        Some(enabled)
    }

    /// Set the enabled state of `id` explicitly. Unknown ids are a no-op.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Option<bool> {
        let service = self.services.iter_mut().find(|s| s.id == id)?;
        service.enabled = enabled;
        tracing::debug!(id, enabled, "Service state set");
        self.persist();
        Some(enabled)
    }

    /// Discard every override and return to the built-in table.
    pub fn reset_to_defaults(&mut self) {
        self.services = default_services();
        tracing::info!("Service catalog reset to defaults");
        self.persist();
    }

    /// Enabled/total counts per category, in `ArtifactType::all()` order.
    pub fn statistics(&self) -> Vec<CategoryStats> {
        ArtifactType::all()
            .iter()
            .map(|&category| {
                let all = self.all_services(category);
                CategoryStats {
                    category,
                    enabled: all.iter().filter(|s| s.enabled).count(),
                    total: all.len(),
                }
            })
            .collect()
    }

    fn persist(&self) {
        let states: BTreeMap<&str, bool> = self
            .services
            .iter()
            .map(|s| (s.id.as_str(), s.enabled))
            .collect();
        store::save_json(self.store.as_ref(), STORE_KEY_SERVICES, &states);
    }
}
