//! DNS posture checks and domain blocklist probes.

use std::net::IpAddr;

use aihint_core::{Result, ScoreError};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use tracing::debug;

/// Domain blocklist zones probed by default.
pub const DEFAULT_BLOCKLIST_ZONES: &[&str] = &["dbl.spamhaus.org", "multi.surbl.org"];

/// What DNS says about a domain: delegation, mail setup, email auth.
#[derive(Debug, Clone, Default)]
pub struct DnsPosture {
    /// Resolved A/AAAA addresses
    pub addresses: Vec<IpAddr>,
    /// MX exchange hosts
    pub mx_hosts: Vec<String>,
    /// Delegated name servers
    pub ns_hosts: Vec<String>,
    /// An SPF policy exists in TXT
    pub has_spf: bool,
    /// A DMARC policy exists at `_dmarc.<domain>`
    pub has_dmarc: bool,
}

impl DnsPosture {
    /// True when any resolved address is loopback.
    #[must_use]
    pub fn has_loopback_address(&self) -> bool {
        self.addresses.iter().any(IpAddr::is_loopback)
    }

    /// True when any resolved address sits in private (RFC 1918) space.
    #[must_use]
    pub fn has_private_address(&self) -> bool {
        self.addresses.iter().any(|addr| match addr {
            IpAddr::V4(v4) => v4.is_private(),
            IpAddr::V6(_) => false,
        })
    }
}

/// One blocklist listing: the zone that answered and what it answered.
#[derive(Debug, Clone)]
pub struct BlacklistHit {
    /// Blocklist zone that listed the domain
    pub zone: String,
    /// Return addresses from the zone
    pub responses: Vec<IpAddr>,
}

/// Resolver wrapper for the reputation checks.
pub struct DnsInspector {
    resolver: TokioAsyncResolver,
}

impl Default for DnsInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsInspector {
    /// Inspector over the system's default resolver configuration.
    #[must_use]
    pub fn new() -> Self {
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self { resolver }
    }

    /// Collect the domain's DNS posture. Individual record types that fail
    /// to resolve are treated as absent, not as an error; only an address
    /// lookup failure that is not NXDOMAIN propagates.
    pub async fn posture(&self, domain: &str) -> Result<DnsPosture> {
        debug!(domain, "DNS posture lookup");

        let addresses = match self.resolver.lookup_ip(domain).await {
            Ok(lookup) => lookup.iter().collect(),
            Err(e) if is_no_records(&e) => Vec::new(),
            Err(e) => return Err(ScoreError::Dns(e.to_string())),
        };

        let mx_hosts = match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => lookup.iter().map(|mx| mx.exchange().to_string()).collect(),
            Err(_) => Vec::new(),
        };

        let ns_hosts = match self.resolver.ns_lookup(domain).await {
            Ok(lookup) => lookup.iter().map(ToString::to_string).collect(),
            Err(_) => Vec::new(),
        };

        let has_spf = self
            .txt_records(domain)
            .await
            .iter()
            .any(|txt| txt.to_lowercase().starts_with("v=spf1"));

        let has_dmarc = self
            .txt_records(&format!("_dmarc.{domain}"))
            .await
            .iter()
            .any(|txt| txt.to_lowercase().starts_with("v=dmarc1"));

        Ok(DnsPosture {
            addresses,
            mx_hosts,
            ns_hosts,
            has_spf,
            has_dmarc,
        })
    }

    /// Probe domain blocklists: query `<domain>.<zone>`; an answer means
    /// listed, NXDOMAIN means clean. Zones that error are skipped.
    pub async fn blacklist_check(&self, domain: &str, zones: &[&str]) -> Vec<BlacklistHit> {
        let mut hits = Vec::new();
        for zone in zones {
            let query = format!("{domain}.{zone}");
            match self.resolver.lookup_ip(&query).await {
                Ok(lookup) => {
                    let responses: Vec<IpAddr> = lookup.iter().collect();
                    if !responses.is_empty() {
                        debug!(domain, zone, "blocklist hit");
                        hits.push(BlacklistHit {
                            zone: (*zone).to_string(),
                            responses,
                        });
                    }
                }
                Err(e) if is_no_records(&e) => {}
                Err(e) => {
                    debug!(domain, zone, error = %e, "blocklist zone unreachable, skipping");
                }
            }
        }
        hits
    }

    async fn txt_records(&self, name: &str) -> Vec<String> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => lookup
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|data| String::from_utf8_lossy(data).to_string())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn is_no_records(e: &hickory_resolver::error::ResolveError) -> bool {
    matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
