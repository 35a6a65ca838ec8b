//! WHOIS lookups with line-based response parsing.

use std::sync::Arc;

use aihint_core::{Result, ScoreError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Date layouts seen in the wild across registry responses, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%d.%m.%Y",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%d %b %Y",
];

/// Structured WHOIS record for a domain.
#[derive(Debug, Clone, Default)]
pub struct WhoisInfo {
    /// Raw response text
    pub raw: String,
    /// Registrar name
    pub registrar: Option<String>,
    /// Domain creation date
    pub creation_date: Option<DateTime<Utc>>,
    /// Last record update
    pub updated_date: Option<DateTime<Utc>>,
    /// Registration expiry
    pub expiration_date: Option<DateTime<Utc>>,
    /// Delegated name servers
    pub name_servers: Vec<String>,
    /// EPP status codes
    pub status: Vec<String>,
}

impl WhoisInfo {
    /// Registration age in whole days, when the creation date is known.
    #[must_use]
    pub fn age_days(&self) -> Option<i64> {
        self.creation_date
            .map(|created| (Utc::now() - created).num_days())
    }

    /// Days until expiry; negative when already expired.
    #[must_use]
    pub fn days_to_expiry(&self) -> Option<i64> {
        self.expiration_date
            .map(|expires| (expires - Utc::now()).num_days())
    }

    /// True when the record was updated within the last `days` days.
    #[must_use]
    pub fn updated_within_days(&self, days: i64) -> bool {
        self.updated_date
            .is_some_and(|updated| (Utc::now() - updated).num_days() < days)
    }
}

/// WHOIS client over the embedded registry server map.
#[derive(Clone)]
pub struct WhoisClient {
    whois: Arc<whois_rs::WhoIs>,
}

impl WhoisClient {
    /// Build a client from the embedded server list.
    pub fn new() -> Result<Self> {
        let whois = whois_rs::WhoIs::from_string(include_str!("whois_servers.json"))
            .map_err(|e| ScoreError::Whois(e.to_string()))?;
        Ok(Self {
            whois: Arc::new(whois),
        })
    }

    /// Look up a domain. The underlying lookup is blocking socket I/O, so
    /// it runs on the blocking pool.
    pub async fn lookup(&self, domain: &str) -> Result<WhoisInfo> {
        debug!(domain, "WHOIS lookup");
        let whois = Arc::clone(&self.whois);
        let options = whois_rs::WhoIsLookupOptions::from_string(domain)
            .map_err(|e| ScoreError::Whois(e.to_string()))?;

        let raw = tokio::task::spawn_blocking(move || whois.lookup(options))
            .await
            .map_err(|e| ScoreError::Internal(e.to_string()))?
            .map_err(|e| ScoreError::Whois(e.to_string()))?;

        Ok(parse_whois_response(&raw))
    }
}

/// Line-based parse of a registry response into structured fields.
fn parse_whois_response(raw: &str) -> WhoisInfo {
    let mut info = WhoisInfo {
        raw: raw.to_string(),
        ..WhoisInfo::default()
    };

    for line in raw.lines() {
        let line = line.trim();
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                "registrar" | "registrar name" | "sponsoring registrar" => {
                    info.registrar.get_or_insert(value);
                }
                "creation date" | "created" | "created on" | "registered"
                | "registration time" | "domain registration date" => {
                    if info.creation_date.is_none() {
                        info.creation_date = parse_whois_date(&value);
                    }
                }
                "updated date" | "last updated" | "last modified" | "modified"
                | "changed" => {
                    if info.updated_date.is_none() {
                        info.updated_date = parse_whois_date(&value);
                    }
                }
                "expiration date" | "expires" | "expiry date"
                | "registry expiry date" | "registrar registration expiration date"
                | "paid-till" => {
                    if info.expiration_date.is_none() {
                        info.expiration_date = parse_whois_date(&value);
                    }
                }
                "name server" | "nserver" | "nameserver" => {
                    info.name_servers.push(value.to_lowercase());
                }
                "status" | "domain status" => {
                    info.status.push(value);
                }
                _ => {}
            }
        }
    }

    info
}

/// Try the known date layouts in order; date-only layouts anchor at midnight.
fn parse_whois_date(value: &str) -> Option<DateTime<Utc>> {
    // Registries sometimes suffix a timezone name ("2019-01-02 10:00:00 UTC").
    let value = value
        .trim_end_matches(" utc")
        .trim_end_matches(" UTC")
        .trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}
