//! Contact information discovery and validation.

use std::collections::BTreeSet;
use std::time::Instant;

use aihint_core::{MetricResult, Result, ScoreError};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use crate::probe::HttpProbe;
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

const CONTACT_PATHS: &[&str] = &[
    "/contact",
    "/contact-us",
    "/contact_us",
    "/contact.html",
    "/about/contact",
    "/support/contact",
    "/get-in-touch",
];

const LINK_KEYWORDS: &[&str] = &["contact", "support"];

/// Addresses at these providers read as personal, not business, mail.
const FREE_MAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// Local parts that indicate automated mailboxes.
const AUTOMATED_LOCAL_PARTS: &[&str] = &["noreply", "no-reply", "donotreply", "admin", "webmaster"];

const BUSINESS_TERMS: &[&str] = &["inc", "llc", "ltd", "corp", "company", "business"];

/// Contact details extracted from page markup.
#[derive(Debug, Clone, Default)]
struct ContactDetails {
    emails: BTreeSet<String>,
    phones: BTreeSet<String>,
    addresses: BTreeSet<String>,
    social_links: BTreeSet<String>,
    contact_page: Option<String>,
}

impl ContactDetails {
    fn has_human_email(&self) -> bool {
        self.emails.iter().any(|e| {
            let local = e.split('@').next().unwrap_or("");
            !AUTOMATED_LOCAL_PARTS.iter().any(|a| local.contains(a))
        })
    }

    fn only_free_mail(&self) -> bool {
        !self.emails.is_empty()
            && self.emails.iter().all(|e| {
                let domain = e.rsplit('@').next().unwrap_or("");
                FREE_MAIL_DOMAINS.contains(&domain)
            })
    }

    fn has_business_email(&self) -> bool {
        self.emails.iter().any(|e| {
            let domain = e.rsplit('@').next().unwrap_or("");
            !domain.is_empty() && !FREE_MAIL_DOMAINS.contains(&domain)
        })
    }
}

/// Extracts and judges the site's published contact channels: email,
/// phone, street address, social links, and a dedicated contact page.
pub struct ContactValidator {
    probe: HttpProbe,
    email_re: Regex,
    phone_re: Regex,
    address_re: Regex,
    social_re: Regex,
}

impl ContactValidator {
    /// Validator over the shared probe.
    pub fn new(probe: HttpProbe) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ScoreError::Internal(e.to_string()))
        };
        Ok(Self {
            probe,
            email_re: compile(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?,
            phone_re: compile(r"\+?\(?[0-9]{1,4}\)?[-.\s][0-9]{2,4}[-.\s][0-9]{2,4}(?:[-.\s][0-9]{2,4})?")?,
            address_re: compile(
                r"(?i)[0-9]+\s+[A-Za-z0-9\s,.-]+?(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Court|Ct)\b",
            )?,
            social_re: compile(
                r"https?://(?:www\.)?(?:facebook|twitter|linkedin|instagram|youtube|tiktok)\.com/[A-Za-z0-9._-]+",
            )?,
        })
    }

    fn extract_into(&self, content: &str, details: &mut ContactDetails) {
        for m in self.email_re.find_iter(content) {
            details.emails.insert(m.as_str().to_lowercase());
        }
        for m in self.phone_re.find_iter(content) {
            details.phones.insert(m.as_str().trim().to_string());
        }
        for m in self.address_re.find_iter(content) {
            details.addresses.insert(m.as_str().trim().to_string());
        }
        for m in self.social_re.find_iter(content) {
            details.social_links.insert(m.as_str().to_string());
        }
    }

    async fn gather(&self, target: &ScoreTarget) -> ContactDetails {
        let mut details = ContactDetails::default();

        let homepage = match self.probe.fetch_homepage(target).await {
            Ok(page) => {
                self.extract_into(&page.body, &mut details);
                Some(page)
            }
            Err(_) => None,
        };

        let contact_page = match self.probe.find_first_live(target, CONTACT_PATHS).await {
            Some(page) => Some(page),
            None => match &homepage {
                Some(home) => {
                    self.probe
                        .find_linked_page(target, home, LINK_KEYWORDS)
                        .await
                }
                None => None,
            },
        };

        if let Some(page) = contact_page {
            self.extract_into(&page.body, &mut details);
            details.contact_page = Some(page.url);
        }

        details
    }
}

#[async_trait]
impl Scorer for ContactValidator {
    fn name(&self) -> &'static str {
        "contact"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();
        let details = self.gather(target).await;

        let quality = quality_score(&details);
        let business = business_score(&details, target);
        let score = ((quality + business) / 2.0).clamp(0.0, 1.0);

        let breakdown = json!({
            "quality_score": quality,
            "business_score": business,
            "emails_found": details.emails.len(),
            "phones_found": details.phones.len(),
            "addresses_found": details.addresses.len(),
            "social_links_found": details.social_links.len(),
            "contact_page": details.contact_page,
        });

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            format!(
                "{} emails, {} phones, {} addresses found",
                details.emails.len(),
                details.phones.len(),
                details.addresses.len()
            ),
            breakdown,
            elapsed_ms(start),
        ));
        if details.emails.is_empty() && details.phones.is_empty() {
            out = out.with_warning("contact: no direct contact channel found");
        }
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Availability-based score over the extracted channels.
fn quality_score(details: &ContactDetails) -> f64 {
    let mut score: f64 = 0.0;

    if details.has_human_email() {
        score += 0.3;
    } else if !details.emails.is_empty() {
        score += 0.1;
    }
    if !details.phones.is_empty() {
        score += 0.2;
    }
    if !details.addresses.is_empty() {
        score += 0.2;
    }
    if details.contact_page.is_some() {
        score += 0.1;
    }
    if !details.social_links.is_empty() {
        score += 0.1;
    }

    let channel_breadth = [
        !details.emails.is_empty(),
        !details.phones.is_empty(),
        !details.addresses.is_empty(),
    ]
    .iter()
    .filter(|b| **b)
    .count();
    if channel_breadth >= 2 {
        score += 0.1;
    }

    if details.only_free_mail() {
        score -= 0.1;
    }

    score.clamp(0.0, 1.0)
}

/// Business plausibility over a moderate 0.5 base.
fn business_score(details: &ContactDetails, target: &ScoreTarget) -> f64 {
    let mut score: f64 = 0.5;

    if details.has_business_email() {
        score += 0.2;
    }
    if !details.addresses.is_empty() {
        score += 0.2;
    }
    if !details.phones.is_empty() {
        score += 0.1;
    }
    if !details.social_links.is_empty() {
        score += 0.1;
    }
    if BUSINESS_TERMS.iter().any(|t| target.host.contains(t)) {
        score += 0.1;
    }

    score.min(1.0)
}
