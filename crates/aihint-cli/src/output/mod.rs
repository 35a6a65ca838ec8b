//! Output rendering for scoring results.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use aihint_core::{MetricStatus, ScoringResult, TrustLevel};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
    /// Metric table
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Render one result in the chosen format.
pub fn render(result: &ScoringResult, format: OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Text => Ok(render_text(result, verbose)),
    }
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Check")]
    name: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Time (ms)")]
    time_ms: u64,
    #[tabled(rename = "Message")]
    message: String,
}

const fn status_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Success => "success",
        MetricStatus::Warning => "warning",
        MetricStatus::Error => "error",
        MetricStatus::Skipped => "skipped",
    }
}

fn render_table(result: &ScoringResult) -> String {
    let rows: Vec<MetricRow> = result
        .detailed_metrics
        .iter()
        .map(|m| MetricRow {
            name: m.name.clone(),
            score: format!("{:.2}", m.score),
            status: status_label(m.status),
            time_ms: m.execution_time_ms,
            message: m.message.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!(
        "{}\n\nFinal score: {:.3} ({})  confidence: {:.2}\n",
        table, result.final_score, result.trust_level, result.confidence
    )
}

fn level_colored(level: TrustLevel) -> colored::ColoredString {
    let text = level.to_string();
    match level {
        TrustLevel::High | TrustLevel::Good => text.green().bold(),
        TrustLevel::Moderate => text.yellow().bold(),
        TrustLevel::Low | TrustLevel::VeryLow => text.red().bold(),
    }
}

fn render_text(result: &ScoringResult, verbose: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "URL:".bold(), result.url.cyan());
    let _ = writeln!(
        out,
        "{} {:.3} ({})",
        "Trust score:".bold(),
        result.final_score,
        level_colored(result.trust_level)
    );
    let _ = writeln!(out, "  {}", result.trust_level_description.dimmed());
    let _ = writeln!(out, "{} {:.2}", "Confidence:".bold(), result.confidence);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} {:.3}   {} {:.3}   {} {:.3}",
        "security".bold(),
        result.security_score,
        "reputation".bold(),
        result.reputation_score,
        "compliance".bold(),
        result.compliance_score
    );

    if verbose {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Checks:".bold().underline());
        for m in &result.detailed_metrics {
            let _ = writeln!(
                out,
                "  {:<20} {:.2}  [{}]  {} ({}ms)",
                m.name,
                m.score,
                status_label(m.status),
                m.message,
                m.execution_time_ms
            );
        }
        if !result.warnings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", "Warnings:".yellow().bold());
            for w in &result.warnings {
                let _ = writeln!(out, "  - {w}");
            }
        }
        if !result.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", "Errors:".red().bold());
            for e in &result.errors {
                let _ = writeln!(out, "  - {e}");
            }
        }
    } else if !result.warnings.is_empty() {
        let _ = writeln!(
            out,
            "\n{} ({} total, use --verbose for details)",
            "Warnings present".yellow(),
            result.warnings.len()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aihint_core::{MetricResult, ResultParts};
    use serde_json::json;

    fn sample() -> ScoringResult {
        ScoringResult::assemble(
            "https://example.com",
            ResultParts {
                final_score: 0.82,
                confidence: 0.89,
                category_scores: (0.9, 0.8, 0.7),
                metrics: vec![MetricResult::success(
                    "ssl_tls",
                    0.95,
                    "certificate valid",
                    json!({}),
                    120,
                )],
                warnings: vec!["Low compliance score detected".to_string()],
                errors: vec![],
            },
        )
    }

    #[test]
    fn json_output_round_trips() {
        let rendered = render(&sample(), OutputFormat::Json, false).unwrap();
        let parsed: ScoringResult = serde_json::from_str(&rendered).unwrap();
        assert!((parsed.final_score - 0.82).abs() < f64::EPSILON);
    }

    #[test]
    fn text_output_names_url_and_level() {
        colored::control::set_override(false);
        let rendered = render(&sample(), OutputFormat::Text, false).unwrap();
        assert!(rendered.contains("https://example.com"));
        assert!(rendered.contains("GOOD"));
        assert!(rendered.contains("Warnings present"));
    }

    #[test]
    fn verbose_text_lists_metrics_and_warnings() {
        colored::control::set_override(false);
        let rendered = render(&sample(), OutputFormat::Text, true).unwrap();
        assert!(rendered.contains("ssl_tls"));
        assert!(rendered.contains("certificate valid"));
        assert!(rendered.contains("Low compliance score detected"));
    }

    #[test]
    fn table_output_includes_metric_rows() {
        let rendered = render(&sample(), OutputFormat::Table, false).unwrap();
        assert!(rendered.contains("ssl_tls"));
        assert!(rendered.contains("Final score: 0.820"));
    }
}
