//! aihint - website trust scoring CLI
//!
//! Scores a website's trustworthiness across security, reputation, and
//! compliance checks.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    aihint_cli::run().await
}
