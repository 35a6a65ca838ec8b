//! `aihint batch` - score multiple websites.

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::cli::args::BatchArgs;
use crate::output;

pub async fn execute(ctx: Context, args: BatchArgs) -> Result<()> {
    let mut urls = args.urls.clone();
    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read URL list {}", path.display()))?;
        urls.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from),
        );
    }
    if urls.is_empty() {
        bail!("no URLs given; pass them as arguments or via --file");
    }

    let engine = ctx.engine()?;

    // Sequential on purpose: each score already fans out internally, and
    // hammering many sites at once mostly trips rate limits.
    for url in &urls {
        let result = engine.score_website(url).await;
        let rendered = output::render(&result, ctx.format, ctx.verbose)?;
        print!("{rendered}");
        println!();
    }

    Ok(())
}
