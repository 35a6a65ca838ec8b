//! `aihint score` - score a single website.

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::args::ScoreArgs;
use crate::output;

pub async fn execute(ctx: Context, args: ScoreArgs) -> Result<()> {
    let engine = ctx.engine()?;
    let result = engine.score_website(&args.url).await;
    let rendered = output::render(&result, ctx.format, ctx.verbose)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("could not write {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }

    // A low score is still a computed score; only argument and IO
    // problems exit non-zero.
    Ok(())
}
