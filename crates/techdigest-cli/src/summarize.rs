//! `summarize` stage: one Anthropic call over the day's raw answers.

use techdigest_core::{build_summary_prompt, summary_footer, RunContext, SnapshotStore};
use techdigest_llm::{AnthropicClient, MessageRequest};

use crate::output::write_markdown;

/// Summarize the raw snapshot for the run date into
/// `digest/{date}.summary.md`.
///
/// # Errors
///
/// A missing snapshot ([`techdigest_core::SnapshotError::Missing`]) or any
/// request failure is fatal. Nothing is written in that case.
pub(crate) async fn run_summarize(
    ctx: &RunContext,
    client: &AnthropicClient,
) -> anyhow::Result<()> {
    let date = ctx.date_key();
    let snapshot = SnapshotStore::new(ctx.raw_dir()).load(&date)?;
    let settings = &ctx.config.summary;
    println!(
        "[{date}] summarizing {} results with {}",
        snapshot.results.len(),
        settings.model
    );

    let prompt = build_summary_prompt(ctx, &snapshot.results);
    let request =
        MessageRequest::single_turn(&settings.model, settings.max_tokens, &settings.system, &prompt);
    let summary = client.create_message(&request).await?;
    tracing::info!(
        input_tokens = summary.input_tokens,
        output_tokens = summary.output_tokens,
        "summary generated"
    );

    let footer = summary_footer(&settings.model, summary.input_tokens, summary.output_tokens);
    let path = ctx.summary_path();
    write_markdown(&path, &format!("{}{footer}", summary.text))?;

    println!("  \u{2192} summary saved: {}", path.display());
    println!(
        "  tokens: input {} / output {}",
        summary.input_tokens, summary.output_tokens
    );
    Ok(())
}
