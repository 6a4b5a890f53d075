//! `community` stage: one Perplexity search per configured query, merged into
//! the raw snapshot and rendered as the raw digest.

use std::collections::BTreeMap;

use techdigest_core::{
    bindings_from_context, build_digest_markdown, resolve, QueryConfig, RunContext,
    SnapshotStore, TopicQueryResult,
};
use techdigest_llm::{PerplexityClient, SearchCompletionRequest};

use crate::output::write_markdown;

/// Ask every configured query in declared order.
///
/// A failed query is logged and skipped; the remaining queries still run.
/// Returns the results keyed by query id.
pub(crate) async fn collect_topics(
    ctx: &RunContext,
    client: &PerplexityClient,
) -> BTreeMap<String, TopicQueryResult> {
    let bindings = bindings_from_context(&ctx.config.context);
    let mut results = BTreeMap::new();

    for query in ctx.config.all_queries() {
        let question = resolve(&query.query, &bindings);
        println!("  querying: [{}] {}", query.id, query.title);
        match query_topic(ctx, client, query, &question).await {
            Ok(result) => {
                println!("{}", success_line(&result));
                results.insert(query.id.clone(), result);
            }
            Err(e) => {
                tracing::warn!(query_id = %query.id, error = %e, "topic query failed");
                println!("  \u{2717} {}: {e}", query.id);
            }
        }
    }

    results
}

/// `  ✓ id (N tokens)`, with `?` when the API reported no total.
fn success_line(result: &TopicQueryResult) -> String {
    let tokens = result
        .usage
        .total_tokens
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    format!("  \u{2713} {} ({tokens} tokens)", result.id)
}

async fn query_topic(
    ctx: &RunContext,
    client: &PerplexityClient,
    query: &QueryConfig,
    question: &str,
) -> Result<TopicQueryResult, techdigest_llm::LlmError> {
    let settings = &ctx.config.perplexity;
    let request = SearchCompletionRequest::new(
        &settings.model,
        &settings.system_prompt,
        question,
        &settings.recency,
    );
    let completion = client.complete(&request).await?;
    tracing::debug!(
        query_id = %query.id,
        citations = completion.citations.len(),
        "topic query answered"
    );

    Ok(TopicQueryResult {
        id: query.id.clone(),
        title: query.title.clone(),
        query: query.query.clone(),
        answer: completion.answer,
        citations: completion.citations,
        model: completion.model.unwrap_or_else(|| settings.model.clone()),
        usage: completion.usage,
    })
}

/// Collect all topics, merge `model` and `results` into the raw snapshot,
/// and write `digest/{date}.md`.
///
/// # Errors
///
/// Only snapshot and file-write errors are returned; individual query
/// failures are absorbed by [`collect_topics`].
pub(crate) async fn run_community(
    ctx: &RunContext,
    client: &PerplexityClient,
) -> anyhow::Result<BTreeMap<String, TopicQueryResult>> {
    let date = ctx.date_key();
    let total = ctx.config.all_queries().count();
    println!("[{date}] community digest collection started ({total} queries)");

    let results = collect_topics(ctx, client).await;
    let collected = results.len();

    let store = SnapshotStore::new(ctx.raw_dir());
    let model = ctx.config.perplexity.model.clone();
    let snapshot = store.merge(&date, move |snapshot| {
        snapshot.model = Some(model);
        snapshot.results = results;
    })?;
    println!("  \u{2192} raw data saved: {}", store.path(&date).display());

    let digest_path = ctx.digest_path();
    write_markdown(&digest_path, &build_digest_markdown(ctx, &snapshot.results))?;
    println!("  \u{2192} digest saved: {}", digest_path.display());

    println!("[done] collected queries: {collected}/{total}");
    Ok(snapshot.results)
}
