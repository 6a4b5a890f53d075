//! Markdown digest and summarization prompt rendering.
//!
//! Both walk the configured sections and queries in declared order; the
//! snapshot only supplies the answers.

use std::collections::BTreeMap;

use crate::context::RunContext;
use crate::snapshot::TopicQueryResult;
use crate::template::{bindings_from_context, resolve};

/// Stand-in answer for a query with no stored result.
pub const MISSING_ANSWER: &str = "(no data)";

/// Render `digest/{date}.md` from the collected results.
///
/// Queries missing from `results` (failed or skipped) are left out; the
/// section heading is still emitted.
#[must_use]
pub fn build_digest_markdown(
    ctx: &RunContext,
    results: &BTreeMap<String, TopicQueryResult>,
) -> String {
    let config = &ctx.config;
    let mut lines: Vec<String> = vec![
        format!("# {} — {}", config.digest.title, ctx.date_key()),
        String::new(),
        format!(
            "> **Collection**: Perplexity {} / real community reactions (Reddit, HN, X)",
            config.perplexity.model
        ),
        "> **Note**: this file is the raw collection output. The condensed summary is written separately.".to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for (i, section) in config.sections.iter().enumerate() {
        lines.push(format!("## {}. {}", i + 1, section.title));
        lines.push(String::new());

        for query in &section.queries {
            let Some(result) = results.get(&query.id) else {
                continue;
            };

            lines.push(heading(&section.emoji, &result.title));
            lines.push(String::new());
            lines.push(result.answer.clone());
            lines.push(String::new());

            if !result.citations.is_empty() {
                lines.push("**Sources:**".to_string());
                for (j, url) in result.citations.iter().enumerate() {
                    lines.push(format!("{}. {url}", j + 1));
                }
                lines.push(String::new());
            }

            lines.push("---".to_string());
            lines.push(String::new());
        }
    }

    lines.push(format!(
        "*Generated at {} by techdigest*",
        ctx.local_timestamp()
    ));
    lines.join("\n")
}

fn heading(emoji: &str, title: &str) -> String {
    if emoji.is_empty() {
        format!("### {title}")
    } else {
        format!("### {emoji} {title}")
    }
}

/// Build the single composite prompt sent to the summarizer.
///
/// Every configured query appears under its section, with
/// [`MISSING_ANSWER`] standing in for absent results. The configured
/// `summary.output_format` closes the prompt, resolved against the context
/// bindings plus `date`.
#[must_use]
pub fn build_summary_prompt(
    ctx: &RunContext,
    results: &BTreeMap<String, TopicQueryResult>,
) -> String {
    let config = &ctx.config;
    let date = ctx.date_key();
    let mut lines: Vec<String> = vec![
        format!("Below are the raw AI tech community reactions collected today ({date})."),
        "Summarize them section by section.".to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for (i, section) in config.sections.iter().enumerate() {
        lines.push(format!("## Section {}: {}", i + 1, section.title));
        lines.push(String::new());

        for query in &section.queries {
            let answer = results
                .get(&query.id)
                .map_or(MISSING_ANSWER, |r| r.answer.as_str());
            lines.push(format!("### {}", query.title));
            lines.push(answer.to_string());
            lines.push(String::new());
        }

        lines.push("---".to_string());
        lines.push(String::new());
    }

    if !config.summary.output_format.is_empty() {
        let mut bindings = bindings_from_context(&config.context);
        bindings.insert("date".to_string(), date);
        lines.push(resolve(&config.summary.output_format, &bindings));
    }

    lines.join("\n")
}

/// Trailer appended to the summary file.
#[must_use]
pub fn summary_footer(model: &str, input_tokens: u64, output_tokens: u64) -> String {
    format!(
        "\n\n---\n*Summarized by {model} | Input: {input_tokens} / Output: {output_tokens} tokens*\n"
    )
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
