//! Markdown output files under `digest/`.

use std::path::Path;

use anyhow::Context;

/// Write `content` to `path`, creating parent directories as needed.
pub(crate) fn write_markdown(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// First `max_chars` characters of `text`, on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}
