//! Document loading and index file persistence.
//!
//! Reads are one bulk read; writes render the whole file in memory and hit
//! the disk once.

use std::path::Path;

use tracing::{debug, instrument};

use mdindex_shared::{
    Document, IndexLayout, MAX_HEADING_LEVEL, MdIndexError, Result, SectionEntry,
};

/// Read a UTF-8 Markdown file into a [`Document`].
#[instrument]
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|e| MdIndexError::input(path, e))?;
    let text = String::from_utf8(bytes).map_err(|source| MdIndexError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let doc = Document::from_text(&text);
    debug!(lines = doc.len(), "document loaded");
    Ok(doc)
}

/// Render entries as the JSON index file body.
pub fn render_index(entries: &[SectionEntry], layout: IndexLayout) -> Result<String> {
    let mut out = match layout {
        IndexLayout::Pretty => serde_json::to_string_pretty(entries)
            .map_err(|e| MdIndexError::Serialize(e.to_string()))?,
        IndexLayout::Records => {
            if entries.is_empty() {
                "[]".to_string()
            } else {
                let records = entries
                    .iter()
                    .map(|e| serde_json::to_string(e).map(|r| format!("  {r}")))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| MdIndexError::Serialize(e.to_string()))?;
                format!("[\n{}\n]", records.join(",\n"))
            }
        }
    };
    out.push('\n');
    Ok(out)
}

/// Write the index file, creating parent directories as needed.
#[instrument(skip(entries), fields(entries = entries.len()))]
pub fn write_index(path: &Path, entries: &[SectionEntry], layout: IndexLayout) -> Result<()> {
    let body = render_index(entries, layout)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MdIndexError::io(parent, e))?;
    }
    std::fs::write(path, body).map_err(|e| MdIndexError::io(path, e))?;

    debug!(?path, "index written");
    Ok(())
}

/// Parse an index file body. `path` is only used for error context.
pub fn parse_index(path: &Path, text: &str) -> Result<Vec<SectionEntry>> {
    let entries: Vec<SectionEntry> =
        serde_json::from_str(text).map_err(|e| MdIndexError::malformed(path, e.to_string()))?;

    for (i, entry) in entries.iter().enumerate() {
        if !(1..=MAX_HEADING_LEVEL).contains(&entry.level) {
            return Err(MdIndexError::malformed(
                path,
                format!("record {i} has level {} outside 1..=6", entry.level),
            ));
        }
        if entry.line == 0 {
            return Err(MdIndexError::malformed(
                path,
                format!("record {i} has line 0; lines are 1-based"),
            ));
        }
    }

    Ok(entries)
}

/// Read and validate an index file.
#[instrument]
pub fn load_index(path: &Path) -> Result<Vec<SectionEntry>> {
    let text = std::fs::read_to_string(path).map_err(|e| MdIndexError::input(path, e))?;
    let entries = parse_index(path, &text)?;
    debug!(entries = entries.len(), "index loaded");
    Ok(entries)
}
