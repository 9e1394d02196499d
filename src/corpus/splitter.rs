//! Corpus file splitter
//!
//! Partitions a monolithic VRT export into one file per document at `<text>`
//! tag boundaries. The `<text_id …>` value names the output file; ids can be
//! filtered by substring so only the wanted corpus sections are materialized.

use std::path::Path;

use regex::Regex;
use tracing::info;

use crate::error::{ExtractError, Result};

/// Configuration for [`split_corpus`].
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Keep only documents whose text id contains one of these substrings.
    /// Empty means keep everything.
    pub keep_id_substrings: Vec<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            keep_id_substrings: vec!["rsta".to_string(), "rstb".to_string()],
        }
    }
}

impl SplitterConfig {
    /// Keep every document regardless of id.
    pub fn keep_all() -> Self {
        Self {
            keep_id_substrings: Vec::new(),
        }
    }

    fn keeps(&self, text_id: &str) -> bool {
        self.keep_id_substrings.is_empty()
            || self.keep_id_substrings.iter().any(|s| text_id.contains(s))
    }
}

/// Counters reported by [`split_corpus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub files_written: usize,
    pub skipped_existing: usize,
    pub skipped_filtered: usize,
}

/// Split `input` into `<out_dir>/<text_id>.vrt` files.
///
/// Each output restores the `<text>` tag that delimited its chunk. Documents
/// whose file already exists are left untouched. Documents without a
/// recognizable `<text_id …>` tag are dropped silently, like documents
/// filtered out by id.
pub fn split_corpus(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &SplitterConfig,
) -> Result<SplitReport> {
    let input = input.as_ref();
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir).map_err(|e| ExtractError::io(out_dir, e))?;

    let content = std::fs::read_to_string(input).map_err(|e| ExtractError::io(input, e))?;
    let id_pattern = Regex::new(r"<text_id\s(.*?)>").expect("static id pattern");

    let mut report = SplitReport::default();
    // The slice before the first <text> tag carries no document.
    for chunk in content.split("<text>").skip(1) {
        let Some(text_id) = id_pattern.captures(chunk).map(|c| c[1].to_string()) else {
            report.skipped_filtered += 1;
            continue;
        };
        if !config.keeps(&text_id) {
            report.skipped_filtered += 1;
            continue;
        }

        let target = out_dir.join(format!("{text_id}.vrt"));
        if target.exists() {
            report.skipped_existing += 1;
            continue;
        }

        let document = format!("<text>\n{}", chunk.trim());
        std::fs::write(&target, document).map_err(|e| ExtractError::io(&target, e))?;
        info!(path = %target.display(), "created document file");
        report.files_written += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> String {
        [
            "<text>",
            "<text_id rsta_001>",
            "<s_s10local 0.1>",
            "word\tword\tNOUN\t_\t_\t0\troot\t1.0\t_",
            "</s_s10local>",
            "</text>",
            "<text>",
            "<text_id other_002>",
            "</text>",
            "<text>",
            "<text_id rstb_003>",
            "</text>",
        ]
        .join("\n")
    }

    #[test]
    fn test_split_writes_filtered_documents() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.vrt");
        std::fs::write(&input, corpus()).unwrap();
        let out = dir.path().join("files");

        let report = split_corpus(&input, &out, &SplitterConfig::default()).unwrap();

        assert_eq!(report.files_written, 2);
        assert_eq!(report.skipped_filtered, 1);
        assert!(out.join("rsta_001.vrt").exists());
        assert!(out.join("rstb_003.vrt").exists());
        assert!(!out.join("other_002.vrt").exists());

        let doc = std::fs::read_to_string(out.join("rsta_001.vrt")).unwrap();
        assert!(doc.starts_with("<text>\n<text_id rsta_001>"));
        assert!(doc.contains("word\tword"));
    }

    #[test]
    fn test_existing_files_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.vrt");
        std::fs::write(&input, corpus()).unwrap();
        let out = dir.path().join("files");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("rsta_001.vrt"), "already here").unwrap();

        let report = split_corpus(&input, &out, &SplitterConfig::default()).unwrap();

        assert_eq!(report.files_written, 1);
        assert_eq!(report.skipped_existing, 1);
        let kept = std::fs::read_to_string(out.join("rsta_001.vrt")).unwrap();
        assert_eq!(kept, "already here");
    }

    #[test]
    fn test_keep_all_ignores_filter() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.vrt");
        std::fs::write(&input, corpus()).unwrap();
        let out = dir.path().join("files");

        let report = split_corpus(&input, &out, &SplitterConfig::keep_all()).unwrap();
        assert_eq!(report.files_written, 3);
    }
}
