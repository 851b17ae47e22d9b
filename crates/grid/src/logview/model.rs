//! Model — the parsed log document handed to the rendering layer.

use serde::Serialize;

/// Semantic category of a block's lines, derived from the two-character
/// line prefix written by the job scripts. Lines with no recognized
/// prefix fall back to `Plain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Stdout,
    Stderr,
    Info,
    Command,
    Plain,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Stdout => "stdout",
            BlockKind::Stderr => "stderr",
            BlockKind::Info => "info",
            BlockKind::Command => "command",
            BlockKind::Plain => "plain",
        }
    }
}

/// A maximal run of consecutive same-kind lines. Payloads are stored in
/// input order, prefix stripped and right-trimmed, blank lines kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub lines: Vec<String>,
}

/// A titled, ordered group of blocks. `line_count` is the sum of lines
/// across all blocks; title lines are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
    pub line_count: usize,
}

/// Parsed view of one job's log file. Built fresh per request from the
/// on-disk file and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct LogDocument {
    pub sections: Vec<Section>,
}

impl LogDocument {
    /// Total content lines across all sections.
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.line_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
