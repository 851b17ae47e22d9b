//! Parse — single-pass sectionizer for prefixed job logs.
//!
//! The input is partitioned into maximal runs of consecutive lines that
//! share the same prefix classification. Each run becomes either a block
//! of the current section or, for `S:` runs, the title of the next one.
//! Sections that end up with no blocks are dropped, including the
//! implicit leading "Log" section and a dangling trailing title.
//!
//! Parsing is a pure function over an already-materialized line
//! sequence: it never fails, performs no I/O, and owns all of its
//! accumulator state, so concurrent calls need no coordination.

use super::model::{Block, BlockKind, LogDocument, Section};

/// Prefix classification of a single line. The two leading bytes must
/// match a recognized tag exactly (case-sensitive); anything else is
/// untagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Stdout,
    Stderr,
    Info,
    Command,
    SectionTitle,
    Untagged,
}

impl Class {
    fn of(line: &str) -> Self {
        match line.as_bytes() {
            [b'O', b':', ..] => Class::Stdout,
            [b'E', b':', ..] => Class::Stderr,
            [b'I', b':', ..] => Class::Info,
            [b'C', b':', ..] => Class::Command,
            [b'S', b':', ..] => Class::SectionTitle,
            _ => Class::Untagged,
        }
    }

    /// Byte length of the matched prefix. Recognized prefixes are ASCII,
    /// so stripping them never splits a UTF-8 sequence.
    fn prefix_len(self) -> usize {
        match self {
            Class::Untagged => 0,
            _ => 2,
        }
    }

    /// Block kind this classification maps to; `None` for title runs.
    fn kind(self) -> Option<BlockKind> {
        match self {
            Class::Stdout => Some(BlockKind::Stdout),
            Class::Stderr => Some(BlockKind::Stderr),
            Class::Info => Some(BlockKind::Info),
            Class::Command => Some(BlockKind::Command),
            Class::Untagged => Some(BlockKind::Plain),
            Class::SectionTitle => None,
        }
    }
}

/// Section accumulator. Owned by the parsing pass and invisible to
/// callers until finalized into the output.
struct SectionBuilder {
    title: String,
    blocks: Vec<Block>,
    line_count: usize,
}

impl SectionBuilder {
    fn new(title: String) -> Self {
        Self {
            title,
            blocks: Vec::new(),
            line_count: 0,
        }
    }

    fn finish(self) -> Section {
        Section {
            title: self.title,
            blocks: self.blocks,
            line_count: self.line_count,
        }
    }
}

/// Parse a log's lines into its sectioned document.
///
/// Lines are expected in file order, without embedded newlines. Blank
/// lines are content like any other; the whole input is consumed before
/// the document is returned.
pub fn parse_log<'a, I>(lines: I) -> LogDocument
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections: Vec<Section> = Vec::new();
    let mut current = SectionBuilder::new("Log".to_string());

    let mut run_class: Option<Class> = None;
    let mut run: Vec<String> = Vec::new();

    for line in lines {
        let class = Class::of(line);
        if run_class != Some(class) {
            if let Some(prev) = run_class {
                flush_run(prev, std::mem::take(&mut run), &mut current, &mut sections);
            }
            run_class = Some(class);
        }
        run.push(line[class.prefix_len()..].trim_end().to_string());
    }
    if let Some(prev) = run_class {
        flush_run(prev, run, &mut current, &mut sections);
    }

    // A trailing title run leaves an empty accumulator behind; it is
    // dropped here rather than surfaced as an empty section.
    if !current.blocks.is_empty() {
        sections.push(current.finish());
    }

    LogDocument { sections }
}

/// Fold one completed run into the accumulator state. Title runs
/// finalize the current section (if it has content) and start the next;
/// every other run appends a block.
fn flush_run(
    class: Class,
    payload: Vec<String>,
    current: &mut SectionBuilder,
    sections: &mut Vec<Section>,
) {
    match class.kind() {
        None => {
            let title = payload.concat().trim().to_string();
            let previous = std::mem::replace(current, SectionBuilder::new(title));
            if !previous.blocks.is_empty() {
                sections.push(previous.finish());
            }
        }
        Some(kind) => {
            current.line_count += payload.len();
            current.blocks.push(Block {
                kind,
                lines: payload,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> LogDocument {
        parse_log(lines.iter().copied())
    }

    fn block(kind: BlockKind, lines: &[&str]) -> Block {
        Block {
            kind,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    // ─── Basic sectioning ───────────────────────────────────────

    #[test]
    fn test_titled_sections_with_typed_blocks() {
        let doc = parse(&["S:Build", "O:hello", "O:world", "S:Test", "E:fail"]);

        assert_eq!(doc.sections.len(), 2);

        assert_eq!(doc.sections[0].title, "Build");
        assert_eq!(doc.sections[0].line_count, 2);
        assert_eq!(
            doc.sections[0].blocks,
            vec![block(BlockKind::Stdout, &["hello", "world"])]
        );

        assert_eq!(doc.sections[1].title, "Test");
        assert_eq!(doc.sections[1].line_count, 1);
        assert_eq!(
            doc.sections[1].blocks,
            vec![block(BlockKind::Stderr, &["fail"])]
        );
    }

    #[test]
    fn test_no_titles_yields_single_log_section() {
        let doc = parse(&["plain line", "O:out1", "plain2"]);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Log");
        assert_eq!(doc.sections[0].line_count, 3);
        assert_eq!(
            doc.sections[0].blocks,
            vec![
                block(BlockKind::Plain, &["plain line"]),
                block(BlockKind::Stdout, &["out1"]),
                block(BlockKind::Plain, &["plain2"]),
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        let doc = parse(&[]);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_all_five_kinds_map() {
        let doc = parse(&["O:a", "E:b", "I:c", "C:d", "e"]);
        let kinds: Vec<BlockKind> = doc.sections[0].blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Stdout,
                BlockKind::Stderr,
                BlockKind::Info,
                BlockKind::Command,
                BlockKind::Plain,
            ]
        );
    }

    // ─── Title handling ─────────────────────────────────────────

    #[test]
    fn test_consecutive_title_lines_concatenate() {
        // A run of title lines forms one title: payloads joined with no
        // separator, then trimmed.
        let doc = parse(&["S:Building ", "S:containers", "O:done"]);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Building containers");
    }

    #[test]
    fn test_each_title_with_content_emits_a_section() {
        let doc = parse(&["S:A", "x", "S:B", "O:y"]);

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].title, "A");
        assert_eq!(doc.sections[0].blocks, vec![block(BlockKind::Plain, &["x"])]);
        assert_eq!(doc.sections[1].title, "B");
        assert_eq!(doc.sections[1].blocks, vec![block(BlockKind::Stdout, &["y"])]);
    }

    #[test]
    fn test_trailing_title_is_dropped() {
        let doc = parse(&["O:output", "S:Never started"]);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Log");
        assert_eq!(doc.sections[0].line_count, 1);
    }

    #[test]
    fn test_only_titles_yields_no_sections() {
        let doc = parse(&["S:A", "S:B"]);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_leading_log_section_dropped_when_empty() {
        let doc = parse(&["S:First", "O:x"]);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "First");
    }

    #[test]
    fn test_title_whitespace_trimmed() {
        let doc = parse(&["S:  padded title  ", "O:x"]);
        assert_eq!(doc.sections[0].title, "padded title");
    }

    // ─── Grouping ───────────────────────────────────────────────

    #[test]
    fn test_consecutive_same_kind_lines_merge() {
        let doc = parse(&["O:1", "O:2", "O:3"]);
        assert_eq!(doc.sections[0].blocks.len(), 1);
        assert_eq!(doc.sections[0].blocks[0].lines, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_stray_line_interrupts_run() {
        // One differently-tagged line splits the surrounding run into
        // three blocks, never one.
        let doc = parse(&["O:a", "E:oops", "O:b"]);

        assert_eq!(
            doc.sections[0].blocks,
            vec![
                block(BlockKind::Stdout, &["a"]),
                block(BlockKind::Stderr, &["oops"]),
                block(BlockKind::Stdout, &["b"]),
            ]
        );
    }

    #[test]
    fn test_blocks_never_merge_across_sections() {
        let doc = parse(&["S:A", "O:1", "S:B", "O:2"]);

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].blocks, vec![block(BlockKind::Stdout, &["1"])]);
        assert_eq!(doc.sections[1].blocks, vec![block(BlockKind::Stdout, &["2"])]);
    }

    // ─── Prefix stripping and payloads ──────────────────────────

    #[test]
    fn test_prefix_stripped_and_right_trimmed() {
        let doc = parse(&["O:hello   ", "O:  indented kept"]);
        assert_eq!(doc.sections[0].blocks[0].lines, vec!["hello", "  indented kept"]);
    }

    #[test]
    fn test_blank_lines_kept_verbatim() {
        let doc = parse(&["O:a", "O:", "O:b"]);
        assert_eq!(doc.sections[0].blocks[0].lines, vec!["a", "", "b"]);
        assert_eq!(doc.sections[0].line_count, 3);
    }

    #[test]
    fn test_empty_untagged_lines_are_plain_content() {
        let doc = parse(&["", "", "O:x"]);
        assert_eq!(doc.sections[0].blocks[0], block(BlockKind::Plain, &["", ""]));
        assert_eq!(doc.sections[0].line_count, 3);
    }

    #[test]
    fn test_prefix_must_be_exact() {
        // Lowercase tags, mid-line tags, and bare markers do not match.
        let doc = parse(&["o:nope", " O:nope", "O", "OX:nope"]);
        assert_eq!(doc.sections[0].blocks.len(), 1);
        assert_eq!(doc.sections[0].blocks[0].kind, BlockKind::Plain);
        assert_eq!(doc.sections[0].line_count, 4);
    }

    #[test]
    fn test_short_and_multibyte_lines_classify_as_plain() {
        let doc = parse(&["O", "é", "日本語のログ", "O:ok"]);
        assert_eq!(
            doc.sections[0].blocks,
            vec![
                block(BlockKind::Plain, &["O", "é", "日本語のログ"]),
                block(BlockKind::Stdout, &["ok"]),
            ]
        );
    }

    // ─── Aggregate properties ───────────────────────────────────

    #[test]
    fn test_line_counts_sum_to_non_title_input_lines() {
        let input = [
            "head", "S:One", "O:a", "O:b", "E:c", "S:Two", "I:d", "", "C:e",
        ];
        let doc = parse(&input);

        let title_lines = input.iter().filter(|l| l.starts_with("S:")).count();
        assert_eq!(doc.line_count(), input.len() - title_lines);
    }

    #[test]
    fn test_payloads_reconstruct_input_order() {
        let input = ["x", "O:a", "E:b", "S:T", "O:c", "I:d"];
        let doc = parse(&input);

        let flattened: Vec<String> = doc
            .sections
            .iter()
            .flat_map(|s| s.blocks.iter())
            .flat_map(|b| b.lines.iter().cloned())
            .collect();
        assert_eq!(flattened, vec!["x", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_document_serializes_with_kind_tags() {
        let doc = parse(&["S:Build", "O:hello"]);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            value["sections"][0]["blocks"][0]["kind"],
            serde_json::json!("stdout")
        );
        assert_eq!(value["sections"][0]["title"], serde_json::json!("Build"));
        assert_eq!(value["sections"][0]["line_count"], serde_json::json!(1));
    }
}
