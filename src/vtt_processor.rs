use once_cell::sync::Lazy;
use regex::Regex;

// @module: WebVTT cue-stream processing

// @const: VTT cue timing regex (HH:MM:SS.mmm --> HH:MM:SS.mmm, trailing cue
// settings tolerated because only the timestamp pair is matched)
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}\s+-->\s+\d{2}:\d{2}:\d{2}\.\d{3}").unwrap()
});

/// Block-level constructs whose content is never emitted as transcript text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipBlock {
    Note,
    Style,
    Region,
}

/// Check whether a line is a cue timing line.
/// Lines that merely resemble timings but do not match the pattern are
/// treated as ordinary text by the extractor; that tolerance is intentional.
pub fn is_timing_line(line: &str) -> bool {
    TIMING_REGEX.is_match(line)
}

/// Extract normalized plain text from a stream of raw VTT lines.
///
/// Single pass with a skip-block state machine:
/// - `WEBVTT` headers, cue timings and cue sequence numbers are discarded
/// - `NOTE` / `STYLE` / `REGION` blocks are discarded wholesale; a timing
///   line always ends the current block
/// - a blank line becomes a pending paragraph break; it is cancelled by cue
///   metadata (header, sequence number, timing) and materialized only when
///   the next emitted line is ordinary text, so blanks that merely separate
///   cue blocks do not split the transcript
///
/// The result never contains consecutive duplicate lines (a common artifact
/// of rolling-caption VTTs) nor more than one consecutive blank line, and is
/// trimmed as a whole.
pub fn extract_plain_text<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    let mut skip_block: Option<SkipBlock> = None;
    let mut pending_break = false;

    for raw in lines {
        let line = raw.as_ref().trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // Candidate paragraph break; a blank does not end a block
            if !out.is_empty() {
                pending_break = true;
            }
            continue;
        }

        let upper = trimmed.to_uppercase();

        if upper.starts_with("WEBVTT") {
            pending_break = false;
            continue;
        }
        if is_timing_line(trimmed) {
            // A timing line always ends the current block; the blank before
            // it separated cues, not paragraphs
            skip_block = None;
            pending_break = false;
            continue;
        }
        if upper.starts_with("NOTE") {
            skip_block = Some(SkipBlock::Note);
            continue;
        }
        if upper.starts_with("STYLE") {
            skip_block = Some(SkipBlock::Style);
            continue;
        }
        if upper.starts_with("REGION") {
            skip_block = Some(SkipBlock::Region);
            continue;
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            // Cue sequence number; does not affect the current block
            pending_break = false;
            continue;
        }

        if skip_block.is_some() {
            // Block content is not emitted
            continue;
        }

        if pending_break {
            out.push(String::new());
            pending_break = false;
        }
        out.push(trimmed.to_string());
    }

    // Remove duplicate consecutive lines sometimes present in VTTs
    let mut cleaned: Vec<String> = Vec::new();
    for line in out {
        if cleaned.last() == Some(&line) {
            continue;
        }
        cleaned.push(line);
    }

    cleaned.join("\n").trim().to_string()
}

/// Convenience wrapper over [`extract_plain_text`] for whole-file content
pub fn extract_from_str(content: &str) -> String {
    extract_plain_text(content.lines())
}
