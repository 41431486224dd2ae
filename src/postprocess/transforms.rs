//! Pure text transforms used by the post-processing pipeline
//!
//! Each transform is idempotent on its own. Fenced code blocks (``` or ~~~)
//! are tracked so that prose repairs never touch code.

use regex::Regex;
use std::sync::LazyLock;

/// Shell commands recognised after a glued comment inside code blocks
static COMMENT_COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\s*#[^\n]*?[^\s#])((?:sudo|docker|npm|git|curl|ssh|apt|dnf|pip|python|bash)\b.*)$",
    )
    .unwrap()
});

/// A `$ ` prompt followed by a command name
static PROMPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$ [A-Za-z./~]").unwrap());

/// An ATX level-1 heading
static ATX_H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[ \t]+\S").unwrap());

/// A setext level-1 underline
static SETEXT_H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^=+[ \t]*$").unwrap());

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Flags each line with whether it belongs to a fenced block (fences included)
fn code_mask(lines: &[&str]) -> Vec<bool> {
    let mut in_fence = false;
    lines
        .iter()
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                true
            } else {
                in_fence
            }
        })
        .collect()
}

/// Rejoins words split by a hard line break
///
/// A line break between a lowercase letter and a lowercase letter is
/// removed, so `effi\ncace` becomes `efficace`. Heading lines are never
/// extended.
pub fn repair_word_breaks(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let code = code_mask(&lines);
    let mut out = String::with_capacity(text.len());

    for (i, line) in lines.iter().enumerate() {
        out.push_str(line);
        let Some(next) = lines.get(i + 1) else {
            break;
        };

        let ends_lower = line.chars().last().is_some_and(char::is_lowercase);
        let starts_lower = next.chars().next().is_some_and(char::is_lowercase);
        let heading = line.trim_start().starts_with('#');
        let joinable = !code[i] && !code[i + 1] && !heading && ends_lower && starts_lower;

        if !joinable {
            out.push('\n');
        }
    }

    out
}

/// Splits shell commands that rendering glued onto one line
///
/// Only lines inside fenced code blocks are touched. On a line that starts
/// with a `$ ` prompt, each further prompt outside quotes starts a new line.
/// A known command glued to the end of a `#` comment is split off too.
pub fn repair_code_blocks(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let code = code_mask(&lines);
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for (line, in_code) in lines.iter().zip(code) {
        if !in_code || is_fence(line) {
            out.push(line.to_string());
            continue;
        }
        split_commands(line, &mut out);
    }

    out.join("\n")
}

fn split_commands(line: &str, out: &mut Vec<String>) {
    if let Some(caps) = COMMENT_COMMAND_RE.captures(line) {
        out.push(caps[1].to_string());
        split_commands(&caps[2], out);
        return;
    }

    if !line.trim_start().starts_with("$ ") {
        out.push(line.to_string());
        return;
    }

    let mut start = 0;
    for prompt in PROMPT_RE.find_iter(line) {
        let segment = &line[start..prompt.start()];
        if segment.trim().is_empty() || !quotes_balanced(segment) {
            continue;
        }
        out.push(segment.trim_end().to_string());
        start = prompt.start();
    }
    out.push(line[start..].to_string());
}

fn quotes_balanced(text: &str) -> bool {
    text.matches('"').count() % 2 == 0 && text.matches('\'').count() % 2 == 0
}

/// Strips trailing whitespace and collapses blank line runs
///
/// Whitespace-only lines become empty, consecutive blank lines collapse to
/// a single one, and leading and trailing blank lines are dropped. Non-empty
/// output ends with exactly one newline.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim_end) {
        let blank = line.is_empty();
        let previous_blank = lines.last().map_or(true, |l| l.is_empty());
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Deletes the first level-1 heading, ATX (`# Title`) or setext
/// (`Title` over `===`)
///
/// Later headings, including other level-1 headings, are kept verbatim.
/// Leading blank lines left behind are removed.
pub fn remove_first_heading(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let code = code_mask(&lines);

    let heading = (0..lines.len()).find_map(|i| {
        if code[i] {
            return None;
        }
        if ATX_H1_RE.is_match(lines[i]) {
            return Some(i..i + 1);
        }
        let underlined = !lines[i].trim().is_empty()
            && lines.get(i + 1).is_some_and(|next| SETEXT_H1_RE.is_match(next))
            && !code.get(i + 1).copied().unwrap_or(false);
        underlined.then_some(i..i + 2)
    });

    let Some(range) = heading else {
        return text.to_string();
    };

    let start = range.start;
    lines.drain(range);

    // Avoid leaving a double blank line where the heading was
    let blank_before = start > 0 && lines[start - 1].trim().is_empty();
    let blank_after = lines.get(start).is_some_and(|l| l.trim().is_empty());
    if blank_before && blank_after {
        lines.remove(start);
    }

    let first_content = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    lines[first_content..].join("\n")
}
