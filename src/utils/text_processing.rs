//! Text processing utilities.
//!
//! This module contains utilities for turning free-form assistant replies
//! into task lines that fit the task file format.

use log::*;
use regex::Regex;

/// Leading list markers an assistant typically puts before an item: bullets,
/// numbering and checkboxes.
///
const LIST_MARKER: &str = r"^\s*(?:[-*•·+]\s+|\d+[.)]\s+|\[[ xX]?\]\s+)+";

/// Turn a reply into one task text per non-empty line.
///
/// List markers are stripped, the record separator `||` is collapsed and
/// surrounding whitespace is trimmed. Lines that end up empty, as well as
/// fenced code markers, are dropped.
///
/// # Arguments
/// * `reply` - The assistant's reply text
///
/// # Returns
/// The task texts in reply order.
pub fn parse_task_lines(reply: &str) -> Vec<String> {
    let marker = match Regex::new(LIST_MARKER) {
        Ok(r) => Some(r),
        Err(e) => {
            warn!("Failed to compile regex pattern '{}': {}", LIST_MARKER, e);
            None
        }
    };
    reply
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .map(|line| match &marker {
            Some(re) => re.replace(line, "").to_string(),
            None => line.to_string(),
        })
        .map(|line| sanitize_task_text(&line))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Make arbitrary text safe to store as a task: single line, no separator,
/// trimmed.
///
pub fn sanitize_task_text(text: &str) -> String {
    let mut clean = text.replace(['\r', '\n'], " ");
    while clean.contains("||") {
        clean = clean.replace("||", "|");
    }
    clean.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_lines_strips_bullets() {
        let reply = "- Buy milk\n* Call mom\n• Water plants";
        assert_eq!(
            parse_task_lines(reply),
            vec!["Buy milk", "Call mom", "Water plants"]
        );
    }

    #[test]
    fn test_parse_task_lines_strips_numbering() {
        let reply = "1. Write report\n2) Send invoice\n10. Review PR";
        assert_eq!(
            parse_task_lines(reply),
            vec!["Write report", "Send invoice", "Review PR"]
        );
    }

    #[test]
    fn test_parse_task_lines_strips_checkboxes() {
        let reply = "- [ ] Pack bags\n[x] Book hotel";
        assert_eq!(parse_task_lines(reply), vec!["Pack bags", "Book hotel"]);
    }

    #[test]
    fn test_parse_task_lines_skips_blank_lines_and_fences() {
        let reply = "```\n\nFix bike\n   \n```";
        assert_eq!(parse_task_lines(reply), vec!["Fix bike"]);
    }

    #[test]
    fn test_parse_task_lines_keeps_inner_dashes() {
        let reply = "Call mom - about Sunday";
        assert_eq!(parse_task_lines(reply), vec!["Call mom - about Sunday"]);
    }

    #[test]
    fn test_sanitize_task_text_removes_separator() {
        assert_eq!(sanitize_task_text("  a||b|||c "), "a|b|c");
    }
}
