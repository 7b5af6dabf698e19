//! Conversion of scraped description text into Notion body blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MAX_BLOCK_TEXT_LEN;
use crate::notion::Block;

/// Leading bullet marker: a bullet character or hyphen followed by whitespace.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-]\s").unwrap());

/// Convert a newline-delimited description into paragraph and bulleted-list
/// blocks.
///
/// Consecutive bullet lines are collected into a list group which is flushed
/// when a plain line (or the end of input) is reached. Blank lines are
/// dropped and do not end a list group.
#[must_use]
pub fn format_description(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(marker) = BULLET_RE.find(line) {
            let item = line[marker.end()..].trim();
            if !item.is_empty() {
                list.push(item);
            }
        } else {
            flush_list(&mut blocks, &mut list);
            push_split(&mut blocks, Block::Paragraph, line);
        }
    }
    flush_list(&mut blocks, &mut list);

    blocks
}

fn flush_list(blocks: &mut Vec<Block>, list: &mut Vec<&str>) {
    for item in list.drain(..) {
        push_split(blocks, Block::BulletedListItem, item);
    }
}

/// Emit `text` as one or more blocks of the same kind, each within the
/// per-block character limit.
fn push_split(blocks: &mut Vec<Block>, make: fn(String) -> Block, text: &str) {
    blocks.extend(split_text(text, MAX_BLOCK_TEXT_LEN).into_iter().map(make));
}

/// Split `text` into consecutive chunks of at most `max_units` UTF-16 code
/// units, the unit Notion measures rich text length in.
///
/// Splits fall at fixed offsets, not word boundaries. A character is never
/// divided, so a chunk ends early rather than cutting a surrogate pair.
#[must_use]
pub fn split_text(text: &str, max_units: usize) -> Vec<String> {
    if text.is_empty() || max_units == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut units = 0;
    for c in text.chars() {
        let width = c.len_utf16();
        if units + width > max_units && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            units = 0;
        }
        current.push(c);
        units += width;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Body appended to a posting that already exists.
#[must_use]
pub fn description_section(description: &str) -> Vec<Block> {
    let mut blocks = vec![
        Block::TableOfContents,
        Block::Heading1("Job Description".to_string()),
    ];
    blocks.extend(format_description(description));
    blocks
}

/// Body appended to a newly created posting: the description section followed
/// by empty headings for application notes.
#[must_use]
pub fn new_posting_body(description: &str) -> Vec<Block> {
    let mut blocks = description_section(description);
    blocks.extend(application_tracking_skeleton());
    blocks
}

fn application_tracking_skeleton() -> Vec<Block> {
    let h1 = |t: &str| Block::Heading1(t.to_string());
    let h2 = |t: &str| Block::Heading2(t.to_string());
    vec![
        h1("Job Application"),
        h2("CV"),
        h2("Portfolio"),
        h1("Test"),
        h2("Test Preparation"),
        h2("Process Review"),
        h1("Interview"),
        h2("Preparation"),
        h2("Process Review"),
    ]
}
