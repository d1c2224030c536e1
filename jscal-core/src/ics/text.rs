//! Comma-separated TEXT lists (RFC 5545 section 3.3.11).
//!
//! The `icalendar` parser decodes TEXT values itself, which turns an escaped
//! `\,` inside a CATEGORIES entry into the same comma that separates
//! entries. Before parsing, CATEGORIES lines get their `\\` and `\,` escapes
//! doubled so that they survive that decoding and [`split_list`] can still
//! tell the two commas apart.

const LIST_PROPERTIES: [&str; 1] = ["CATEGORIES"];

/// Doubles the backslash and comma escapes in the values of list properties.
///
/// `content` must already be unfolded.
pub(crate) fn preserve_list_escapes(content: &str) -> String {
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        match list_value_start(line) {
            Some(at) => {
                out.push_str(&line[..at]);
                double_list_escapes(&line[at..], &mut out);
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Byte offset just past the `:` that starts a list property's value.
fn list_value_start(line: &str) -> Option<usize> {
    let name = LIST_PROPERTIES.iter().find(|name| line.starts_with(*name))?;
    if !matches!(line.as_bytes().get(name.len()), Some(b':' | b';')) {
        return None;
    }

    let mut quoted = false;
    for (i, c) in line.char_indices().skip(name.len()) {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn double_list_escapes(value: &str, out: &mut String) {
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(e @ ('\\' | ',')) => {
                out.push_str("\\\\\\");
                out.push(e);
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
}

/// Splits a decoded list value on its unescaped commas.
///
/// Entries are trimmed and empty entries dropped.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => entries.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    entries.push(current);

    entries
        .iter()
        .map(|entry| unescape_entry(entry.trim()))
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Undoes the escapes left by [`preserve_list_escapes`]. Anything else is kept.
fn unescape_entry(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    let mut chars = entry.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(e @ ('\\' | ',')) => out.push(e),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
