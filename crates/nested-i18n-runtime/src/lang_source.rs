//! Parser for `.lang` sources: one `key=value` per logical line, with the
//! usual properties-file comments, continuations and escapes.

use std::collections::BTreeMap;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub key: String,
    pub value: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

pub fn parse_lang_source(input: &str) -> Result<Vec<SourceEntry>, SourceError> {
    let mut entries = Vec::new();
    let mut lines = input.lines().enumerate();

    while let Some((idx, raw_line)) = lines.next() {
        let line_no = (idx + 1) as u32;
        let trimmed = raw_line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;
        entries.push(SourceEntry {
            key,
            value,
            line: line_no,
        });
    }

    Ok(entries)
}

/// Parses a source into an id → template map; later duplicates win.
pub fn parse_lang_templates(input: &str) -> Result<BTreeMap<String, String>, SourceError> {
    let mut templates = BTreeMap::new();
    for entry in parse_lang_source(input)? {
        templates.insert(entry.key, entry.value);
    }
    Ok(templates)
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|byte| *byte == b'\\').count();
    trailing % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut separator = None;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                separator = Some(ch);
                break;
            }
            ch if ch.is_whitespace() => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = &line[key_end..];
    if separator.is_some() {
        rest = &rest[1..];
    } else {
        rest = rest.trim_start();
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped;
        }
    }
    (key, rest.trim_start())
}

fn unescape(raw: &str, line: u32) -> Result<String, SourceError> {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut column = 0u32;
    while let Some(ch) = chars.next() {
        column += 1;
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        column += 1;
        match escaped {
            't' => output.push('\t'),
            'n' => output.push('\n'),
            'r' => output.push('\r'),
            'f' => output.push('\u{c}'),
            'u' => {
                let decoded = read_unicode(&mut chars, line, column)?;
                column += 4;
                output.push(decoded);
            }
            other => output.push(other),
        }
    }
    Ok(output)
}

fn read_unicode(chars: &mut Chars<'_>, line: u32, column: u32) -> Result<char, SourceError> {
    let high = read_hex4(chars, line, column)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high as u32).ok_or_else(|| malformed(line, column));
    }

    // A high surrogate must be followed by an escaped low surrogate.
    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(malformed(line, column));
    }
    let low = read_hex4(chars, line, column)?;
    char::decode_utf16([high, low])
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| malformed(line, column))
}

fn read_hex4(chars: &mut Chars<'_>, line: u32, column: u32) -> Result<u16, SourceError> {
    let mut value = 0u16;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or_else(|| malformed(line, column))?;
        value = (value << 4) | digit as u16;
    }
    Ok(value)
}

fn malformed(line: u32, column: u32) -> SourceError {
    SourceError {
        message: "malformed \\uXXXX escape".to_string(),
        line,
        column,
    }
}
