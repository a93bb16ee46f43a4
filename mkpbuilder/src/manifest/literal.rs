//! Python literal rendering.
//!
//! Produces the same layout as Python's `pprint.pformat(value, indent=4,
//! width=80)`: a value that fits in the remaining width is written on one
//! line, otherwise dicts and lists place one entry per line and long strings
//! are split into adjacent literals at whitespace boundaries.

use serde_json::{Map, Value};

/// Maximum line width.
const WIDTH: usize = 80;

/// Indentation added per nesting level.
const INDENT_PER_LEVEL: usize = 4;

/// Render `value` as a pretty-printed Python literal.
///
/// ```
/// use mkpbuilder::manifest::to_python_literal;
/// use serde_json::json;
///
/// assert_eq!(to_python_literal(&json!({"a": null, "b": ["x"]})), "{'a': None, 'b': ['x']}");
/// ```
pub fn to_python_literal(value: &Value) -> String {
    let mut out = String::new();
    format_value(value, &mut out, 0, 0, 0);
    out
}

/// Python `repr()` of a string.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote. Printable non-ASCII characters are kept as-is; everything
/// `str.isprintable` rejects is escaped.
pub fn python_repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Python's `str.isprintable` for one character.
///
/// Non-printable means the Other and Separator categories, except the ASCII
/// space. `str::escape_debug` escapes exactly those, plus grapheme extenders
/// at the start of the string, hence the leading `a`.
fn is_printable(c: char) -> bool {
    if c.is_ascii() {
        return !c.is_ascii_control();
    }
    let pair: String = ['a', c].iter().collect();
    pair.escape_debug().count() == 2
}

/// Single-line representation.
fn repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python_repr_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", python_repr_str(k), repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn format_value(value: &Value, out: &mut String, indent: usize, allowance: usize, level: usize) {
    let rep = repr(value);
    let max_width = WIDTH.saturating_sub(indent + allowance);
    if width_of(&rep) > max_width {
        match value {
            Value::Object(map) if !map.is_empty() => {
                return format_dict(map, out, indent, allowance, level + 1);
            }
            Value::Array(items) if !items.is_empty() => {
                return format_list(items, out, indent, allowance, level + 1);
            }
            Value::String(s) if !s.is_empty() => {
                return format_str(s, out, indent, allowance, level + 1);
            }
            _ => {}
        }
    }
    out.push_str(&rep);
}

fn format_dict(
    map: &Map<String, Value>,
    out: &mut String,
    indent: usize,
    allowance: usize,
    level: usize,
) {
    out.push('{');
    out.push_str(&" ".repeat(INDENT_PER_LEVEL - 1));

    let indent = indent + INDENT_PER_LEVEL;
    let allowance = allowance + 1;
    let delimiter = format!(",\n{}", " ".repeat(indent));
    let last_index = map.len() - 1;

    for (i, (key, value)) in map.iter().enumerate() {
        let last = i == last_index;
        let key_rep = python_repr_str(key);
        out.push_str(&key_rep);
        out.push_str(": ");
        format_value(
            value,
            out,
            indent + width_of(&key_rep) + 2,
            if last { allowance } else { 1 },
            level,
        );
        if !last {
            out.push_str(&delimiter);
        }
    }
    out.push('}');
}

fn format_list(items: &[Value], out: &mut String, indent: usize, allowance: usize, level: usize) {
    out.push('[');
    out.push_str(&" ".repeat(INDENT_PER_LEVEL - 1));

    let indent = indent + INDENT_PER_LEVEL;
    let allowance = allowance + 1;
    let delimiter = format!(",\n{}", " ".repeat(indent));
    let last_index = items.len() - 1;

    for (i, item) in items.iter().enumerate() {
        let last = i == last_index;
        if i > 0 {
            out.push_str(&delimiter);
        }
        format_value(item, out, indent, if last { allowance } else { 1 }, level);
    }
    out.push(']');
}

fn format_str(s: &str, out: &mut String, mut indent: usize, mut allowance: usize, level: usize) {
    // Only a top-level string needs parentheses to stay one expression.
    let top_level = level == 1;
    if top_level {
        indent += 1;
        allowance += 1;
    }

    let max_width = WIDTH.saturating_sub(indent);
    let lines = split_lines_keep_ends(s);
    let mut chunks = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let last_line = i == lines.len() - 1;
        let line_width = if last_line {
            max_width.saturating_sub(allowance)
        } else {
            max_width
        };

        let rep = python_repr_str(line);
        if width_of(&rep) <= line_width {
            chunks.push(rep);
            continue;
        }

        let parts = split_words(line);
        let mut current = String::new();
        for (j, part) in parts.iter().enumerate() {
            let part_width = if last_line && j == parts.len() - 1 {
                max_width.saturating_sub(allowance)
            } else {
                max_width
            };
            let candidate = format!("{}{}", current, part);
            if width_of(&python_repr_str(&candidate)) > part_width {
                if !current.is_empty() {
                    chunks.push(python_repr_str(&current));
                }
                current = (*part).to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            chunks.push(python_repr_str(&current));
        }
    }

    if chunks.len() == 1 {
        out.push_str(&python_repr_str(s));
        return;
    }

    if top_level {
        out.push('(');
    }
    let separator = format!("\n{}", " ".repeat(indent));
    out.push_str(&chunks.join(&separator));
    if top_level {
        out.push(')');
    }
}

/// Split after each line break, keeping the terminator.
fn split_lines_keep_ends(s: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&s[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(&s[start..=end]);
                start = end + 1;
                i = end;
            }
            _ => {}
        }
        i += 1;
    }
    if start < s.len() {
        lines.push(&s[start..]);
    }
    lines
}

/// Split into runs of non-whitespace each followed by its trailing whitespace.
fn split_words(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            parts.push(&line[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < line.len() {
        parts.push(&line[start..]);
    }
    parts
}
