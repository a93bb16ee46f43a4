//! Reader for the Python literal subset used by `info` manifests.
//!
//! Supports dicts with string keys, lists, tuples (read as lists), strings
//! with implicit concatenation, integers, `None`, `True` and `False`.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Error reading a Python literal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid Python literal at offset {offset}: {message}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse a Python literal into a JSON value.
///
/// ```
/// use mkpbuilder::manifest::parse_python_literal;
/// use serde_json::json;
///
/// let value = parse_python_literal("{'a': None, 'b': ['x' 'y']}").unwrap();
/// assert_eq!(value, json!({"a": null, "b": ["xy"]}));
/// ```
pub fn parse_python_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        pos: 0,
        len: input.len(),
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
}

impl Parser {
    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|(o, _)| *o).unwrap_or(self.len)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => {
                self.pos -= 1;
                Err(self.error(format!("expected '{}', found '{}'", expected, c)))
            }
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.dict(),
            Some('[') => {
                self.pos += 1;
                Ok(Value::Array(self.sequence(']')?))
            }
            Some('(') => self.parenthesized(),
            Some('\'') | Some('"') => self.strings().map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(key) => key,
                _ => return Err(self.error("dict keys must be strings")),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    /// Items up to `close`; the opening bracket is already consumed.
    fn sequence(&mut self, close: char) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                _ => return Err(self.error(format!("expected ',' or '{}'", close))),
            }
        }
    }

    /// A parenthesized expression or a tuple.
    fn parenthesized(&mut self) -> Result<Value, LiteralError> {
        self.expect('(')?;
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(Value::Array(Vec::new()));
        }

        let first = self.value()?;
        self.skip_whitespace();
        match self.bump() {
            Some(')') => Ok(first),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.sequence(')')?);
                Ok(Value::Array(items))
            }
            _ => Err(self.error("expected ',' or ')'")),
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<String, LiteralError> {
        let mut text = self.string()?;
        loop {
            let save = self.pos;
            self.skip_whitespace();
            match self.peek() {
                Some('\'') | Some('"') => text.push_str(&self.string()?),
                _ => {
                    self.pos = save;
                    return Ok(text);
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };

        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(text),
                Some('\\') => text.push(self.escape()?),
                Some('\n') => return Err(self.error("newline in string")),
                Some(c) => text.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, LiteralError> {
        match self.bump() {
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('x') => self.hex_escape(2),
            Some('u') => self.hex_escape(4),
            Some('U') => self.hex_escape(8),
            Some(c) => Err(self.error(format!("unsupported escape '\\{}'", c))),
            None => Err(self.error("unterminated escape")),
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn integer(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().map(|(_, c)| c).collect();
        text.parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| self.error(format!("invalid integer '{}'", text)))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().map(|(_, c)| c).collect();
        match word.as_str() {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error(format!("unknown name '{}'", word)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::to_python_literal;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(parse_python_literal("None").unwrap(), Value::Null);
        assert_eq!(parse_python_literal(" True ").unwrap(), json!(true));
        assert_eq!(parse_python_literal("-12").unwrap(), json!(-12));
        assert_eq!(parse_python_literal("\"it's\"").unwrap(), json!("it's"));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            parse_python_literal(r"'a\\b\n\x07✓\''").unwrap(),
            json!("a\\b\n\u{7}\u{2713}'")
        );
    }

    #[test]
    fn test_implicit_concatenation() {
        let input = "{   'description': 'first part '\n                   'second part'}";
        assert_eq!(
            parse_python_literal(input).unwrap(),
            json!({"description": "first part second part"})
        );
    }

    #[test]
    fn test_tuple_and_parens() {
        assert_eq!(parse_python_literal("('a' 'b')").unwrap(), json!("ab"));
        assert_eq!(parse_python_literal("('a', 'b')").unwrap(), json!(["a", "b"]));
        assert_eq!(parse_python_literal("()").unwrap(), json!([]));
    }

    #[test]
    fn test_trailing_comma() {
        assert_eq!(
            parse_python_literal("{'a': [1, 2,],}").unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn test_errors() {
        assert!(parse_python_literal("{'a' 1}").is_err());
        assert!(parse_python_literal("'open").is_err());
        assert!(parse_python_literal("os.system").is_err());
        assert!(parse_python_literal("{1: 'x'}").is_err());
        assert!(parse_python_literal("None None").is_err());

        let err = parse_python_literal("[1, @]").unwrap_err();
        assert_eq!(err.offset, 4);
    }

    mod property_tests {
        use super::*;

        fn manifest_like() -> impl Strategy<Value = Value> {
            let text = "[ -~\u{e9}\u{2713}\n\t]{0,120}";
            (
                text,
                text,
                proptest::collection::vec("[a-z_/]{1,40}\\.py", 0..6),
                proptest::option::of("[0-9]\\.[0-9]\\.[0-9]p[0-9]{1,2}"),
            )
                .prop_map(|(author, description, files, until)| {
                    json!({
                        "author": author,
                        "description": description,
                        "files": {"agents": [], "cmk_addons_plugins": files, "lib": []},
                        "name": "plugin",
                        "version.usable_until": until,
                    })
                })
        }

        proptest! {
            #[test]
            fn prop_rendered_literal_reads_back(value in manifest_like()) {
                let rendered = to_python_literal(&value);
                prop_assert_eq!(parse_python_literal(&rendered).unwrap(), value);
            }

            #[test]
            fn prop_string_repr_reads_back(s in "\\PC{0,60}") {
                let value = Value::String(s);
                prop_assert_eq!(parse_python_literal(&to_python_literal(&value)).unwrap(), value);
            }
        }
    }
}
