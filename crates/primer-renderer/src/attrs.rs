//! Component attribute parsing.
//!
//! Parses the attribute list of a component tag:
//! `<Callout type="exam" title='Watch out' backgroundColor={"#fff8e1"} open>`.

/// A single attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum AttrValue {
    /// Quoted or bare string: `key="v"`, `key='v'`, `key=v`.
    Text(String),
    /// Raw expression text between braces: `key={…}`.
    Expression(String),
    /// Attribute without a value: `key`.
    Flag,
}

impl AttrValue {
    /// String view of the value.
    ///
    /// Expressions that are a single string literal (`{"x"}`, `{'x'}`,
    /// `` {`x`} ``) yield the literal's contents; other expressions yield
    /// their raw text. Flags have no string value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Expression(expr) => Some(strip_string_literal(expr).unwrap_or(expr)),
            Self::Flag => None,
        }
    }
}

/// Ordered attributes of a component tag.
///
/// Later duplicates replace earlier ones, keeping the first position.
///
/// # Example
///
/// ```
/// use primer_renderer::BlockAttrs;
///
/// let attrs = BlockAttrs::parse(r#"type="exam" title={"Units"} open"#);
/// assert_eq!(attrs.text("type"), Some("exam"));
/// assert_eq!(attrs.text("title"), Some("Units"));
/// assert!(attrs.flag("open"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockAttrs {
    entries: Vec<(String, AttrValue)>,
}

impl BlockAttrs {
    /// Parse an attribute list.
    ///
    /// Unrecognized characters are skipped; an unterminated quote or brace
    /// takes the rest of the input as its value.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut attrs = Self::default();
        let mut remaining = input.trim();

        while !remaining.is_empty() {
            let key_len = remaining
                .find(|c: char| !is_key_char(c))
                .unwrap_or(remaining.len());

            if key_len == 0 {
                // Skip one unrecognized character
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = remaining[skip..].trim_start();
                continue;
            }

            let key = &remaining[..key_len];
            let after_key = remaining[key_len..].trim_start();

            let (value, rest) = match after_key.strip_prefix('=') {
                Some(value_part) => parse_value(value_part.trim_start()),
                None => (AttrValue::Flag, after_key),
            };

            attrs.insert(key, value);
            remaining = rest.trim_start();
        }

        attrs
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, key: &str, value: AttrValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_owned(), value));
        }
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// String value for `key` (see [`AttrValue::as_text`]).
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_text)
    }

    /// Boolean value for `key`.
    ///
    /// A bare flag is `true`; `{true}`/`{false}` and `"true"`/`"false"` are
    /// read literally; a missing key is `false`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(AttrValue::Flag) => true,
            Some(value) => value.as_text().is_some_and(|v| v != "false"),
            None => false,
        }
    }

    /// Attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Parse a value after `=`. Returns the value and the remaining input.
fn parse_value(s: &str) -> (AttrValue, &str) {
    match s.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &s[1..];
            match body.find(quote) {
                Some(end) => (AttrValue::Text(body[..end].to_owned()), &body[end + 1..]),
                None => (AttrValue::Text(body.to_owned()), ""),
            }
        }
        Some('{') => {
            let end = matching_brace(s);
            let inner = &s[1..end.unwrap_or(s.len())];
            let rest = end.map_or("", |e| &s[e + 1..]);
            (AttrValue::Expression(inner.trim().to_owned()), rest)
        }
        Some(_) => {
            let end = s.find(char::is_whitespace).unwrap_or(s.len());
            (AttrValue::Text(s[..end].to_owned()), &s[end..])
        }
        None => (AttrValue::Text(String::new()), ""),
    }
}

/// Byte index of the brace closing the one at index 0.
///
/// Braces inside string literals do not count.
pub(crate) fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_string_literal(expr: &str) -> Option<&str> {
    let first = expr.chars().next()?;
    if !matches!(first, '"' | '\'' | '`') || expr.len() < 2 {
        return None;
    }
    expr.strip_prefix(first)?.strip_suffix(first)
}
