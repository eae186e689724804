//! Contains the value tree built from a validated document.
//!
//! Scalars keep the token text exactly as it was scanned (quotes included),
//! so serializing a tree reproduces every scalar verbatim. Stripping quotes
//! and decoding escapes is left to the accessors.
//!
//! This module also includes the "to_text" (serialization) logic for turning
//! a tree back into document text.
use crate::error::AccessError;
use crate::token::Span;
use memchr::memchr;
use std::borrow::Cow;
use std::fmt;

/// The kind of a scalar leaf, derived from its token's designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Real,
    Boolean,
    Null,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Real => "real",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Null => "null",
        })
    }
}

/// The shape of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    Scalar,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Object => "an object",
            NodeKind::Array => "an array",
            NodeKind::Scalar => "a scalar",
        })
    }
}

/// A leaf of the tree: raw token text plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    raw: String,
    kind: ScalarKind,
    span: Span,
}

/// Removes one pair of surrounding double quotes, if present.
fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

impl Scalar {
    pub fn new(raw: impl Into<String>, kind: ScalarKind, span: Span) -> Self {
        Scalar {
            raw: raw.into(),
            kind,
            span,
        }
    }

    /// The token text exactly as scanned, e.g. `"v1"` with its quotes.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Where the scalar's token appeared in the source.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The value text: strings lose their quotes, other kinds are returned
    /// as scanned. Escape sequences are left alone.
    pub fn text(&self) -> &str {
        match self.kind {
            ScalarKind::String => strip_quotes(&self.raw),
            _ => &self.raw,
        }
    }

    /// Like `text`, with the simple JSON escapes (`\"`, `\\`, `\/`, `\b`,
    /// `\f`, `\n`, `\r`, `\t`) decoded. `\uXXXX` and unknown escapes are
    /// kept verbatim.
    pub fn unescaped(&self) -> Cow<'_, str> {
        let text = self.text();
        if self.kind != ScalarKind::String || memchr(b'\\', text.as_bytes()).is_none() {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('b') => out.push('\u{0008}'),
                Some('f') => out.push('\u{000C}'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        Cow::Owned(out)
    }

    fn expect_kind(&self, expected: ScalarKind) -> Result<(), AccessError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(AccessError::KindMismatch {
                expected,
                found: self.kind,
            })
        }
    }

    pub fn as_bool(&self) -> Result<bool, AccessError> {
        self.expect_kind(ScalarKind::Boolean)?;
        Ok(self.raw == "true")
    }

    /// The integer value. Fails for other kinds and for integers outside
    /// the `i64` range.
    pub fn as_i64(&self) -> Result<i64, AccessError> {
        self.expect_kind(ScalarKind::Integer)?;
        self.raw.parse().map_err(|_| AccessError::OutOfRange {
            text: self.raw.clone(),
            target: "i64",
        })
    }

    /// The numeric value of an integer or real scalar.
    pub fn as_f64(&self) -> Result<f64, AccessError> {
        if self.kind != ScalarKind::Integer {
            self.expect_kind(ScalarKind::Real)?;
        }
        match self.raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(AccessError::OutOfRange {
                text: self.raw.clone(),
                target: "f64",
            }),
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind == ScalarKind::Null
    }
}

/// One `name: value` entry of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    raw_name: String,
    value: Value,
}

impl Field {
    /// `raw_name` is the name token as scanned, quotes included.
    pub fn new(raw_name: impl Into<String>, value: Value) -> Self {
        Field {
            raw_name: raw_name.into(),
            value,
        }
    }

    /// The field name without its quotes.
    pub fn name(&self) -> &str {
        strip_quotes(&self.raw_name)
    }

    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A node of the tree.
///
/// Objects are ordered lists of fields rather than maps: insertion order is
/// kept and duplicate names are allowed, with lookups returning the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Object(Vec<Field>),
    Array(Vec<Value>),
}

impl Value {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Value::Scalar(_) => NodeKind::Scalar,
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
        }
    }

    fn mismatch(&self, expected: NodeKind) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            found: self.node_kind(),
        }
    }

    /// All fields of an object, in document order.
    pub fn fields(&self) -> Result<&[Field], AccessError> {
        match self {
            Value::Object(fields) => Ok(fields),
            _ => Err(self.mismatch(NodeKind::Object)),
        }
    }

    /// The value of the first field called `name` (unquoted).
    pub fn field(&self, name: &str) -> Result<&Value, AccessError> {
        self.fields()?
            .iter()
            .find(|field| field.name() == name)
            .map(Field::value)
            .ok_or_else(|| AccessError::NotFound(name.to_string()))
    }

    /// The field at `index`, in source order.
    pub fn field_at(&self, index: usize) -> Result<&Field, AccessError> {
        let fields = self.fields()?;
        fields.get(index).ok_or(AccessError::IndexOutOfRange {
            index,
            len: fields.len(),
            found: NodeKind::Object,
        })
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.field(name).is_ok()
    }

    /// All elements of an array, in document order.
    pub fn elements(&self) -> Result<&[Value], AccessError> {
        match self {
            Value::Array(elements) => Ok(elements),
            _ => Err(self.mismatch(NodeKind::Array)),
        }
    }

    /// The element at `index`. Any node that is not an array has no
    /// elements, so indexing it is out of range.
    pub fn element(&self, index: usize) -> Result<&Value, AccessError> {
        let elements: &[Value] = match self {
            Value::Array(elements) => elements,
            _ => &[],
        };
        elements.get(index).ok_or(AccessError::IndexOutOfRange {
            index,
            len: elements.len(),
            found: self.node_kind(),
        })
    }

    /// Number of fields or elements; 1 for a scalar.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Object(fields) => fields.len(),
            Value::Array(elements) => elements.len(),
        }
    }

    /// True for an empty object or array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_scalar(&self) -> Result<&Scalar, AccessError> {
        match self {
            Value::Scalar(scalar) => Ok(scalar),
            _ => Err(self.mismatch(NodeKind::Scalar)),
        }
    }

    /// Shorthand for `as_scalar()?.text()`.
    pub fn scalar_text(&self) -> Result<&str, AccessError> {
        self.as_scalar().map(Scalar::text)
    }

    pub fn scalar_kind(&self) -> Result<ScalarKind, AccessError> {
        self.as_scalar().map(Scalar::kind)
    }

    /// An independent copy of this node and everything below it.
    pub fn deep_copy(&self) -> Value {
        self.clone()
    }
}

/// The result of parsing a document: an immutable tree behind a read view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTree {
    root: Value,
}

impl ValueTree {
    pub fn new(root: Value) -> Self {
        ValueTree { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    pub fn deep_copy(&self) -> ValueTree {
        self.clone()
    }

    pub fn to_text(&self) -> String {
        self.root.to_text()
    }

    pub fn to_pretty_text(&self) -> String {
        self.root.to_pretty_text()
    }
}

impl std::ops::Deref for ValueTree {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.root
    }
}

impl fmt::Display for ValueTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl Value {
    /// Serializes the node into compact text. Scalars and field names are
    /// written exactly as they were scanned.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        // Writing into a `String` cannot fail.
        let _ = Self::write_value(self, &mut output);
        output
    }

    /// Recursive helper function to write any `Value` to a buffer.
    fn write_value<W: fmt::Write>(value: &Value, w: &mut W) -> fmt::Result {
        match value {
            Value::Scalar(scalar) => w.write_str(scalar.raw()),
            Value::Array(elements) => {
                w.write_char('[')?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        w.write_char(',')?;
                    }
                    Self::write_value(element, w)?;
                }
                w.write_char(']')
            }
            Value::Object(fields) => {
                w.write_char('{')?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        w.write_char(',')?;
                    }
                    w.write_str(field.raw_name())?;
                    w.write_char(':')?;
                    Self::write_value(field.value(), w)?;
                }
                w.write_char('}')
            }
        }
    }

    // --- Pretty-Printing Logic ---
    /// The indentation string to use for pretty-printing (two spaces).
    const INDENT: &'static str = "  ";

    /// Serializes the node into indented, human-readable text.
    pub fn to_pretty_text(&self) -> String {
        let mut output = String::new();
        let _ = Self::write_value_pretty(self, &mut output, 0);
        output
    }

    fn write_value_pretty<W: fmt::Write>(value: &Value, w: &mut W, depth: usize) -> fmt::Result {
        match value {
            Value::Scalar(scalar) => w.write_str(scalar.raw()),
            Value::Array(elements) if elements.is_empty() => w.write_str("[]"),
            Value::Object(fields) if fields.is_empty() => w.write_str("{}"),
            Value::Array(elements) => {
                let indent = Self::INDENT.repeat(depth + 1);
                w.write_str("[\n")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        w.write_str(",\n")?;
                    }
                    w.write_str(&indent)?;
                    Self::write_value_pretty(element, w, depth + 1)?;
                }
                write!(w, "\n{}]", Self::INDENT.repeat(depth))
            }
            Value::Object(fields) => {
                let indent = Self::INDENT.repeat(depth + 1);
                w.write_str("{\n")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        w.write_str(",\n")?;
                    }
                    w.write_str(&indent)?;
                    w.write_str(field.raw_name())?;
                    w.write_str(": ")?;
                    Self::write_value_pretty(field.value(), w, depth + 1)?;
                }
                write!(w, "\n{}}}", Self::INDENT.repeat(depth))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_value(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(raw: &str, kind: ScalarKind) -> Value {
        Value::Scalar(Scalar::new(raw, kind, Span::default()))
    }

    fn sample() -> Value {
        Value::Object(vec![
            Field::new("\"f1\"", scalar("\"v1\"", ScalarKind::String)),
            Field::new(
                "\"f2\"",
                Value::Array(vec![
                    scalar("1", ScalarKind::Integer),
                    scalar("true", ScalarKind::Boolean),
                ]),
            ),
            Field::new("\"f1\"", scalar("null", ScalarKind::Null)),
        ])
    }

    #[test]
    fn test_field_lookup_returns_first_match() {
        let value = sample();
        assert_eq!(value.field("f1").unwrap().scalar_text().unwrap(), "v1");
        assert_eq!(value.field_at(2).unwrap().name(), "f1");
        assert!(value.field_at(2).unwrap().value().as_scalar().unwrap().is_null());
        assert!(value.contains_field("f2"));
        assert_eq!(value.field("nope"), Err(AccessError::NotFound("nope".to_string())));
    }

    #[test]
    fn test_access_errors() {
        let value = sample();
        let array = value.field("f2").unwrap();
        assert_eq!(array.element(1).unwrap().scalar_text().unwrap(), "true");
        assert_eq!(
            array.element(2),
            Err(AccessError::IndexOutOfRange {
                index: 2,
                len: 2,
                found: NodeKind::Array
            })
        );
        assert_eq!(
            array.field("x"),
            Err(AccessError::TypeMismatch {
                expected: NodeKind::Object,
                found: NodeKind::Array
            })
        );
        assert_eq!(
            value.element(0),
            Err(AccessError::IndexOutOfRange {
                index: 0,
                len: 0,
                found: NodeKind::Object
            })
        );
        assert_eq!(
            array.element(0).unwrap().element(0),
            Err(AccessError::IndexOutOfRange {
                index: 0,
                len: 0,
                found: NodeKind::Scalar
            })
        );
        assert_eq!(
            value.elements(),
            Err(AccessError::TypeMismatch {
                expected: NodeKind::Array,
                found: NodeKind::Object
            })
        );
        assert!(array.as_scalar().is_err());
        assert_eq!(
            value.field_at(5).unwrap_err(),
            AccessError::IndexOutOfRange {
                index: 5,
                len: 3,
                found: NodeKind::Object
            }
        );
    }

    #[test]
    fn test_to_text_keeps_raw_tokens() {
        assert_eq!(sample().to_text(), r#"{"f1":"v1","f2":[1,true],"f1":null}"#);
        assert_eq!(sample().to_string(), sample().to_text());
    }

    #[test]
    fn test_pretty_text() {
        let value = Value::Object(vec![
            Field::new("\"a\"", Value::Array(vec![scalar("1", ScalarKind::Integer)])),
            Field::new("\"b\"", Value::Object(vec![])),
            Field::new("\"c\"", Value::Array(vec![])),
        ]);
        let expected = "{\n  \"a\": [\n    1\n  ],\n  \"b\": {},\n  \"c\": []\n}";
        assert_eq!(value.to_pretty_text(), expected);
    }

    #[test]
    fn test_scalar_conversions() {
        let real = Scalar::new("-1234.56e-21", ScalarKind::Real, Span::default());
        assert!((real.as_f64().unwrap() - -1234.56e-21).abs() < f64::EPSILON);
        assert!(real.as_i64().is_err());

        let int = Scalar::new("-324532", ScalarKind::Integer, Span::default());
        assert_eq!(int.as_i64().unwrap(), -324532);
        assert_eq!(int.as_f64().unwrap(), -324532.0);

        let huge = Scalar::new("99999999999999999999", ScalarKind::Integer, Span::default());
        assert!(matches!(huge.as_i64(), Err(AccessError::OutOfRange { .. })));

        let boolean = Scalar::new("false", ScalarKind::Boolean, Span::default());
        assert_eq!(boolean.as_bool(), Ok(false));
        assert_eq!(
            boolean.as_f64(),
            Err(AccessError::KindMismatch {
                expected: ScalarKind::Real,
                found: ScalarKind::Boolean
            })
        );
    }

    #[test]
    fn test_unescaped() {
        let plain = Scalar::new("\"plain\"", ScalarKind::String, Span::default());
        assert!(matches!(plain.unescaped(), Cow::Borrowed("plain")));

        let escaped = Scalar::new(r#""a\"b\\c\/d\n\u00e9\q""#, ScalarKind::String, Span::default());
        assert_eq!(escaped.text(), r#"a\"b\\c\/d\n\u00e9\q"#);
        assert_eq!(escaped.unescaped(), "a\"b\\c/d\n\\u00e9\\q");
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = ValueTree::new(sample());
        let copy = original.deep_copy();
        assert_eq!(copy, original);
        let mut owned = copy.into_root();
        if let Value::Object(fields) = &mut owned {
            fields.clear();
        }
        assert_eq!(original.len(), 3);
        assert!(owned.is_empty());
    }
}
