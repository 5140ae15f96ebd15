//! Coercion of format-native typed values into strings.

/// A typed value as it appears in a native tag, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    StrList(Vec<String>),
    Int(i32),
    UInt(u32),
    LongLong(i64),
    IntPair(i32, i32),
    Binary(Vec<u8>),
    /// Any variant the coercer has no string form for (booleans, single bytes, empty items). Carries
    /// the native type name for diagnostics.
    Other(&'static str),
}

impl Value {
    /// Integer-typed values. In MP4 these are routed to the ID3-family map.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::LongLong(_) | Value::IntPair(_, _))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::StrList(_) => "string list",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::LongLong(_) => "long long",
            Value::IntPair(_, _) => "int pair",
            Value::Binary(_) => "binary",
            Value::Other(name) => name,
        }
    }
}

/// Result of coercion: either one string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    Single(String),
    List(Vec<String>),
}

impl Coerced {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Coerced::Single(s) => vec![s],
            Coerced::List(l) => l,
        }
    }
}

/// Returns `None` for values with no string form. Callers skip such fields.
pub fn coerce(value: Value) -> Option<Coerced> {
    match value {
        Value::Str(s) => Some(Coerced::Single(s)),
        Value::StrList(l) => Some(Coerced::List(l)),
        Value::Int(i) => Some(Coerced::Single(i.to_string())),
        Value::UInt(u) => Some(Coerced::Single(u.to_string())),
        Value::LongLong(l) => Some(Coerced::Single(l.to_string())),
        Value::IntPair(a, b) => Some(Coerced::Single(format!("{}/{}", a, b))),
        // Binary data only ever makes sense as artwork, which never goes through here.
        Value::Binary(_) | Value::Other(_) => None,
    }
}
