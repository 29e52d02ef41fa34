// src/typing.rs
//! Classification of type-annotation text.
//!
//! Annotations arrive as raw source text (`string[]`, `Record<string, T>`,
//! `User | null`). Detection, guard rendering and schema rendering all work
//! from the same [`TypeExpr`] reading of that text.

/// Coarse reading of a type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    String,
    Number,
    Boolean,
    Any,
    Unknown,
    Void,
    Null,
    Undefined,
    /// `object` / `Object`.
    Object,
    /// `Record<K, V>`.
    Record,
    /// Inline `{ ... }` shape.
    ObjectLiteral,
    /// Named structured type such as `User`.
    Entity(String),
    /// Built-in class checked with `instanceof`, such as `Map` or `HTMLElement`.
    Instance(String),
    Date,
    Function,
    Array(Box<TypeExpr>),
    Promise(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Other(String),
}

impl TypeExpr {
    /// Parses annotation text. Never fails; unknown text becomes `Other`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let t = strip_parens(text.trim());

        let branches = split_top_level(t, '|');
        if branches.len() > 1 {
            return Self::Union(branches.iter().map(|b| Self::parse(b)).collect());
        }
        let parts = split_top_level(t, '&');
        if parts.len() > 1 {
            return Self::Intersection(parts.iter().map(|p| Self::parse(p)).collect());
        }

        if t.contains("=>") {
            return Self::Function;
        }
        if let Some(inner) = t.strip_suffix("[]") {
            return Self::Array(Box::new(Self::parse(inner)));
        }
        if let Some(inner) = generic_arg(t, &["Array", "ReadonlyArray"]) {
            return Self::Array(Box::new(Self::parse(inner)));
        }
        if let Some(inner) = generic_arg(t, &["Promise"]) {
            return Self::Promise(Box::new(Self::parse(inner)));
        }
        if t.starts_with('{') {
            return Self::ObjectLiteral;
        }

        let lower = t.to_ascii_lowercase();
        match lower.as_str() {
            "string" => return Self::String,
            "number" | "bigint" => return Self::Number,
            "boolean" => return Self::Boolean,
            "any" | "" => return Self::Any,
            "unknown" => return Self::Unknown,
            "void" | "never" => return Self::Void,
            "null" => return Self::Null,
            "undefined" => return Self::Undefined,
            "object" => return Self::Object,
            "function" => return Self::Function,
            "date" => return Self::Date,
            _ => {}
        }
        if lower.starts_with("record<") || lower == "record" {
            return Self::Record;
        }
        let base = t.split('<').next().unwrap_or(t).trim_end();
        if UTILITY_TYPES.contains(&base) {
            return Self::Object;
        }
        if is_builtin_class(base) {
            return Self::Instance(base.to_string());
        }
        if is_type_name(t) {
            return Self::Entity(t.to_string());
        }
        Self::Other(t.to_string())
    }

    /// Object-shaped: `object`, records, inline shapes and named types.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Self::Object | Self::Record | Self::ObjectLiteral | Self::Entity(_)
        )
    }

    /// Types that benefit from a declarative schema.
    #[must_use]
    pub fn is_schema_candidate(&self) -> bool {
        self.is_structured()
            || matches!(
                self,
                Self::Array(_) | Self::Union(_) | Self::Intersection(_) | Self::Any
            )
    }

    /// Short human-readable name used in messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Number => "number".into(),
            Self::Boolean => "boolean".into(),
            Self::Any => "any".into(),
            Self::Unknown => "unknown".into(),
            Self::Void => "void".into(),
            Self::Null => "null".into(),
            Self::Undefined => "undefined".into(),
            Self::Object | Self::ObjectLiteral => "object".into(),
            Self::Record => "record".into(),
            Self::Entity(name) | Self::Instance(name) | Self::Other(name) => name.clone(),
            Self::Date => "Date".into(),
            Self::Function => "function".into(),
            Self::Array(inner) => format!("{}[]", inner.describe()),
            Self::Promise(inner) => format!("Promise<{}>", inner.describe()),
            Self::Union(items) => join(items, " | "),
            Self::Intersection(items) => join(items, " & "),
        }
    }
}

fn join(items: &[TypeExpr], sep: &str) -> String {
    items
        .iter()
        .map(TypeExpr::describe)
        .collect::<Vec<_>>()
        .join(sep)
}

fn strip_parens(t: &str) -> &str {
    let mut t = t;
    while t.starts_with('(') && t.ends_with(')') && closes_at_end(t) {
        t = t[1..t.len() - 1].trim();
    }
    t
}

/// True when the opening parenthesis at 0 is closed by the last char.
fn closes_at_end(t: &str) -> bool {
    let mut depth = 0i32;
    for (i, c) in t.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i == t.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Splits on `sep` outside of brackets, braces, parens and generics.
fn split_top_level(t: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in t.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(t[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(t[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn generic_arg<'a>(t: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        t.strip_prefix(name)?
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::trim)
    })
}

/// Mapped types over an object; checked as plain objects.
const UTILITY_TYPES: &[&str] = &["Partial", "Required", "Readonly", "Pick", "Omit"];

const BUILTIN_CLASSES: &[&str] = &[
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "RegExp",
    "Error",
    "ArrayBuffer",
    "SharedArrayBuffer",
    "DataView",
    "URL",
    "URLSearchParams",
    "Blob",
    "File",
    "FormData",
    "Headers",
    "Request",
    "Response",
    "Event",
    "EventTarget",
    "Element",
    "Node",
    "Document",
    "Window",
    "Buffer",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "BigInt64Array",
    "BigUint64Array",
];

/// Runtime classes of the language and its host environments, including the
/// `*Error` family and the `HTML*`/`SVG*` DOM interfaces.
fn is_builtin_class(base: &str) -> bool {
    BUILTIN_CLASSES.contains(&base)
        || (base.ends_with("Error") && is_type_name(base))
        || ["HTML", "SVG"]
            .iter()
            .any(|prefix| base.strip_prefix(prefix).is_some_and(is_type_name))
}

fn is_type_name(t: &str) -> bool {
    let base = t.split('<').next().unwrap_or(t);
    let mut chars = base.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
