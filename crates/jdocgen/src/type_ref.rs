//! Type reference parsing
//!
//! Turns a raw Go type spelling (`*[]models.Page[Item]`, `map[string]User`,
//! `Pair[Outer[Inner], string]`) into a [`TypeRef`]: an optional package
//! qualifier, a base name and parsed type arguments. Pointer, slice, array,
//! variadic and map decorations are stripped for lookup and remembered only
//! for display.
//!
//! Parsing never fails. Unbalanced brackets or an empty argument list produce
//! a reference flagged as malformed, with no arguments and the offending text
//! kept as its base name.

use std::fmt;

/// Go's predeclared non-struct types
pub const BASIC_TYPES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
];

/// Check whether a bare name is one of Go's basic types
pub fn is_basic_type(name: &str) -> bool {
    BASIC_TYPES.contains(&name)
}

/// A parsed type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Package qualifier as written (`m` in `m.User`)
    pub qualifier: Option<String>,
    /// Unqualified name without decorations or arguments
    pub base_name: String,
    /// Parsed generic arguments, in order
    pub type_args: Vec<TypeRef>,
    /// Stripped prefix such as `*`, `[]`, `map[string]`
    pub decorations: String,
    /// Set when the spelling could not be parsed
    pub malformed: bool,
}

impl TypeRef {
    /// Unqualified, non-generic reference
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            base_name: name.into(),
            type_args: Vec::new(),
            decorations: String::new(),
            malformed: false,
        }
    }

    /// Parse a raw type spelling
    pub fn parse(raw: &str) -> TypeRef {
        let mut rest = raw.trim();
        let mut decorations = String::new();

        loop {
            if let Some(after) = rest.strip_prefix("...") {
                decorations.push_str("...");
                rest = after.trim_start();
            } else if let Some(after) = rest.strip_prefix('*') {
                decorations.push('*');
                rest = after.trim_start();
            } else if rest.starts_with('[') {
                match find_closing(rest, 0) {
                    Some(close) => {
                        decorations.push_str(&rest[..=close]);
                        rest = rest[close + 1..].trim_start();
                    }
                    None => return Self::malformed(decorations, rest),
                }
            } else if rest.starts_with("map[") {
                match find_closing(rest, 3) {
                    Some(close) => {
                        decorations.push_str(&rest[..=close]);
                        rest = rest[close + 1..].trim_start();
                    }
                    None => return Self::malformed(decorations, rest),
                }
            } else {
                break;
            }
        }

        if rest.is_empty() {
            return Self::malformed(decorations, raw.trim());
        }

        if is_opaque_spelling(rest) {
            return TypeRef {
                decorations,
                ..TypeRef::named(rest)
            };
        }

        let (name, type_args) = match rest.find('[') {
            None => {
                if rest.contains(']') {
                    return Self::malformed(decorations, rest);
                }
                (rest, Vec::new())
            }
            Some(open) => {
                let close = match find_closing(rest, open) {
                    Some(close) if close == rest.len() - 1 => close,
                    _ => return Self::malformed(decorations, rest),
                };
                let inner = &rest[open + 1..close];
                let parts = split_top_level(inner);
                if parts.iter().any(|p| p.is_empty()) {
                    return Self::malformed(decorations, rest);
                }
                let args: Vec<TypeRef> = parts.into_iter().map(TypeRef::parse).collect();
                if args.iter().any(|a| a.malformed) {
                    return Self::malformed(decorations, rest);
                }
                (rest[..open].trim_end(), args)
            }
        };

        let (qualifier, base_name) = match name.rsplit_once('.') {
            Some((q, n)) if !q.is_empty() && !n.is_empty() => (Some(q.to_string()), n),
            Some(_) => return Self::malformed(decorations, rest),
            None => (None, name),
        };

        if base_name.chars().any(char::is_whitespace) {
            return Self::malformed(decorations, rest);
        }

        TypeRef {
            qualifier,
            base_name: base_name.to_string(),
            type_args,
            decorations,
            malformed: false,
        }
    }

    fn malformed(decorations: String, text: &str) -> TypeRef {
        TypeRef {
            qualifier: None,
            base_name: text.to_string(),
            type_args: Vec::new(),
            decorations,
            malformed: true,
        }
    }

    /// Predeclared scalar type; never a structure
    pub fn is_basic(&self) -> bool {
        !self.malformed
            && self.qualifier.is_none()
            && self.type_args.is_empty()
            && is_basic_type(&self.base_name)
    }

    /// Channels, functions, interfaces, anonymous structs, `any` and `error`
    pub fn is_opaque(&self) -> bool {
        !self.malformed && self.qualifier.is_none() && is_opaque_spelling(&self.base_name)
    }

    /// Whether the reference can name a catalog entry
    pub fn is_resolvable(&self) -> bool {
        !self.malformed && !self.is_basic() && !self.is_opaque()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_args.is_empty()
    }

    /// `qualifier.Name`, or `Name` when unqualified
    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.base_name),
            None => self.base_name.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decorations)?;
        if let Some(q) = &self.qualifier {
            write!(f, "{}.", q)?;
        }
        f.write_str(&self.base_name)?;
        if !self.type_args.is_empty() {
            f.write_str("[")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

fn is_opaque_spelling(s: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "chan ",
        "chan<-",
        "<-chan",
        "func(",
        "func ",
        "interface{",
        "interface {",
        "struct{",
        "struct {",
    ];
    s == "any" || s == "error" || PREFIXES.iter().any(|p| s.starts_with(p))
}

/// Index of the bracket closing the one at `open`, counting `[]`, `()` and `{}`
fn find_closing(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside any bracket pair
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}
