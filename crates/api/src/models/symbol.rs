//! SemanticDB-style global symbols.
//!
//! A global symbol is the owner chain of a declaration written as a string,
//! each element carrying a suffix that encodes its kind:
//!
//! ```text
//! a/b/              package
//! a/b/Foo#          type
//! a/b/Foo.          term (object, val, field)
//! a/b/Foo#bar().    method, overloads disambiguated as bar(+1). bar(+2). ...
//! a/b/Foo#bar().(x) parameter
//! a/b/Foo#[T]       type parameter
//! ```
//!
//! Names that are not plain identifiers are wrapped in backticks. `_root_/` is
//! the root package and `_empty_/` the default package. Symbols starting with
//! `local` are file-local and never globally unique.

use super::language::Language;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

pub const ROOT_PACKAGE: &str = "_root_/";
pub const EMPTY_PACKAGE: &str = "_empty_/";

/// Last element of a symbol's owner chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    None,
    Package(String),
    Type(String),
    Term(String),
    Method { name: String, disambiguator: String },
    Parameter(String),
    TypeParameter(String),
}

impl Descriptor {
    pub fn name(&self) -> &str {
        match self {
            Descriptor::None => "",
            Descriptor::Package(name)
            | Descriptor::Type(name)
            | Descriptor::Term(name)
            | Descriptor::Parameter(name)
            | Descriptor::TypeParameter(name) => name,
            Descriptor::Method { name, .. } => name,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Descriptor::None => {}
            Descriptor::Package(name) => {
                push_name(out, name);
                out.push('/');
            }
            Descriptor::Type(name) => {
                push_name(out, name);
                out.push('#');
            }
            Descriptor::Term(name) => {
                push_name(out, name);
                out.push('.');
            }
            Descriptor::Method {
                name,
                disambiguator,
            } => {
                push_name(out, name);
                out.push_str(disambiguator);
                out.push('.');
            }
            Descriptor::Parameter(name) => {
                out.push('(');
                push_name(out, name);
                out.push(')');
            }
            Descriptor::TypeParameter(name) => {
                out.push('[');
                push_name(out, name);
                out.push(']');
            }
        }
    }
}

/// Opaque, globally unique identifier of a declared program entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(SmolStr);

impl Symbol {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(SmolStr::new(value.as_ref()))
    }

    /// The empty symbol, owner of the root package.
    pub fn none() -> Self {
        Self(SmolStr::default())
    }

    pub fn root_package() -> Self {
        Self(SmolStr::new_static(ROOT_PACKAGE))
    }

    pub fn empty_package() -> Self {
        Self(SmolStr::new_static(EMPTY_PACKAGE))
    }

    /// Build `owner` + `descriptor`. Packages directly under the root omit the
    /// `_root_/` prefix.
    pub fn global(owner: &Symbol, descriptor: &Descriptor) -> Self {
        let mut value = String::new();
        if !owner.is_none() && !owner.is_root_package() {
            value.push_str(owner.as_str());
        }
        descriptor.write_to(&mut value);
        Self(SmolStr::new(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_root_package(&self) -> bool {
        self.0.as_str() == ROOT_PACKAGE
    }

    pub fn is_empty_package(&self) -> bool {
        self.0.as_str() == EMPTY_PACKAGE
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with("local")
    }

    pub fn is_global(&self) -> bool {
        !self.is_none() && !self.is_local() && !matches!(self.descriptor(), Descriptor::None)
    }

    pub fn is_package(&self) -> bool {
        !self.is_local() && self.0.ends_with('/')
    }

    pub fn is_type(&self) -> bool {
        !self.is_local() && self.0.ends_with('#')
    }

    pub fn is_term(&self) -> bool {
        matches!(self.descriptor(), Descriptor::Term(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self.descriptor(), Descriptor::Method { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.descriptor(), Descriptor::Parameter(_))
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self.descriptor(), Descriptor::TypeParameter(_))
    }

    pub fn descriptor(&self) -> Descriptor {
        if self.is_local() {
            return Descriptor::None;
        }
        parse_last(&self.0)
            .map(|(_, descriptor)| descriptor)
            .unwrap_or(Descriptor::None)
    }

    /// Name of the last descriptor, without backticks or suffix.
    pub fn display_name(&self) -> String {
        self.descriptor().name().to_string()
    }

    pub fn owner(&self) -> Symbol {
        if self.is_none() || self.is_root_package() || self.is_local() {
            return Symbol::none();
        }
        match parse_last(&self.0) {
            Some((0, _)) => Symbol::root_package(),
            Some((end, _)) => Symbol::new(&self.0.as_str()[..end]),
            None => Symbol::none(),
        }
    }

    /// A symbol is toplevel iff it is not a package and its owner is one.
    pub fn is_toplevel(&self) -> bool {
        self.is_global() && !self.is_package() && self.owner().is_package()
    }

    /// The enclosing toplevel symbol. Packages and non-global symbols are
    /// their own toplevel.
    pub fn toplevel(&self) -> Symbol {
        if self.is_package() || !self.is_global() {
            return self.clone();
        }
        let mut current = self.clone();
        loop {
            let owner = current.owner();
            if owner.is_none() || owner.is_package() {
                return current;
            }
            current = owner;
        }
    }

    /// Path stem a toplevel is conventionally stored under, e.g. `a/b/Foo` for
    /// `a/b/Foo#bar().`. `None` for packages and non-global symbols.
    pub fn trivial_stem(&self) -> Option<String> {
        let toplevel = self.toplevel();
        if toplevel.is_package() || !toplevel.is_global() {
            return None;
        }
        let value = toplevel.as_str();
        let value = &value[..value.len() - 1];
        let value = value.strip_prefix(EMPTY_PACKAGE).unwrap_or(value);
        Some(value.replace('`', ""))
    }

    /// Candidate relative paths of the file declaring this symbol's toplevel,
    /// one per language in the given order.
    pub fn trivial_paths(&self, languages: &[Language]) -> Vec<String> {
        match self.trivial_stem() {
            Some(stem) => languages
                .iter()
                .map(|lang| format!("{stem}.{}", lang.extension()))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '/' | '#' | '.' | '(' | ')' | '[' | ']' | '`')
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn push_name(out: &mut String, name: &str) {
    if is_plain_identifier(name) {
        out.push_str(name);
    } else {
        out.push('`');
        out.push_str(name);
        out.push('`');
    }
}

/// Read a (possibly backticked) name that ends at the end of `s`.
/// Returns the unquoted name and the byte offset where it starts.
fn read_name_backward(s: &str) -> Option<(String, usize)> {
    if let Some(inner) = s.strip_suffix('`') {
        let open = inner.rfind('`')?;
        return Some((inner[open + 1..].to_string(), open));
    }
    let start = s
        .char_indices()
        .rev()
        .find(|(_, c)| is_delimiter(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    if start == s.len() {
        return None;
    }
    Some((s[start..].to_string(), start))
}

/// Split the last descriptor off a global symbol. Returns the byte length of
/// the owner prefix together with the parsed descriptor.
fn parse_last(value: &str) -> Option<(usize, Descriptor)> {
    let last = value.chars().last()?;
    let body = &value[..value.len() - last.len_utf8()];
    match last {
        '/' => {
            let (name, start) = read_name_backward(body)?;
            Some((start, Descriptor::Package(name)))
        }
        '#' => {
            let (name, start) = read_name_backward(body)?;
            Some((start, Descriptor::Type(name)))
        }
        '.' if body.ends_with(')') => {
            let open = body.rfind('(')?;
            let disambiguator = body[open..].to_string();
            let (name, start) = read_name_backward(&body[..open])?;
            Some((
                start,
                Descriptor::Method {
                    name,
                    disambiguator,
                },
            ))
        }
        '.' => {
            let (name, start) = read_name_backward(body)?;
            Some((start, Descriptor::Term(name)))
        }
        ')' => {
            let (name, start) = read_name_backward(body)?;
            let owner = body[..start].strip_suffix('(')?;
            Some((owner.len(), Descriptor::Parameter(name)))
        }
        ']' => {
            let (name, start) = read_name_backward(body)?;
            let owner = body[..start].strip_suffix('[')?;
            Some((owner.len(), Descriptor::TypeParameter(name)))
        }
        _ => None,
    }
}
