//! Fallback symbols for declarations without a literal source location.
//!
//! The compiler synthesizes members such as case class `apply`/`copy` or var
//! setters that never appear in source. Their definition is best reported at
//! the declaration they were generated from.

use defscope_api::{DefinitionAlternatives, Descriptor, Symbol};

/// Alternatives for compiler-synthesized Scala members.
///
/// Every proposed symbol is strictly shorter than its input or a type symbol,
/// for which nothing is proposed, so chains of alternatives always end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalaAlternatives;

/// Proposes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAlternatives;

impl DefinitionAlternatives for NoAlternatives {
    fn alternatives(&self, _symbol: &Symbol) -> Vec<Symbol> {
        Vec::new()
    }
}

impl DefinitionAlternatives for ScalaAlternatives {
    fn alternatives(&self, symbol: &Symbol) -> Vec<Symbol> {
        let candidates = [
            companion_class(symbol),
            apply_or_copy_class(symbol),
            apply_or_copy_field(symbol),
        ]
        .into_iter()
        .flatten()
        .chain(setter_field_or_getter(symbol))
        .chain(enclosing_owner(symbol));

        let mut out: Vec<Symbol> = Vec::new();
        for candidate in candidates {
            if candidate != *symbol && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

/// `a/Foo.` → `a/Foo#`, for objects owned by a package or another object.
fn companion_class(symbol: &Symbol) -> Option<Symbol> {
    let Descriptor::Term(name) = symbol.descriptor() else {
        return None;
    };
    let owner = symbol.owner();
    (owner.is_package() || owner.is_term())
        .then(|| Symbol::global(&owner, &Descriptor::Type(name)))
}

fn is_apply_or_copy(symbol: &Symbol) -> bool {
    matches!(
        symbol.descriptor(),
        Descriptor::Method { ref name, .. } if name == "apply" || name == "copy"
    )
}

/// Class owning a synthetic `apply` (on the companion) or `copy` (on the class).
fn class_of_apply_or_copy(method: &Symbol) -> Option<Symbol> {
    if !is_apply_or_copy(method) {
        return None;
    }
    let owner = method.owner();
    match owner.descriptor() {
        Descriptor::Term(name) | Descriptor::Type(name) => {
            Some(Symbol::global(&owner.owner(), &Descriptor::Type(name)))
        }
        _ => None,
    }
}

/// `a/Foo.apply().` / `a/Foo#copy().` → `a/Foo#`
fn apply_or_copy_class(symbol: &Symbol) -> Option<Symbol> {
    class_of_apply_or_copy(symbol)
}

/// `a/Foo.apply().(x)` / `a/Foo#copy().(x)` → `a/Foo#x.`
fn apply_or_copy_field(symbol: &Symbol) -> Option<Symbol> {
    match symbol.descriptor() {
        Descriptor::Parameter(param) => {
            let class = class_of_apply_or_copy(&symbol.owner())?;
            Some(Symbol::global(&class, &Descriptor::Term(param)))
        }
        _ => None,
    }
}

/// `a/Foo#x_=().` → `a/Foo#x.`, then `a/Foo#x().`
fn setter_field_or_getter(symbol: &Symbol) -> Vec<Symbol> {
    let Descriptor::Method { name, .. } = symbol.descriptor() else {
        return Vec::new();
    };
    let Some(field) = name.strip_suffix("_=").filter(|f| !f.is_empty()) else {
        return Vec::new();
    };
    let owner = symbol.owner();
    vec![
        Symbol::global(&owner, &Descriptor::Term(field.to_string())),
        Symbol::global(
            &owner,
            &Descriptor::Method {
                name: field.to_string(),
                disambiguator: "()".to_string(),
            },
        ),
    ]
}

/// Methods and parameters fall back to their owner, unless that is a package.
fn enclosing_owner(symbol: &Symbol) -> Option<Symbol> {
    match symbol.descriptor() {
        Descriptor::Method { .. } | Descriptor::Parameter(_) | Descriptor::TypeParameter(_) => {
            let owner = symbol.owner();
            (owner.is_global() && !owner.is_package()).then_some(owner)
        }
        _ => None,
    }
}
