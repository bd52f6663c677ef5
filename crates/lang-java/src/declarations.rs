//! Declaration walker producing SemanticDB symbols for Java sources.
//!
//! Only declarations reachable without entering a code block are visited:
//! local and anonymous classes have no global symbol.

use defscope_api::{Descriptor, Symbol, SymbolOccurrence};
use std::collections::HashMap;
use tree_sitter::Node;

const CONSTRUCTOR: &str = "<init>";

pub(crate) fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

pub(crate) struct DeclarationWalker<'s> {
    source: &'s [u8],
    toplevels_only: bool,
    out: Vec<SymbolOccurrence>,
}

impl<'s> DeclarationWalker<'s> {
    pub(crate) fn new(source: &'s str, toplevels_only: bool) -> Self {
        Self {
            source: source.as_bytes(),
            toplevels_only,
            out: Vec::new(),
        }
    }

    pub(crate) fn walk(mut self, root: Node) -> Vec<SymbolOccurrence> {
        let package = self.package(root);
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if is_type_declaration(child.kind()) {
                self.type_declaration(child, &package);
            }
        }
        self.out
    }

    fn text(&self, node: Node) -> Option<&'s str> {
        node.utf8_text(self.source).ok()
    }

    fn name_of(&self, node: Node) -> Option<&'s str> {
        node.child_by_field_name("name").and_then(|n| self.text(n))
    }

    fn define(&mut self, symbol: Symbol) {
        self.out.push(SymbolOccurrence::definition(symbol));
    }

    /// `package a.b;` → `a/b/`, no declaration → `_empty_/`
    fn package(&self, root: Node) -> Symbol {
        let mut cursor = root.walk();
        let name = root
            .named_children(&mut cursor)
            .find(|child| child.kind() == "package_declaration")
            .and_then(|decl| {
                let mut inner = decl.walk();
                let name = decl
                    .named_children(&mut inner)
                    .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"));
                name
            })
            .and_then(|node| self.text(node));

        let Some(name) = name else {
            return Symbol::empty_package();
        };
        name.split('.')
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .fold(Symbol::root_package(), |owner, part| {
                Symbol::global(&owner, &Descriptor::Package(part.to_string()))
            })
    }

    fn type_declaration(&mut self, node: Node, owner: &Symbol) {
        let Some(name) = self.name_of(node) else {
            return;
        };
        let symbol = Symbol::global(owner, &Descriptor::Type(name.to_string()));
        self.define(symbol.clone());
        if self.toplevels_only {
            return;
        }

        if let Some(params) = node.child_by_field_name("type_parameters") {
            self.type_parameters(params, &symbol);
        }
        // Record components become fields
        if node.kind() == "record_declaration" {
            if let Some(params) = node.child_by_field_name("parameters") {
                let mut cursor = params.walk();
                for param in params.named_children(&mut cursor) {
                    if let Some(component) = self.parameter_name(param) {
                        self.define(Symbol::global(
                            &symbol,
                            &Descriptor::Term(component.to_string()),
                        ));
                    }
                }
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            let mut overloads = HashMap::new();
            self.members(body, &symbol, &mut overloads);
        }
    }

    fn members(&mut self, body: Node, owner: &Symbol, overloads: &mut HashMap<String, usize>) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                kind if is_type_declaration(kind) => self.type_declaration(member, owner),
                "field_declaration" | "constant_declaration" => self.fields(member, owner),
                "enum_constant" => {
                    if let Some(name) = self.name_of(member) {
                        self.define(Symbol::global(owner, &Descriptor::Term(name.to_string())));
                    }
                }
                "enum_body_declarations" => self.members(member, owner, overloads),
                "method_declaration" | "annotation_type_element_declaration" => {
                    if let Some(name) = self.name_of(member) {
                        self.method(member, owner, name, overloads);
                    }
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    self.method(member, owner, CONSTRUCTOR, overloads);
                }
                _ => {}
            }
        }
    }

    fn fields(&mut self, node: Node, owner: &Symbol) {
        let mut cursor = node.walk();
        let names: Vec<&str> = node
            .children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| self.name_of(declarator))
            .collect();
        for name in names {
            self.define(Symbol::global(owner, &Descriptor::Term(name.to_string())));
        }
    }

    fn method(
        &mut self,
        node: Node,
        owner: &Symbol,
        name: &str,
        overloads: &mut HashMap<String, usize>,
    ) {
        let seen = overloads.entry(name.to_string()).or_insert(0);
        let disambiguator = match *seen {
            0 => "()".to_string(),
            n => format!("(+{n})"),
        };
        *seen += 1;

        let symbol = Symbol::global(
            owner,
            &Descriptor::Method {
                name: name.to_string(),
                disambiguator,
            },
        );
        self.define(symbol.clone());

        if let Some(params) = node.child_by_field_name("type_parameters") {
            self.type_parameters(params, &symbol);
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if let Some(param_name) = self.parameter_name(param) {
                    self.define(Symbol::global(
                        &symbol,
                        &Descriptor::Parameter(param_name.to_string()),
                    ));
                }
            }
        }
    }

    fn parameter_name(&self, param: Node) -> Option<&'s str> {
        match param.kind() {
            "formal_parameter" => self.name_of(param),
            // `String... args`
            "spread_parameter" => {
                let mut cursor = param.walk();
                let declarator = param
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "variable_declarator");
                declarator.and_then(|d| self.name_of(d))
            }
            _ => None,
        }
    }

    fn type_parameters(&mut self, params: Node, owner: &Symbol) {
        let mut cursor = params.walk();
        let names: Vec<&str> = params
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| {
                let mut inner = p.walk();
                let ident = p
                    .named_children(&mut inner)
                    .find(|n| matches!(n.kind(), "type_identifier" | "identifier"));
                ident.and_then(|n| self.text(n))
            })
            .collect();
        for name in names {
            self.define(Symbol::global(
                owner,
                &Descriptor::TypeParameter(name.to_string()),
            ));
        }
    }
}
