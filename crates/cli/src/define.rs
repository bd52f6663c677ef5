use crate::SourceArgs;
use defscope_api::Symbol;
use defscope_core::SymbolDefinition;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
struct DefinitionView {
    query: Symbol,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    definition: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
}

impl DefinitionView {
    fn new(query: &Symbol, found: Option<&SymbolDefinition>) -> Self {
        Self {
            query: query.clone(),
            found: found.is_some(),
            definition: found.map(|d| d.definition_symbol.clone()),
            uri: found.map(|d| d.file.uri()),
        }
    }
}

pub fn run(
    symbol: &Symbol,
    sources: &SourceArgs,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let index = sources.build_index()?;
    let found = index.definition(symbol)?;
    index.close();
    render(symbol, found.as_ref(), json)
}

fn render(
    query: &Symbol,
    found: Option<&SymbolDefinition>,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        return Ok(serde_json::to_string_pretty(&DefinitionView::new(query, found))?);
    }
    Ok(match found {
        Some(def) if def.definition_symbol == *query => format!("{} @ {}", query, def.file.uri()),
        Some(def) => format!(
            "{} -> {} @ {}",
            query,
            def.definition_symbol,
            def.file.uri()
        ),
        None => format!("{query}: not found"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use defscope_core::SourceFile;

    fn found(definition: &str) -> SymbolDefinition {
        SymbolDefinition {
            query_symbol: Symbol::new("a/Foo.apply()."),
            definition_symbol: Symbol::new(definition),
            file: SourceFile::local("/src/a/Foo.scala"),
        }
    }

    #[test]
    fn test_render_alternative_match() {
        let query = Symbol::new("a/Foo.apply().");
        let out = render(&query, Some(&found("a/Foo#")), false).unwrap();
        assert_eq!(out, "a/Foo.apply(). -> a/Foo# @ file:///src/a/Foo.scala");
    }

    #[test]
    fn test_render_not_found_json() {
        let query = Symbol::new("a/Missing#");
        let out = render(&query, None, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["query"], "a/Missing#");
        assert_eq!(value["found"], false);
        assert!(value.get("uri").is_none());
    }
}
