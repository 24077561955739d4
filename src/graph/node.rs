/// A declaration in the theorem dependency graph.
///
/// Field names follow the backend's snake_case export; the camelCase spelling
/// used by the web client is accepted as an alias.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphNode {
    /// Fully qualified declaration name, e.g. `Nat.Prime`. Unique within a graph.
    pub name: String,
    /// Declaration category: "Theorem", "Definition", "Structure", "Inductive", ...
    #[serde(default, alias = "constCategory")]
    pub const_category: String,
    /// Pretty-printed type of the declaration.
    #[serde(default, alias = "constType", skip_serializing_if = "Option::is_none")]
    pub const_type: Option<String>,
    /// Defining module, e.g. `Mathlib.Data.Nat.Prime.Defs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, alias = "docString", skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default, alias = "informalName", skip_serializing_if = "Option::is_none")]
    pub informal_name: Option<String>,
    #[serde(default, alias = "informalStatement", skip_serializing_if = "Option::is_none")]
    pub informal_statement: Option<String>,
}

impl GraphNode {
    /// A node carrying only a name and category.
    pub fn new(name: impl Into<String>, const_category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            const_category: const_category.into(),
            const_type: None,
            module: None,
            doc_string: None,
            informal_name: None,
            informal_statement: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    /// The category as shown to users; blank categories read as "Unknown".
    pub fn category_label(&self) -> &str {
        if self.const_category.trim().is_empty() {
            "Unknown"
        } else {
            &self.const_category
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snake_and_camel_case() {
        let snake: GraphNode = serde_json::from_str(
            r#"{"name":"Nat.Prime","const_category":"Definition","doc_string":"primes"}"#,
        )
        .unwrap();
        let camel: GraphNode = serde_json::from_str(
            r#"{"name":"Nat.Prime","constCategory":"Definition","docString":"primes"}"#,
        )
        .unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.doc_string.as_deref(), Some("primes"));
        assert!(snake.module.is_none());
    }

    #[test]
    fn test_category_label_defaults_to_unknown() {
        assert_eq!(GraphNode::new("x", "").category_label(), "Unknown");
        assert_eq!(GraphNode::new("x", "Theorem").category_label(), "Theorem");
    }
}
