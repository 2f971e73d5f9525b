use crate::fragment::{Fragment, Operations};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Path template -> method -> operation
pub type PathMap = BTreeMap<String, Operations>;

/// Schema name -> JSON schema
pub type Definitions = BTreeMap<String, Value>;

/// Swagger version used when the configuration does not name one
pub const DEFAULT_SWAGGER_VERSION: &str = "2.0";

/// The served API descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Descriptor schema version
    pub swagger: String,
    /// Base path of the described API
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Free-form info object; carries at least `version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    /// Merged paths (always serialized, possibly empty)
    #[serde(default)]
    pub paths: PathMap,
    /// Model definitions (always serialized, possibly empty)
    #[serde(default)]
    pub definitions: Definitions,
}

/// Holds the descriptor under construction.
///
/// A registry is filled once by the generator and then only read. Auto-discovered routes
/// *seal* the set of top-level paths: afterwards fragments can still add or replace methods on
/// known paths, but new paths are dropped.
#[derive(Debug, Clone)]
pub struct DocRegistry {
    swagger: String,
    base_path: String,
    info: Option<Value>,
    paths: PathMap,
    definitions: Definitions,
    sealed: bool,
}

impl DocRegistry {
    /// Creates an empty registry with the descriptor metadata
    pub fn new(swagger: String, base_path: String, info: Option<Value>) -> Self {
        debug!("Initializing DocRegistry for base path {}", base_path);
        Self {
            swagger,
            base_path,
            info,
            paths: PathMap::new(),
            definitions: Definitions::new(),
            sealed: false,
        }
    }

    /// Merges a fragment by path, then by method; later operations replace earlier ones.
    pub fn merge_fragment(&mut self, fragment: Fragment) {
        for (path, operations) in fragment.paths {
            if self.sealed && !self.paths.contains_key(&path) {
                debug!("Dropping {}: not a discovered route", path);
                continue;
            }

            let existing = self.paths.entry(path).or_default();
            for (method, operation) in operations {
                existing.insert(method, operation);
            }
        }
    }

    /// Installs auto-discovered paths in place of everything merged so far and seals the
    /// top-level path set.
    pub fn replace_paths(&mut self, paths: PathMap) {
        debug!("Replacing path map with {} discovered routes", paths.len());
        self.paths = paths;
        self.sealed = true;
    }

    /// Installs auto-discovered schema definitions
    pub fn set_definitions(&mut self, definitions: Definitions) {
        self.definitions = definitions;
    }

    pub fn paths(&self) -> &PathMap {
        &self.paths
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Assembles the descriptor from the skeleton and the current maps
    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            swagger: self.swagger.clone(),
            base_path: self.base_path.clone(),
            info: self.info.clone(),
            paths: self.paths.clone(),
            definitions: self.definitions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> DocRegistry {
        DocRegistry::new("2.0".to_string(), "/api".to_string(), None)
    }

    fn fragment(value: Value) -> Fragment {
        Fragment::from_value(value).unwrap().unwrap()
    }

    #[test]
    fn test_empty_descriptor_keeps_paths_and_definitions() {
        let json = serde_json::to_value(registry().descriptor()).unwrap();

        assert_eq!(
            json,
            json!({"swagger": "2.0", "basePath": "/api", "paths": {}, "definitions": {}})
        );
    }

    #[test]
    fn test_merge_disjoint_methods() {
        let mut registry = registry();
        registry.merge_fragment(fragment(json!({"/users": {"get": {"summary": "list"}}})));
        registry.merge_fragment(fragment(json!({"/users": {"post": {"summary": "create"}}})));

        let users = &registry.paths()["/users"];
        assert_eq!(users.len(), 2);
        assert_eq!(users["get"], json!({"summary": "list"}));
        assert_eq!(users["post"], json!({"summary": "create"}));
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut registry = registry();
        registry.merge_fragment(fragment(json!({"/users": {"get": {"summary": "first"}}})));
        registry.merge_fragment(fragment(json!({"/users": {"get": {"summary": "second"}}})));

        assert_eq!(registry.paths()["/users"]["get"], json!({"summary": "second"}));
    }

    #[test]
    fn test_replace_paths_seals_top_level() {
        let mut registry = registry();
        registry.merge_fragment(fragment(json!({"/old": {"get": {}}})));

        let mut discovered = PathMap::new();
        discovered
            .entry("/users/{id}".to_string())
            .or_default()
            .insert("get".to_string(), json!({"responses": {"200": {}}}));
        registry.replace_paths(discovered);

        registry.merge_fragment(fragment(json!({
            "/new": {"get": {}},
            "/users/{id}": {"get": {"summary": "documented"}, "delete": {}}
        })));

        let keys: Vec<&str> = registry.paths().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["/users/{id}"]);
        assert_eq!(
            registry.paths()["/users/{id}"]["get"],
            json!({"summary": "documented"})
        );
        assert!(registry.paths()["/users/{id}"].contains_key("delete"));
    }

    #[test]
    fn test_descriptor_includes_info_and_definitions() {
        let mut registry = DocRegistry::new(
            "2.0".to_string(),
            "http://localhost:3000".to_string(),
            Some(json!({"title": "Pets", "version": "1.2"})),
        );
        let mut definitions = Definitions::new();
        definitions.insert("Pet".to_string(), json!({"type": "object"}));
        registry.set_definitions(definitions);

        let descriptor = registry.descriptor();
        assert_eq!(descriptor.info.as_ref().unwrap()["version"], "1.2");
        assert_eq!(descriptor.definitions["Pet"]["type"], "object");
        assert_eq!(registry.definitions().len(), 1);
    }
}
