//! Route and schema auto-discovery.
//!
//! Instead of (or in addition to) doc comments, descriptor content can be synthesized from a
//! live application's route table and from a data-model registry. Both are reached through
//! narrow traits so any router or model library can be plugged in:
//!
//! - [`RouteRegistry`] lists registered routes; [`RouteTable`] is an in-memory implementation
//! - [`SchemaRegistry`] names models and produces their JSON schema; [`SchemarsRegistry`]
//!   delegates to `schemars`

use crate::descriptor::{Definitions, PathMap};
use crate::error::{Error, Result};
use log::debug;
use regex::Regex;
use schemars::{schema_for, JsonSchema, Schema};
use serde_json::{json, Value};
use std::sync::OnceLock;

/// A route table entry as exposed by a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEntry {
    /// A concrete route answering the given HTTP methods
    Route { path: String, methods: Vec<String> },
    /// A sub-router mounted under a prefix
    Mount { prefix: String },
}

/// Source of registered routes, in registration order.
pub trait RouteRegistry {
    fn routes(&self) -> Vec<RouteEntry>;
}

/// Source of model schemas.
///
/// Schema generation is entirely up to the implementation; the descriptor only stores
/// whatever JSON it returns.
pub trait SchemaRegistry {
    /// Registered model names
    fn schema_names(&self) -> Vec<String>;

    /// JSON schema for the named model
    fn json_schema(&self, name: &str) -> Result<Value>;
}

/// Rewrites `:param` placeholders into `{param}`.
///
/// ```
/// use swagger_from_comments::discovery::normalize_path;
///
/// assert_eq!(normalize_path("/users/:id"), "/users/{id}");
/// assert_eq!(normalize_path("/health"), "/health");
/// ```
pub fn normalize_path(path: &str) -> String {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    let regex = PARAM.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").expect("path param pattern"));

    regex.replace_all(path, "{${1}}").into_owned()
}

/// Builds a path map from a route registry.
///
/// Mount entries are skipped. Every method of a concrete route gets a minimal operation
/// (`{"responses": {"200": {}}}`). Entries sharing a path add their methods to it.
pub fn discover_paths(registry: &dyn RouteRegistry) -> PathMap {
    let mut paths = PathMap::new();

    for entry in registry.routes() {
        match entry {
            RouteEntry::Route { path, methods } => {
                let path = normalize_path(&path);
                debug!("Discovered route {} {:?}", path, methods);
                let operations = paths.entry(path).or_default();
                for method in methods {
                    operations.insert(method.to_lowercase(), json!({"responses": {"200": {}}}));
                }
            }
            RouteEntry::Mount { prefix } => {
                debug!("Skipping mounted router at {}", prefix);
            }
        }
    }

    paths
}

/// Builds the definitions map, one entry per registered schema.
///
/// # Errors
///
/// Propagates the first schema generation failure.
pub fn discover_definitions(registry: &dyn SchemaRegistry) -> Result<Definitions> {
    let mut definitions = Definitions::new();

    for name in registry.schema_names() {
        let schema = registry.json_schema(&name)?;
        debug!("Discovered schema {}", name);
        definitions.insert(name, schema);
    }

    Ok(definitions)
}

/// In-memory route registry.
///
/// # Example
///
/// ```
/// use swagger_from_comments::discovery::{discover_paths, RouteTable};
///
/// let table = RouteTable::new()
///     .route("/users", &["GET", "POST"])
///     .route("/users/:id", &["GET"])
///     .mount("/admin");
/// let paths = discover_paths(&table);
/// assert!(paths["/users/{id}"].contains_key("get"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a concrete route
    pub fn route(mut self, path: &str, methods: &[&str]) -> Self {
        self.entries.push(RouteEntry::Route {
            path: path.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    /// Registers a sub-router mount
    pub fn mount(mut self, prefix: &str) -> Self {
        self.entries.push(RouteEntry::Mount {
            prefix: prefix.to_string(),
        });
        self
    }
}

impl RouteRegistry for RouteTable {
    fn routes(&self) -> Vec<RouteEntry> {
        self.entries.clone()
    }
}

/// Schema registry backed by `schemars`.
///
/// Names keep their registration order; registering a name twice replaces the earlier type.
#[derive(Default)]
pub struct SchemarsRegistry {
    schemas: Vec<(String, fn() -> Schema)>,
}

impl SchemarsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `name`
    pub fn register<T: JsonSchema>(mut self, name: &str) -> Self {
        let generate: fn() -> Schema = || schema_for!(T);
        match self.schemas.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = generate,
            None => self.schemas.push((name.to_string(), generate)),
        }
        self
    }
}

impl SchemaRegistry for SchemarsRegistry {
    fn schema_names(&self) -> Vec<String> {
        self.schemas.iter().map(|(name, _)| name.clone()).collect()
    }

    fn json_schema(&self, name: &str) -> Result<Value> {
        let (_, generate) = self
            .schemas
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| Error::Schema {
                name: name.to_string(),
                message: "no such schema registered".to_string(),
            })?;

        Ok(serde_json::to_value(generate())?)
    }
}
