//! Generator configuration.
//!
//! Keys mirror the middleware's option names (`swaggerUI`, `basePath`, ...), so a config file
//! reads the same as the options object a host application would pass in code. Live handles
//! (route table, schema registry, response hook) are not data and are attached on the
//! [`Generator`](crate::generator::Generator) instead.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Descriptor path suffix used when neither `swaggerJSON` nor `fullSwaggerJSONPath` is set
pub const DEFAULT_SWAGGER_JSON: &str = "/api-docs.json";

/// Info version used when neither `info.version` nor `apiVersion` is set
pub const DEFAULT_API_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the static documentation UI (required)
    #[serde(rename = "swaggerUI")]
    pub swagger_ui: Option<PathBuf>,
    /// Base path of the documented API, path or absolute URL (required)
    pub base_path: Option<String>,
    /// Descriptor schema version, `"2.0"` by default
    pub swagger_version: Option<String>,
    /// Info object copied into the descriptor
    pub info: Option<Value>,
    /// Default for `info.version`
    pub api_version: Option<String>,
    /// Source files or directories to scan, in order
    #[serde(default)]
    pub apis: Vec<PathBuf>,
    /// Descriptor path, appended to the path of `basePath`
    #[serde(rename = "swaggerJSON")]
    pub swagger_json: Option<String>,
    /// Full descriptor path; wins over `swaggerJSON`
    #[serde(rename = "fullSwaggerJSONPath")]
    pub full_swagger_json_path: Option<String>,
    /// URL prefix the UI is served under
    #[serde(rename = "swaggerURL")]
    pub swagger_url: Option<String>,
}

impl Config {
    /// Loads a configuration file.
    ///
    /// `.json` files are parsed as JSON; anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not deserialize.
    pub fn from_file(path: &Path) -> Result<Config> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first absent field.
    pub fn validate(&self) -> Result<()> {
        if self.swagger_ui.is_none() {
            return Err(Error::MissingConfig("swaggerUI"));
        }
        if self.base_path.is_none() {
            return Err(Error::MissingConfig("basePath"));
        }
        Ok(())
    }

    /// Info object with `version` filled in.
    ///
    /// Returns `None` only when neither `info` nor `apiVersion` is configured.
    pub fn resolved_info(&self) -> Option<Value> {
        let default_version = self
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        match &self.info {
            Some(Value::Object(map)) => {
                let mut map = map.clone();
                map.entry("version")
                    .or_insert_with(|| Value::String(default_version));
                Some(Value::Object(map))
            }
            Some(other) => Some(other.clone()),
            None => self
                .api_version
                .as_ref()
                .map(|version| serde_json::json!({ "version": version })),
        }
    }

    /// Overlays every field that is set in `other`; `apis` is replaced when non-empty.
    pub fn merge(mut self, other: Config) -> Config {
        self.swagger_ui = other.swagger_ui.or(self.swagger_ui);
        self.base_path = other.base_path.or(self.base_path);
        self.swagger_version = other.swagger_version.or(self.swagger_version);
        self.info = other.info.or(self.info);
        self.api_version = other.api_version.or(self.api_version);
        if !other.apis.is_empty() {
            self.apis = other.apis;
        }
        self.swagger_json = other.swagger_json.or(self.swagger_json);
        self.full_swagger_json_path = other.full_swagger_json_path.or(self.full_swagger_json_path);
        self.swagger_url = other.swagger_url.or(self.swagger_url);
        self
    }
}
