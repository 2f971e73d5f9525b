use crate::config::{Config, DEFAULT_SWAGGER_JSON};
use crate::descriptor::{DocRegistry, DEFAULT_SWAGGER_VERSION};
use crate::discovery::{discover_definitions, discover_paths, RouteRegistry, SchemaRegistry};
use crate::error::{Error, Result};
use crate::middleware::{DocsMiddleware, ResponseHook, StaticUi};
use crate::scanner::expand_apis;
use crate::source::SourceFile;
use log::{debug, info, warn};

/// Builds the descriptor once and hands back the middleware serving it.
///
/// Every step runs synchronously and in order; the first error ends initialization and no
/// middleware is produced.
///
/// # Example
///
/// ```no_run
/// use swagger_from_comments::config::Config;
/// use swagger_from_comments::discovery::RouteTable;
/// use swagger_from_comments::generator::Generator;
/// use std::path::PathBuf;
///
/// let config = Config {
///     swagger_ui: Some(PathBuf::from("./public/swagger")),
///     base_path: Some("http://localhost:3000".to_string()),
///     swagger_url: Some("/swagger".to_string()),
///     apis: vec![PathBuf::from("./routes")],
///     ..Config::default()
/// };
/// let docs = Generator::new(config)
///     .with_routes(Box::new(RouteTable::new().route("/users/:id", &["GET"])))
///     .generate()
///     .unwrap();
/// println!("Descriptor served at {}", docs.descriptor_url());
/// ```
pub struct Generator {
    config: Config,
    routes: Option<Box<dyn RouteRegistry>>,
    schemas: Option<Box<dyn SchemaRegistry>>,
    hook: Option<ResponseHook>,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            routes: None,
            schemas: None,
            hook: None,
        }
    }

    /// Attaches a live route table; its routes replace fragment-derived top-level paths
    pub fn with_routes(mut self, routes: Box<dyn RouteRegistry>) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Attaches a model registry used to fill `definitions`
    pub fn with_schemas(mut self, schemas: Box<dyn SchemaRegistry>) -> Self {
        self.schemas = Some(schemas);
        self
    }

    /// Attaches a hook run on every descriptor response
    pub fn with_hook(mut self, hook: ResponseHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Builds the descriptor and the middleware serving it.
    ///
    /// # Errors
    ///
    /// Fails on a missing required field, an unsupported source extension, or any read or
    /// parse error in a source file. Sources after the failing one are not read.
    pub fn generate(self) -> Result<DocsMiddleware> {
        let Generator {
            config,
            routes,
            schemas,
            hook,
        } = self;

        config.validate()?;
        let swagger_ui = config.swagger_ui.clone().ok_or(Error::MissingConfig("swaggerUI"))?;
        let base_path = config.base_path.clone().ok_or(Error::MissingConfig("basePath"))?;

        let swagger_version = config
            .swagger_version
            .clone()
            .unwrap_or_else(|| DEFAULT_SWAGGER_VERSION.to_string());
        let mut registry = DocRegistry::new(swagger_version, base_path, config.resolved_info());

        if let Some(routes) = &routes {
            registry.replace_paths(discover_paths(routes.as_ref()));
        }
        if let Some(schemas) = &schemas {
            registry.set_definitions(discover_definitions(schemas.as_ref())?);
        }

        let descriptor_url = descriptor_url(&config)?;
        info!("Descriptor will be served at {}", descriptor_url);

        let sources = expand_apis(&config.apis);
        info!("Reading {} API sources", sources.len());
        for path in &sources {
            let source = SourceFile::from_path(path)?;
            for fragment in source.read_fragments()? {
                registry.merge_fragment(fragment);
            }
        }
        debug!(
            "Descriptor has {} paths and {} definitions",
            registry.paths().len(),
            registry.definitions().len()
        );

        let ui = match &config.swagger_url {
            Some(prefix) => Some(StaticUi::new(prefix, swagger_ui)),
            None => {
                warn!("swaggerURL is not set; the documentation UI will not be served");
                None
            }
        };

        DocsMiddleware::new(registry, descriptor_url, ui, hook)
    }
}

/// Resolves the path the descriptor is served under.
///
/// `fullSwaggerJSONPath` wins when set. Otherwise the path of `basePath` is joined with
/// `swaggerJSON`. An absolute URL contributes its path component; anything else is taken as a
/// path, rooted at `/`.
pub fn descriptor_url(config: &Config) -> Result<String> {
    if let Some(full) = &config.full_swagger_json_path {
        return Ok(full.clone());
    }

    let base_path = config
        .base_path
        .as_deref()
        .ok_or(Error::MissingConfig("basePath"))?;
    let base = if base_path.contains("://") {
        url::Url::parse(base_path)
            .map_err(|e| Error::Config(format!("invalid basePath {}: {}", base_path, e)))?
            .path()
            .to_string()
    } else {
        format!("/{}", base_path.trim_start_matches('/'))
    };

    let suffix = config.swagger_json.as_deref().unwrap_or(DEFAULT_SWAGGER_JSON);
    let suffix = suffix.trim_start_matches('/');

    Ok(format!("{}/{}", base.trim_end_matches('/'), suffix))
}
