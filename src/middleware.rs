//! Request handling for the descriptor endpoint and the documentation UI.
//!
//! [`DocsMiddleware`] is framework-agnostic: it inspects an `http::Request` and either answers
//! it or hands it back with [`Outcome::Next`] so the host server can continue down its
//! handler chain.
//!
//! # Example
//!
//! ```no_run
//! use swagger_from_comments::config::Config;
//! use swagger_from_comments::generator::Generator;
//! use swagger_from_comments::middleware::Outcome;
//!
//! let config = Config::from_file(std::path::Path::new("docs.yml")).unwrap();
//! let docs = Generator::new(config).generate().unwrap();
//!
//! let request = http::Request::get("/api-docs.json").body(()).unwrap();
//! match docs.handle(&request) {
//!     Outcome::Respond(response) => println!("{}", response.status()),
//!     Outcome::Next => println!("not ours"),
//! }
//! ```

use crate::descriptor::{Descriptor, DocRegistry};
use crate::error::{Error, Result};
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri};
use log::{debug, warn};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The assembled descriptor, still structured
    Descriptor(Descriptor),
    /// Raw file contents
    Bytes(Vec<u8>),
    Empty,
}

impl Body {
    /// Encodes the body for the wire; descriptors become JSON.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Body::Descriptor(descriptor) => Ok(serde_json::to_vec(&descriptor)?),
            Body::Bytes(bytes) => Ok(bytes),
            Body::Empty => Ok(Vec::new()),
        }
    }
}

/// Result of offering a request to the middleware.
#[derive(Debug)]
pub enum Outcome {
    /// The request was handled
    Respond(Response<Body>),
    /// Not a documentation request; continue with the next handler
    Next,
}

/// The parts of a request a hook gets to see.
pub struct RequestHead<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
}

/// Side effect run on every descriptor response right before it is returned.
pub type ResponseHook = Box<dyn Fn(&RequestHead<'_>, &mut Response<Body>) + Send + Sync>;

/// Serves the merged descriptor and the static documentation UI.
pub struct DocsMiddleware {
    registry: DocRegistry,
    descriptor_url: String,
    descriptor_pattern: Regex,
    ui: Option<StaticUi>,
    hook: Option<ResponseHook>,
}

impl DocsMiddleware {
    pub(crate) fn new(
        registry: DocRegistry,
        descriptor_url: String,
        ui: Option<StaticUi>,
        hook: Option<ResponseHook>,
    ) -> Result<Self> {
        let pattern = format!("^{}(/.*)?$", regex::escape(&descriptor_url));
        let descriptor_pattern = Regex::new(&pattern)
            .map_err(|e| Error::Config(format!("bad descriptor URL {}: {}", descriptor_url, e)))?;

        Ok(Self {
            registry,
            descriptor_url,
            descriptor_pattern,
            ui,
            hook,
        })
    }

    /// Path the descriptor is served under
    pub fn descriptor_url(&self) -> &str {
        &self.descriptor_url
    }

    /// UI URL prefix, if the UI is served
    pub fn ui_prefix(&self) -> Option<&str> {
        self.ui.as_ref().map(|ui| ui.prefix.as_str())
    }

    pub fn registry(&self) -> &DocRegistry {
        &self.registry
    }

    /// Current descriptor snapshot
    pub fn descriptor(&self) -> Descriptor {
        self.registry.descriptor()
    }

    /// Tries the descriptor endpoint, then the UI.
    pub fn handle<B>(&self, request: &Request<B>) -> Outcome {
        if let Some(response) = self.serve_descriptor(request) {
            return Outcome::Respond(response);
        }
        if let Some(response) = self.serve_ui(request) {
            return Outcome::Respond(response);
        }
        Outcome::Next
    }

    /// Answers requests for the descriptor URL (and any sub-path of it).
    pub fn serve_descriptor<B>(&self, request: &Request<B>) -> Option<Response<Body>> {
        let path = request.uri().path();
        if !self.descriptor_pattern.is_match(path) {
            return None;
        }
        debug!("Serving descriptor for {}", path);

        // No 404 branch: the registry always owns a path map, empty or not.
        let mut response = Response::new(Body::Descriptor(self.registry.descriptor()));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(hook) = &self.hook {
            let head = RequestHead {
                method: request.method(),
                uri: request.uri(),
                headers: request.headers(),
            };
            hook(&head, &mut response);
        }

        Some(response)
    }

    /// Answers GET/HEAD requests under the UI prefix.
    pub fn serve_ui<B>(&self, request: &Request<B>) -> Option<Response<Body>> {
        let ui = self.ui.as_ref()?;
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return None;
        }
        ui.serve(request.uri())
    }
}

/// Static documentation assets mounted under a URL prefix.
#[derive(Debug, Clone)]
pub struct StaticUi {
    prefix: String,
    root: PathBuf,
}

impl StaticUi {
    /// `prefix` is normalized to have no trailing slash
    pub fn new(prefix: &str, root: PathBuf) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            root,
        }
    }

    fn serve(&self, uri: &Uri) -> Option<Response<Body>> {
        let path = uri.path();

        if !self.prefix.is_empty() && path == self.prefix {
            let location = match uri.query() {
                Some(query) => format!("{}/?{}", self.prefix, query),
                None => format!("{}/", self.prefix),
            };
            debug!("Redirecting {} to {}", path, location);
            let location = HeaderValue::from_str(&location).ok()?;

            let mut response = Response::new(Body::Empty);
            *response.status_mut() = StatusCode::FOUND;
            response.headers_mut().insert(LOCATION, location);
            return Some(response);
        }

        let rest = path.strip_prefix(self.prefix.as_str())?.strip_prefix('/')?;
        let rest = percent_decode_str(rest).decode_utf8().ok()?;
        let rest: &str = if rest.is_empty() { "index.html" } else { &rest };
        let file = self.map_path(rest)?;
        if !file.is_file() {
            return None;
        }

        match fs::read(&file) {
            Ok(bytes) => {
                let mut response = Response::new(Body::Bytes(bytes));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(content_type(&file)));
                Some(response)
            }
            Err(e) => {
                warn!("Failed to read UI asset {}: {}", file.display(), e);
                None
            }
        }
    }

    /// Joins a URL path onto the asset root, refusing anything but plain components.
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for component in Path::new(url_path).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(path)
    }
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "map" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn middleware(ui: Option<StaticUi>, hook: Option<ResponseHook>) -> DocsMiddleware {
        let registry = DocRegistry::new("2.0".to_string(), "/api".to_string(), None);
        DocsMiddleware::new(registry, "/api-docs.json".to_string(), ui, hook).unwrap()
    }

    fn get(uri: &str) -> Request<()> {
        Request::get(uri).body(()).unwrap()
    }

    fn ui_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<html>docs</html>").unwrap();
        fs::create_dir(temp_dir.path().join("lib")).unwrap();
        fs::write(temp_dir.path().join("lib/app.js"), "console.log(1)").unwrap();
        temp_dir
    }

    #[test]
    fn test_descriptor_url_matches_with_sub_path() {
        let docs = middleware(None, None);

        assert!(docs.serve_descriptor(&get("/api-docs.json")).is_some());
        assert!(docs.serve_descriptor(&get("/api-docs.json/users")).is_some());
        assert!(docs.serve_descriptor(&get("/api-docs.json?x=1")).is_some());
        assert!(docs.serve_descriptor(&get("/api-docs.jsonx")).is_none());
        assert!(docs.serve_descriptor(&get("/v1/api-docs.json")).is_none());
    }

    #[test]
    fn test_descriptor_url_is_matched_literally() {
        let docs = middleware(None, None);
        assert!(docs.serve_descriptor(&get("/api-docsXjson")).is_none());
    }

    #[test]
    fn test_descriptor_response_body() {
        let docs = middleware(None, None);
        let response = match docs.handle(&get("/api-docs.json")) {
            Outcome::Respond(response) => response,
            Outcome::Next => panic!("descriptor request was not handled"),
        };

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let bytes = response.into_body().into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["paths"], json!({}));
        assert_eq!(json["definitions"], json!({}));
        assert_eq!(json["swagger"], "2.0");
    }

    #[test]
    fn test_hook_runs_before_response() {
        let hook: ResponseHook = Box::new(|head: &RequestHead<'_>, response: &mut Response<Body>| {
            let value = HeaderValue::from_str(head.uri.path()).unwrap();
            response.headers_mut().insert("x-docs-path", value);
        });
        let docs = middleware(None, Some(hook));

        let response = docs.serve_descriptor(&get("/api-docs.json")).unwrap();
        assert_eq!(response.headers()["x-docs-path"], "/api-docs.json");
    }

    #[test]
    fn test_unrelated_request_passes_through() {
        let dir = ui_dir();
        let docs = middleware(Some(StaticUi::new("/docs", dir.path().to_path_buf())), None);

        assert!(matches!(docs.handle(&get("/users")), Outcome::Next));
        assert!(matches!(docs.handle(&get("/docsx")), Outcome::Next));
    }

    #[test]
    fn test_ui_prefix_redirects_to_trailing_slash() {
        let dir = ui_dir();
        let docs = middleware(Some(StaticUi::new("/docs/", dir.path().to_path_buf())), None);

        let response = docs.serve_ui(&get("/docs")).unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/docs/");

        let response = docs.serve_ui(&get("/docs?url=/x")).unwrap();
        assert_eq!(response.headers()[LOCATION], "/docs/?url=/x");
    }

    #[test]
    fn test_ui_serves_index_and_assets() {
        let dir = ui_dir();
        let docs = middleware(Some(StaticUi::new("/docs", dir.path().to_path_buf())), None);

        let index = docs.serve_ui(&get("/docs/")).unwrap();
        assert_eq!(index.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(index.into_body(), Body::Bytes(b"<html>docs</html>".to_vec()));

        let script = docs.serve_ui(&get("/docs/lib/app.js")).unwrap();
        assert_eq!(script.headers()[CONTENT_TYPE], "application/javascript");
    }

    #[test]
    fn test_ui_missing_or_escaping_paths_fall_through() {
        let dir = ui_dir();
        let docs = middleware(Some(StaticUi::new("/docs", dir.path().to_path_buf())), None);

        assert!(docs.serve_ui(&get("/docs/missing.css")).is_none());
        assert!(docs.serve_ui(&get("/docs/../Cargo.toml")).is_none());
        assert!(docs.serve_ui(&get("/docs/lib")).is_none());
    }

    #[test]
    fn test_ui_decodes_escaped_paths() {
        let dir = ui_dir();
        fs::write(dir.path().join("my file.css"), "body {}").unwrap();
        let docs = middleware(Some(StaticUi::new("/docs", dir.path().to_path_buf())), None);

        let style = docs.serve_ui(&get("/docs/my%20file.css")).unwrap();
        assert_eq!(style.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(style.into_body(), Body::Bytes(b"body {}".to_vec()));

        assert!(docs.serve_ui(&get("/docs/%2E%2E/Cargo.toml")).is_none());
        assert!(docs.serve_ui(&get("/docs/..%2FCargo.toml")).is_none());
        assert!(docs.serve_ui(&get("/docs/%FF.css")).is_none());
    }

    #[test]
    fn test_ui_ignores_non_get_requests() {
        let dir = ui_dir();
        let docs = middleware(Some(StaticUi::new("/docs", dir.path().to_path_buf())), None);

        let request = Request::post("/docs/").body(()).unwrap();
        assert!(docs.serve_ui(&request).is_none());
    }

    #[test]
    fn test_map_path_prevents_traversal() {
        let ui = StaticUi::new("/docs", PathBuf::from("/srv/ui"));

        assert!(ui.map_path("../etc/passwd").is_none());
        assert!(ui.map_path("/etc/passwd").is_none());
        assert_eq!(ui.map_path("./a/b.css"), Some(PathBuf::from("/srv/ui/a/b.css")));
    }
}
