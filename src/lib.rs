//! Swagger From Comments - Swagger descriptors assembled from `@swagger` doc comments.
//!
//! API authors document each route next to its handler in a doc comment whose `@swagger` tag
//! holds a YAML path fragment. At startup the library reads every configured source, merges
//! the fragments (optionally on top of routes and models discovered from the running
//! application) and serves the result as a Swagger 2.0 JSON descriptor next to a static
//! documentation UI.
//!
//! # Supported Sources
//!
//! - **JavaScript** (`.js`, `.mjs`, `.cjs`): `/** ... */` doc blocks
//! - **CoffeeScript** (`.coffee`): `### ... ###` herecomments
//! - **Rust** (`.rs`): `///`, `//!` and `/** */` doc comments
//! - **YAML / JSON** (`.yml`, `.yaml`, `.json`): one whole fragment per file
//!
//! # Architecture
//!
//! 1. [`scanner`] - Expands directories in the `apis` list into source files
//! 2. [`source`] - Picks a dialect per file and normalizes it to doc-comment syntax
//! 3. [`comments`] - Finds comment blocks in source text
//! 4. [`doc_tags`] - Splits a comment block into tags
//! 5. [`fragment`] - Turns `@swagger` tag bodies into path fragments
//! 6. [`discovery`] - Derives paths and definitions from live route and schema registries
//! 7. [`descriptor`] - Merges everything into the descriptor
//! 8. [`generator`] - Runs the steps above in order
//! 9. [`middleware`] - Serves the descriptor and the UI
//! 10. [`serializer`] - Writes the descriptor as YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_comments::{
//!     config::Config,
//!     discovery::RouteTable,
//!     generator::Generator,
//!     middleware::Outcome,
//! };
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     swagger_ui: Some(PathBuf::from("./public/swagger")),
//!     base_path: Some("http://localhost:3000".to_string()),
//!     swagger_url: Some("/swagger".to_string()),
//!     apis: vec![PathBuf::from("./routes"), PathBuf::from("./api.yml")],
//!     ..Config::default()
//! };
//!
//! let routes = RouteTable::new()
//!     .route("/users", &["GET", "POST"])
//!     .route("/users/:id", &["GET"]);
//!
//! let docs = Generator::new(config)
//!     .with_routes(Box::new(routes))
//!     .generate()
//!     .unwrap();
//!
//! let request = http::Request::get("/api-docs.json").body(()).unwrap();
//! if let Outcome::Respond(response) = docs.handle(&request) {
//!     let body = response.into_body().into_bytes().unwrap();
//!     println!("{}", String::from_utf8_lossy(&body));
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod comments;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod doc_tags;
pub mod error;
pub mod fragment;
pub mod generator;
pub mod middleware;
pub mod scanner;
pub mod serializer;
pub mod source;

pub use error::{Error, Result};
