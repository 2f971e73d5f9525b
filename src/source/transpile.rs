//! Normalization of non-native sources into native comment syntax.
//!
//! Only the comments survive normalization: the fragment pipeline never looks at code, so the
//! output is just the source's documentation blocks rewritten as `/* ... */` comments.

use super::Language;
use crate::error::{Error, Result};
use log::debug;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Rewrites `content` so its doc blocks use `/* ... */` delimiters.
///
/// `path` is only used for error messages.
pub fn to_native(language: Language, content: &str, path: &Path) -> Result<String> {
    match language {
        Language::CoffeeScript => Ok(coffee_to_native(content)),
        Language::Rust => rust_to_native(content, path),
    }
}

/// Turns CoffeeScript block comments (`### ... ###`) into `/* ... */`.
///
/// `###*` herecomments become `/** ... */`. A block has to open at the start of a line, and
/// lines of four or more `#` are line comments, not block openers. A leading `#` on a body
/// line is rewritten to `*`, the way the CoffeeScript compiler emits JSDoc.
pub fn coffee_to_native(content: &str) -> String {
    static HERECOMMENT: OnceLock<Regex> = OnceLock::new();
    let regex = HERECOMMENT
        .get_or_init(|| Regex::new(r"(?ms)^[ \t]*###([^#].*?)###").expect("herecomment pattern"));

    let blocks: Vec<String> = regex
        .captures_iter(content)
        .map(|caps| {
            let body: Vec<String> = caps[1]
                .split('\n')
                .map(|line| match line.trim_start().strip_prefix('#') {
                    Some(rest) => format!(" *{}", rest),
                    None => line.to_string(),
                })
                .collect();
            format!("/*{}*/", body.join("\n"))
        })
        .collect();

    debug!("Normalized {} CoffeeScript block comments", blocks.len());
    blocks.join("\n")
}

/// Parses Rust source and re-emits every documented node's docs as one `/** ... */` block.
///
/// # Errors
///
/// Returns [`Error::RustSyntax`] if the file does not parse.
pub fn rust_to_native(content: &str, path: &Path) -> Result<String> {
    let syntax_tree = syn::parse_file(content).map_err(|e| Error::RustSyntax {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut collector = DocCollector::default();
    collector.visit_file(&syntax_tree);

    debug!(
        "Collected {} doc blocks from {}",
        collector.blocks.len(),
        path.display()
    );
    Ok(collector.blocks.join("\n"))
}

/// Gathers doc attributes node by node.
#[derive(Default)]
struct DocCollector {
    blocks: Vec<String>,
}

impl DocCollector {
    /// Line docs (`///`, `//!`) are grouped into one block per node; block docs
    /// (`/** */`) spanning several lines are kept verbatim.
    fn collect(&mut self, attrs: &[Attribute]) {
        let mut lines: Vec<String> = Vec::new();

        for attr in attrs {
            let Some(text) = doc_text(attr) else {
                continue;
            };
            if text.contains('\n') {
                self.flush(&mut lines);
                self.blocks.push(format!("/**{}*/", text));
            } else {
                lines.push(text.strip_prefix(' ').unwrap_or(&text).to_string());
            }
        }

        self.flush(&mut lines);
    }

    fn flush(&mut self, lines: &mut Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let body: Vec<String> = lines.drain(..).map(|l| format!(" * {}", l)).collect();
        self.blocks.push(format!("/**\n{}\n */", body.join("\n")));
    }
}

/// Doc text with `*/` escaped so it cannot close the re-emitted block early.
fn doc_text(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    match &attr.meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value().replace("*/", "*\\/")),
            _ => None,
        },
        _ => None,
    }
}

impl<'ast> Visit<'ast> for DocCollector {
    fn visit_file(&mut self, node: &'ast syn::File) {
        self.collect(&node.attrs);
        visit::visit_file(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.collect(&node.attrs);
        visit::visit_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.collect(&node.attrs);
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.collect(&node.attrs);
        visit::visit_item_enum(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.collect(&node.attrs);
        visit::visit_item_mod(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        self.collect(&node.attrs);
        visit::visit_item_impl(self, node);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        self.collect(&node.attrs);
        visit::visit_item_trait(self, node);
    }

    fn visit_item_const(&mut self, node: &'ast syn::ItemConst) {
        self.collect(&node.attrs);
        visit::visit_item_const(self, node);
    }

    fn visit_item_static(&mut self, node: &'ast syn::ItemStatic) {
        self.collect(&node.attrs);
        visit::visit_item_static(self, node);
    }

    fn visit_item_type(&mut self, node: &'ast syn::ItemType) {
        self.collect(&node.attrs);
        visit::visit_item_type(self, node);
    }

    fn visit_item_macro(&mut self, node: &'ast syn::ItemMacro) {
        self.collect(&node.attrs);
        visit::visit_item_macro(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.collect(&node.attrs);
        visit::visit_impl_item_fn(self, node);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        self.collect(&node.attrs);
        visit::visit_trait_item_fn(self, node);
    }

    fn visit_field(&mut self, node: &'ast syn::Field) {
        self.collect(&node.attrs);
        visit::visit_field(self, node);
    }

    fn visit_variant(&mut self, node: &'ast syn::Variant) {
        self.collect(&node.attrs);
        visit::visit_variant(self, node);
    }
}
