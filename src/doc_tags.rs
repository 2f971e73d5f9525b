//! Doc-comment tag parsing.
//!
//! A comment block is first *unwrapped*: the `/**` and `*/` delimiters go away, and so does the
//! leading `*` gutter on each line. The remaining text is then split into a free-form description
//! and a list of `@tag` entries. Tag descriptions keep their relative indentation because
//! `@swagger` bodies are YAML.

use crate::error::{Error, Result};

/// A parsed doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Text before the first tag
    pub description: String,
    /// Tags in the order they appear
    pub tags: Vec<Tag>,
}

/// A single `@title description` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub title: String,
    pub description: String,
}

impl DocComment {
    /// Parses one comment block, delimiters included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommentSyntax`] when a line opens a tag with a bare `@`.
    pub fn parse(block: &str) -> Result<DocComment> {
        let lines = unwrap(block);

        let mut description = Vec::new();
        let mut tags = Vec::new();
        let mut current: Option<(String, String, Vec<&str>)> = None;

        for line in lines {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix('@') {
                let title: String = rest
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
                    .collect();
                if title.is_empty() {
                    return Err(Error::CommentSyntax(format!(
                        "expected a tag name after `@` in line {:?}",
                        line
                    )));
                }

                if let Some((title, inline, body)) = current.take() {
                    tags.push(Tag::new(title, &inline, &body));
                }
                let inline = rest[title.len()..].trim().to_string();
                current = Some((title, inline, Vec::new()));
            } else if let Some((_, _, body)) = current.as_mut() {
                body.push(line);
            } else {
                description.push(line.trim());
            }
        }

        if let Some((title, inline, body)) = current {
            tags.push(Tag::new(title, &inline, &body));
        }

        Ok(DocComment {
            description: description.join("\n").trim().to_string(),
            tags,
        })
    }

    /// Ordered tag list
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Tag {
    fn new(title: String, inline: &str, body: &[&str]) -> Self {
        let body = dedent(body);
        let description = match (inline.is_empty(), body.is_empty()) {
            (true, _) => body,
            (false, true) => inline.to_string(),
            (false, false) => format!("{}\n{}", inline, body),
        };
        Self { title, description }
    }
}

/// Strips the comment delimiters and the `*` gutter, returning the content lines.
fn unwrap(block: &str) -> Vec<&str> {
    let mut text = block.trim();
    text = text
        .strip_prefix("/**")
        .or_else(|| text.strip_prefix("/*"))
        .unwrap_or(text);
    text = text.strip_suffix("*/").unwrap_or(text);

    text.lines()
        .map(|line| {
            let stripped = line.trim_start();
            match stripped.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect()
}

/// Removes the common leading whitespace and surrounding blank lines.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect();

    let start = dedented.iter().position(|l| !l.trim().is_empty());
    let end = dedented.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => dedented[start..=end]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
