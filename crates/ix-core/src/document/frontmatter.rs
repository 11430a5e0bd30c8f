//! Ordered frontmatter writer

use serde_json::Value;

/// Frontmatter delimiter line
pub const DELIMITER: &str = "---";

/// A single frontmatter value
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterValue {
    /// Rendered as a JSON string literal
    Text(String),
    /// Rendered as `[elem, elem]` with each element JSON-quoted
    List(Vec<String>),
    /// Rendered as compact JSON (numbers, objects)
    Json(Value),
}

impl FrontmatterValue {
    fn render(&self) -> String {
        match self {
            FrontmatterValue::Text(s) => quote(s),
            FrontmatterValue::List(items) => {
                let items: Vec<String> = items.iter().map(|s| quote(s)).collect();
                format!("[{}]", items.join(", "))
            }
            FrontmatterValue::Json(value) => value.to_string(),
        }
    }
}

/// Frontmatter as an explicit ordered list of `(key, value)` pairs.
///
/// Keys with no value are skipped on render; the remaining keys keep the
/// order they were pushed in.
#[derive(Debug, Default)]
pub struct Frontmatter {
    entries: Vec<(&'static str, Option<FrontmatterValue>)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key, present or not
    pub fn push(&mut self, key: &'static str, value: Option<FrontmatterValue>) -> &mut Self {
        self.entries.push((key, value));
        self
    }

    /// Append a text value
    pub fn text(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.push(key, Some(FrontmatterValue::Text(value.into())))
    }

    /// Keys that will be rendered, in order
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Render the block including both delimiter lines
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');
        for (key, value) in &self.entries {
            if let Some(value) = value {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&value.render());
                out.push('\n');
            }
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
