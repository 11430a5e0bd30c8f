//! `.intel` document format
//!
//! A document is a frontmatter block followed by the record body:
//!
//! ```text
//! ---
//! id: "a"
//! title: "T"
//! created: "2024-03-05T10:00:00.000Z"
//! classification: "UNCLASS"
//! priority: "medium"
//! sources: ["S"]
//! tags: ["X"]
//! ---
//!
//! Body
//! ```

mod frontmatter;
mod serializer;

pub use frontmatter::{Frontmatter, FrontmatterValue, DELIMITER};
pub use serializer::{serialize, DocumentSerializer, FRONTMATTER_KEYS, INTEL_EXTENSION};
