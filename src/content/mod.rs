//! Content module - front-matter, schemas and collection loading

mod date;
pub mod frontmatter;
pub mod loader;
mod schema;

pub use date::parse_date;
pub use frontmatter::FrontMatterError;
pub use loader::{Collection, CollectionError, Collections, ContentError, ContentLoader, Entry};
pub use schema::{
    validate, CollectionKind, ContentItem, FieldIssue, ItemDetails, Language, Problem,
    ValidationError,
};
