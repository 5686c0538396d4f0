//! Scripture citations ("Jn 3:16; Gen 1-2") resolved against a verse store
//! and rendered through text templates.
//!
//! ```text
//! "Gen 1:1; Xyz 2"
//!      │ parser        → [Reference(Genesis, 1:1), BadReference("Xyz 2")]
//!      │ books         → book names resolved against the 66-book canon
//!      │ verses        → "1,3-5" expanded to [1, 3, 4, 5]
//!      │ store         → verse texts
//!      ▼ render        → count line + one line per reference
//! ```

#[macro_use]
extern crate serde_derive;
#[cfg_attr(test, macro_use)]
extern crate serde_json;
#[macro_use]
extern crate tracing;

pub mod books;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod render;
pub mod store;
pub mod templates;
pub mod verses;

pub use books::{Book, BookRegistry};
pub use cache::{CacheKey, MemoryCache, NoCache, ResultCache};
pub use error::{BadReference, ReferenceError, ServiceError};
pub use parser::{Reference, ReferenceKind};
pub use render::{Citations, RenderOptions, RenderedPassage};
pub use store::{ChapterSpan, MemoryVerseStore, PostgresVerseStore, VerseStore};
pub use templates::Templates;
