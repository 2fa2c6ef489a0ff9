//! Corpus Module
//!
//! Corpus root resolution and file content access.

mod reader;
mod resolver;

pub use reader::read_text;
pub use resolver::{
    AvailabilityFlags, CorpusId, CorpusLocation, CorpusResolver, DOCS_DIR, EXAMPLES_DIR,
    STDLIB_DIR,
};
