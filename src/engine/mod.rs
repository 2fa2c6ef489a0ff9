//! Engine Module
//!
//! Stateless query functions over a corpus root: recursive search and
//! listing, module introspection and single-item retrieval. All work is
//! blocking and sequential.

pub mod item;
pub mod listing;
pub mod module_info;
pub mod search;
pub mod walk;

pub use item::{get_item, ItemContent};
pub use listing::{list_entries, ListingEntry};
pub use module_info::{describe_module, ModuleFile, ModuleInfo};
pub use search::{search_directory, search_documentation, SearchResult};
