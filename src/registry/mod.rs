//! Registry of validated values shared between parsing passes.
//!
//! [`ParseInfo`] maps field names to values the parser has already checked.
//! It sits on a small [`HashTable`] with a fixed bucket count, chosen at
//! construction.

mod hash_table;
mod parse_info;

pub use hash_table::{HashTable, DEFAULT_BUCKET_COUNT};
pub use parse_info::{ParseInfo, Value};
