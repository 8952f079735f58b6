pub mod cascade;
pub mod config;
pub mod dates;
pub mod heuristics;
pub mod items;
pub mod keywords;
pub mod nalja;
pub mod parse_input;

#[cfg(test)]
mod tests;

pub use cascade::Stage;
pub use config::Config;
pub use items::{Item, ItemKind, ItemStore, MemoryStore, NewItem, Schedule};
pub use nalja::Nalja;
pub use parse_input::{DateTextParser, ParseOptions, ParseResult, parse_date_from_text};
