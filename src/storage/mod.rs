//! Client-side persistence
//!
//! The API owns all budgeting data; the client only keeps its session tokens
//! and the bank sync cursor on disk.

pub mod file_io;

pub use file_io::{read_json_optional, remove_if_exists, write_json_atomic};
