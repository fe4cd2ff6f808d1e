//! Core data model types: structured field values, headers and the message tree.

pub mod field;
pub mod header;
pub mod message;
