//! HTTP protocol layer module
//!
//! Protocol-level building blocks (content types, response builders,
//! conditional requests, byte ranges) with no knowledge of routing.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;
