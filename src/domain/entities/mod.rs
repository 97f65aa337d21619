//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with its visit counter

pub mod link;

pub use link::Link;
