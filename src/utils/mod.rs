// src/utils/mod.rs

//! Shared helpers.

pub mod http;
pub mod text;

pub use text::{capitalize_first, strip_non_digits, underscored};
