// src/lib.rs

//! offercast library
//!
//! One run = fetch the listing feed, parse it, diff against the stored
//! checkpoint, route and publish the new listings, then advance the
//! checkpoint.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
