// src/pipeline/mod.rs

//! Pipeline steps for one publishing run.
//!
//! fetch → parse → normalize/diff → route → format → publish → checkpoint

pub mod caption;
pub mod diff;
pub mod publish;
pub mod route;
pub mod run;

pub use run::run;
