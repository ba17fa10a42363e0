// src/storage/mod.rs

//! Local file persistence: the checkpoint and the topic lookup table.

pub mod checkpoint;
pub mod topics;

pub use checkpoint::{Checkpoint, CheckpointStore};
