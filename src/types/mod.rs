//! Core types for the segmentation pipeline.

mod chunk;
mod config;
mod element;

pub use chunk::{Chunk, ChunkMetadata};
pub use config::PipelineConfig;
pub use element::{
    Element, ElementGroup, ElementKind, ElementMetadata, ImageRef, Link, Provenance,
};
