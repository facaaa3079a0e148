// Artwork module - JPEG classification, re-encoding and per-file normalization

pub mod error;
pub mod jpeg;
pub mod normalize;
pub mod transform;

pub use normalize::{NormalizeOutcome, Normalizer, SkipReason};
pub use transform::{ArtworkTransform, JpegResizer};
