//! Displacement field generation and texture encoding.

pub(crate) mod encoder;
pub(crate) mod generator;
pub(crate) mod grid;

pub use encoder::{EncodedTexture, encode};
pub use generator::{DisplacementField, FieldOutcome, generate};
pub use grid::Grid;
