//! Common types, wire-layout descriptors, and errors shared across the envelope crates.

pub mod error;
pub mod protocol;

pub use error::{EnvelopeError, Result};
pub use protocol::{Algorithm, BlockMode, Encoding, EnvelopeLayout, EnvelopeReport};
