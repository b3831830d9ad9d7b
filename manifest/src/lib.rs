//! Environment manifest handling for envpin
//!
//! Parses the YAML a package manager emits when exporting an environment,
//! strips fields that only make sense on the exporting machine, and writes
//! it back out without reordering anything.

pub mod document;

pub use document::{normalize, Manifest, ManifestError, ManifestResult, NAME_KEY, PREFIX_KEY};

pub mod prelude {
    pub use crate::document::*;
}
