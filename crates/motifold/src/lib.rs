//! # motifold
//!
//! Unified API for annotating structural motifs of RNA residue graphs.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod input_parsers;
pub mod annotation_parsers;

pub mod structure {
    pub use ::mf_structure::*;
}

pub mod isomorphism {
    pub use ::mf_isomorphism::*;
}

pub mod motifs {
    pub use ::mf_motifs::*;
}
