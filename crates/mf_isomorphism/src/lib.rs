//! # mf_isomorphism
//!
//! A generic backtracking subgraph isomorphism search (Ullmann), driven by a
//! caller-supplied `IsomorphismStrategy`, plus a strategy that compares two
//! residue graphs by residue type and typed relations.
//!
//! The search holds no global state: independent graph pairs may be
//! searched in parallel. A single search is synchronous and can only be cut
//! short through the strategy (early stop in `process_match` or a step
//! budget in `isomorphism_check`).

mod error;
mod strategy;
mod ullmann;
mod residue_matcher;

pub use error::*;
pub use strategy::*;
pub use ullmann::*;
pub use residue_matcher::*;
