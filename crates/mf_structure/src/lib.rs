mod error;
mod residue;
mod interaction;
mod relation;
mod graph;
mod records;
mod dotbracket;

pub use error::*;
pub use residue::*;
pub use interaction::*;
pub use relation::*;
pub use graph::*;
pub use records::*;
pub use dotbracket::*;

/// Vertex handle of a residue within one graph instance. Labels are never
/// persisted or compared across unrelated graphs; views derived through
/// `annotate` and `subgraph` keep the labels of their parent.
pub type Label = usize;
