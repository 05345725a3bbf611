//! Structural motifs of RNA residue graphs: stems and pseudoknots, linkers
//! and loops, cycles, and the tertiary interactions left over by them.

mod error;
mod diagnostics;
mod config;
mod stem;
mod linker;
mod loops;
mod secondary;
mod cycle;
mod union_find;
mod tertiary;
mod annotation;

pub use error::*;
pub use diagnostics::*;
pub use config::*;
pub use stem::*;
pub use linker::*;
pub use loops::*;
pub use secondary::*;
pub use cycle::*;
pub use union_find::*;
pub use tertiary::*;
pub use annotation::*;
