use std::fmt;

use crate::Label;
use crate::ResId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    InvalidResId(String),              // unparsable residue identifier
    InvalidToken(String, String, usize), // invalid token, source and position
    DuplicateResidue(ResId),           // residue added twice to one graph
    UnknownResidue(ResId),             // relation refers to a residue not in the graph
    UnknownLabel(Label),               // label does not belong to this graph instance
    SelfInteraction(ResId),            // a residue cannot interact with itself
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::InvalidResId(s) => {
                write!(f, "Invalid residue identifier '{}'", s)
            }
            StructureError::InvalidToken(tok, src, i) => {
                write!(f, "Invalid {} in {} at position {}", tok, src, i)
            }
            StructureError::DuplicateResidue(r) => {
                write!(f, "Residue {} is already part of the graph", r)
            }
            StructureError::UnknownResidue(r) => {
                write!(f, "Residue {} is not part of the graph", r)
            }
            StructureError::UnknownLabel(l) => {
                write!(f, "Label {} is not part of the graph", l)
            }
            StructureError::SelfInteraction(r) => {
                write!(f, "Residue {} cannot interact with itself", r)
            }
        }
    }
}

impl std::error::Error for StructureError {}

