use std::fmt;
use std::error::Error;

use mf_structure::StructureError;
use mf_isomorphism::IsomorphismError;

/// Caller misuse. Problems with the input data are reported as `Anomaly`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotifError {
    NoSuchElement(String),
    UnknownStem,
    Structure(StructureError),
    Isomorphism(IsomorphismError),
}

impl fmt::Display for MotifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchElement(what) => write!(f, "No such element: {what}"),
            Self::UnknownStem => write!(f, "Stem handle does not belong to this structure"),
            Self::Structure(e) => write!(f, "Structure error: {e}"),
            Self::Isomorphism(e) => write!(f, "Isomorphism error: {e}"),
        }
    }
}

impl Error for MotifError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Structure(e) => Some(e),
            Self::Isomorphism(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StructureError> for MotifError {
    fn from(e: StructureError) -> Self {
        Self::Structure(e)
    }
}

impl From<IsomorphismError> for MotifError {
    fn from(e: IsomorphismError) -> Self {
        Self::Isomorphism(e)
    }
}
