use std::fmt;
use std::cmp::Ordering;

use serde::{Serialize, Deserialize};

use crate::Label;
use crate::ResId;
use crate::StructureError;

/// The three typed relations between two residues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Pair,
    Stack,
    /// Backbone adjacency, always stored 5' -> 3'.
    Link,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InteractionKind::Pair => "pair",
            InteractionKind::Stack => "stack",
            InteractionKind::Link => "link",
        };
        write!(f, "{}", s)
    }
}

/// Base edge involved in a pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Face {
    WatsonCrick,
    Hoogsteen,
    Sugar,
}

impl TryFrom<char> for Face {
    type Error = StructureError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'W' => Ok(Face::WatsonCrick),
            'H' => Ok(Face::Hoogsteen),
            'S' => Ok(Face::Sugar),
            _ => Err(StructureError::InvalidToken(format!("face '{}'", c), "pair annotation".into(), 0)),
        }
    }
}

impl From<Face> for char {
    fn from(f: Face) -> Self {
        match f {
            Face::WatsonCrick => 'W',
            Face::Hoogsteen => 'H',
            Face::Sugar => 'S',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrientation { Cis, Trans }

/// Pairing sub-attributes as delivered by the relation detection step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairAnnotation {
    pub face1: Face,
    pub face2: Face,
    pub orientation: PairOrientation,
}

impl PairAnnotation {
    pub fn new(face1: Face, face2: Face, orientation: PairOrientation) -> Self {
        Self { face1, face2, orientation }
    }

    /// cis Watson-Crick/Watson-Crick
    pub fn watson_crick() -> Self {
        Self::new(Face::WatsonCrick, Face::WatsonCrick, PairOrientation::Cis)
    }

    pub fn is_cis_wc(&self) -> bool {
        self.face1 == Face::WatsonCrick
            && self.face2 == Face::WatsonCrick
            && self.orientation == PairOrientation::Cis
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.face2, self.face1, self.orientation)
    }
}

impl fmt::Display for PairAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = match self.orientation {
            PairOrientation::Cis => "c",
            PairOrientation::Trans => "t",
        };
        write!(f, "{}{}{}", o, char::from(self.face1), char::from(self.face2))
    }
}

/// A typed, ordered relation between two residues of one graph instance.
///
/// Equality uses the label pair and the kind, never the residue
/// identifiers. The order sorts by `f_res_id`, then `r_res_id`; it agrees
/// with equality only for interactions taken from label-compatible graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BaseInteraction {
    pub first: Label,
    pub second: Label,
    pub f_res_id: ResId,
    pub r_res_id: ResId,
    pub kind: InteractionKind,
    pub pairing: Option<PairAnnotation>,
}

impl BaseInteraction {
    pub fn new(kind: InteractionKind,
        first: Label, f_res_id: ResId,
        second: Label, r_res_id: ResId
    ) -> Self {
        Self { first, second, f_res_id, r_res_id, kind, pairing: None }
    }

    pub fn pair(first: Label, f_res_id: ResId,
        second: Label, r_res_id: ResId,
        pairing: PairAnnotation
    ) -> Self {
        Self { pairing: Some(pairing), ..Self::new(InteractionKind::Pair, first, f_res_id, second, r_res_id) }
    }

    /// Swap both ends; labels, residue identifiers and faces move together.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
        std::mem::swap(&mut self.f_res_id, &mut self.r_res_id);
        self.pairing = self.pairing.map(|p| p.reversed());
    }

    pub fn reversed(&self) -> Self {
        let mut copy = *self;
        copy.reverse();
        copy
    }

    /// Reverse if necessary such that `f_res_id <= r_res_id`.
    pub fn ordered(&self) -> Self {
        if self.f_res_id > self.r_res_id { self.reversed() } else { *self }
    }

    pub fn is_pair(&self) -> bool {
        self.kind == InteractionKind::Pair
    }

    pub fn is_stack(&self) -> bool {
        self.kind == InteractionKind::Stack
    }

    pub fn is_link(&self) -> bool {
        self.kind == InteractionKind::Link
    }

    /// Unordered label pair, used to test whether two records join the same residues.
    pub fn label_key(&self) -> (Label, Label) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }

    pub fn involves(&self, label: Label) -> bool {
        self.first == label || self.second == label
    }

    pub fn partner(&self, label: Label) -> Option<Label> {
        if self.first == label {
            Some(self.second)
        } else if self.second == label {
            Some(self.first)
        } else {
            None
        }
    }
}

impl PartialEq for BaseInteraction {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first
            && self.second == other.second
            && self.kind == other.kind
    }
}

impl Eq for BaseInteraction {}

impl PartialOrd for BaseInteraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseInteraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_res_id.cmp(&other.f_res_id)
            .then(self.r_res_id.cmp(&other.r_res_id))
            .then(self.kind.cmp(&other.kind))
            .then(self.first.cmp(&other.first))
            .then(self.second.cmp(&other.second))
    }
}

impl fmt::Display for BaseInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.f_res_id, self.r_res_id, self.kind)?;
        if let Some(p) = &self.pairing {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}
