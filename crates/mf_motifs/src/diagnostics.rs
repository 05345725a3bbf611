use std::fmt;

use log::warn;
use colored::*;
use serde::Serialize;

use mf_structure::ResId;

/// Unusual input that does not stop the annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum Anomaly {
    /// Two consecutive residues of a cycle walk share no relation.
    MissingInteraction { from: ResId, to: ResId },
    /// A cycle exceeds the size the annotation claims to support.
    OversizedCycle { first: ResId, size: usize, limit: usize },
    /// The backbone is interrupted inside a stem strand.
    BackboneGap { before: ResId, after: ResId },
    /// A loop walk reached a stem endpoint it cannot cross.
    UnresolvedLoop { at: ResId },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInteraction { from, to } =>
                write!(f, "no interaction between consecutive cycle residues {from} and {to}"),
            Self::OversizedCycle { first, size, limit } =>
                write!(f, "cycle starting at {first} has {size} residues (supported: {limit})"),
            Self::BackboneGap { before, after } =>
                write!(f, "backbone gap between {before} and {after} inside a stem strand"),
            Self::UnresolvedLoop { at } =>
                write!(f, "loop cannot be continued across the stem at {at}"),
        }
    }
}

impl Anomaly {
    /// Logs the anomaly and appends it to `sink`.
    pub fn report(self, sink: &mut Vec<Anomaly>) {
        warn!("{} {}", "WARNING:".red(), self);
        sink.push(self);
    }
}
