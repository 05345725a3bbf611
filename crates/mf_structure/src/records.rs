use serde::{Serialize, Deserialize};

use crate::Base;
use crate::InteractionKind;
use crate::PairAnnotation;
use crate::RelationMask;
use crate::ResId;
use crate::ResidueGraph;
use crate::ResidueGraphBuilder;
use crate::StructureError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidueRecord {
    pub id: ResId,
    pub base: Base,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub kind: InteractionKind,
    pub from: ResId,
    pub to: ResId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing: Option<PairAnnotation>,
}

/// Serializable form of a residue graph, as written by relation detection tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub residues: Vec<ResidueRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
    /// Derive backbone links from residue contiguity instead of listing them.
    #[serde(default)]
    pub link_contiguous: bool,
}

impl TryFrom<&GraphRecord> for ResidueGraph {
    type Error = StructureError;

    fn try_from(record: &GraphRecord) -> Result<Self, Self::Error> {
        let mut builder = ResidueGraphBuilder::new();
        for res in &record.residues {
            builder.add_residue(res.id, res.base)?;
        }
        for rel in &record.relations {
            builder.add_interaction(rel.kind, rel.from, rel.to, rel.pairing)?;
        }
        if record.link_contiguous {
            builder.link_contiguous()?;
        }
        Ok(builder.build())
    }
}

impl From<&ResidueGraph> for GraphRecord {
    fn from(graph: &ResidueGraph) -> Self {
        GraphRecord {
            residues: graph.residues()
                .map(|r| ResidueRecord { id: r.res_id, base: r.base })
                .collect(),
            relations: graph.interactions(RelationMask::ALL).into_iter()
                .map(|bi| RelationRecord {
                    kind: bi.kind,
                    from: bi.f_res_id,
                    to: bi.r_res_id,
                    pairing: bi.pairing,
                })
                .collect(),
            link_contiguous: false,
        }
    }
}
