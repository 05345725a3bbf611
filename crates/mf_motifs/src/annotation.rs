use std::fmt;
use colored::*;
use log::info;
use serde::Serialize;

use mf_structure::Label;
use mf_structure::ResId;
use mf_structure::ResidueGraph;
use mf_structure::StructureError;

use crate::aggregate;
use crate::AnnotationConfig;
use crate::Anomaly;
use crate::Cycle;
use crate::CycleKind;
use crate::LoopKind;
use crate::MotifError;
use crate::Orientation;
use crate::SecondaryStructure;
use crate::TertiaryAggregate;

/// Where a cycle of the annotation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum CycleOrigin {
    /// A closed loop, by index into `SecondaryStructure::loops`.
    Loop { index: usize },
    /// Two consecutive pairs of a stem, by stem index and step.
    HelixStep { stem: usize, step: usize },
}

/// Secondary structure, cycles and tertiary structure of one graph.
#[derive(Debug, Clone)]
pub struct Annotation {
    secondary: SecondaryStructure,
    cycles: Vec<Cycle>,
    origins: Vec<CycleOrigin>,
    tertiary: TertiaryAggregate,
    diagnostics: Vec<Anomaly>,
}

fn labels_of(graph: &ResidueGraph, residues: &[ResId]) -> Result<Vec<Label>, StructureError> {
    residues.iter()
        .map(|r| graph.label_of(r).ok_or(StructureError::UnknownResidue(*r)))
        .collect()
}

impl Annotation {
    /// Run the whole pipeline. The graph is only read.
    pub fn new(graph: &ResidueGraph, config: &AnnotationConfig) -> Result<Self, MotifError> {
        let secondary = SecondaryStructure::new(graph, config);
        let mut diagnostics = secondary.diagnostics().to_vec();

        let mut cycles = Vec::new();
        let mut origins = Vec::new();
        for (index, lp) in secondary.loops().iter().enumerate() {
            if !lp.is_closed() {
                continue;
            }
            let walk = labels_of(graph, &secondary.loop_walk(lp))?;
            cycles.push(Cycle::from_walk(graph, &walk, config.cycle_mask)?);
            origins.push(CycleOrigin::Loop { index });
        }
        for (stem, (_, s)) in secondary.stems().enumerate() {
            for (step, w) in s.pairs().windows(2).enumerate() {
                let walk = [w[0].first, w[1].first, w[1].second, w[0].second];
                cycles.push(Cycle::from_walk(graph, &walk, config.cycle_mask)?);
                origins.push(CycleOrigin::HelixStep { stem, step });
            }
        }

        for cycle in &cycles {
            diagnostics.extend_from_slice(cycle.diagnostics());
            if cycle.len() > config.max_cycle_size {
                if let Some(&first) = cycle.residues().first() {
                    Anomaly::OversizedCycle { first, size: cycle.len(), limit: config.max_cycle_size }
                        .report(&mut diagnostics);
                }
            }
        }

        let tertiary = aggregate(graph, &cycles)?;
        info!("{} cycle(s), {} tertiary structure(s), {} diagnostic(s)",
            cycles.len(), tertiary.structures.len(), diagnostics.len());
        Ok(Self { secondary, cycles, origins, tertiary, diagnostics })
    }

    pub fn secondary(&self) -> &SecondaryStructure {
        &self.secondary
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Parallel to `cycles`.
    pub fn cycle_origins(&self) -> &[CycleOrigin] {
        &self.origins
    }

    pub fn tertiary(&self) -> &TertiaryAggregate {
        &self.tertiary
    }

    /// Anomalies of every stage, in pipeline order.
    pub fn diagnostics(&self) -> &[Anomaly] {
        &self.diagnostics
    }

    pub fn summary(&self) -> AnnotationSummary {
        let ss = &self.secondary;
        let index = |id| ss.stem_index(id).unwrap_or(usize::MAX);
        let stems = ss.stems()
            .filter_map(|(id, s)| {
                let (front, back) = (s.front()?, s.back()?);
                Some(StemSummary {
                    strand1: (front.f_res_id, back.f_res_id),
                    strand2: (front.r_res_id, back.r_res_id),
                    pairs: s.len(),
                    orientation: s.orientation(),
                    layer: ss.layer(id).unwrap_or(0),
                })
            })
            .collect();
        let loops = ss.loops().iter()
            .map(|l| LoopSummary {
                kind: l.kind(),
                stems: l.stems().into_iter().map(index).collect(),
                residues: l.residues(),
            })
            .collect();
        let cycles = self.cycles.iter().zip(&self.origins)
            .map(|(c, &origin)| CycleSummary {
                origin,
                kind: c.kind(),
                profile: c.profile(),
                residues: c.residues().to_vec(),
            })
            .collect();
        let tertiary = self.tertiary.structures.iter()
            .map(|ts| TertiarySummary {
                residues: ts.residues().to_vec(),
                interactions: ts.interactions().iter().map(|bi| bi.to_string()).collect(),
                cycles: ts.cycles().to_vec(),
            })
            .collect();
        AnnotationSummary {
            dot_bracket: ss.dot_bracket().to_string(),
            stems,
            pseudoknots: ss.pseudoknots().iter().map(|&(a, b)| (index(a), index(b))).collect(),
            loops,
            cycles,
            tertiary,
            connections: self.tertiary.connections.iter().map(|c| (c.first, c.second, c.cycle)).collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ss = &self.secondary;
        writeln!(f, "{}", ss.dot_bracket())?;

        writeln!(f, "{} ({})", "Stems".bold(), ss.stem_ids().len())?;
        for (i, (id, stem)) in ss.stems().enumerate() {
            writeln!(f, "  {:>3} L{} {}", i, ss.layer(id).unwrap_or(0), stem)?;
        }
        if !ss.pseudoknots().is_empty() {
            writeln!(f, "{} ({})", "Pseudoknots".bold(), ss.pseudoknots().len())?;
            for &(a, b) in ss.pseudoknots() {
                if let (Some(a), Some(b)) = (ss.stem_index(a), ss.stem_index(b)) {
                    writeln!(f, "  {a} x {b}")?;
                }
            }
        }

        writeln!(f, "{} ({})", "Loops".bold(), ss.loops().len())?;
        for lp in ss.loops() {
            writeln!(f, "  {lp}")?;
        }

        writeln!(f, "{} ({})", "Cycles".bold(), self.cycles.len())?;
        for (i, cycle) in self.cycles.iter().enumerate() {
            writeln!(f, "  {i:>3} {cycle}")?;
        }

        writeln!(f, "{} ({})", "Tertiary".bold(), self.tertiary.structures.len())?;
        for (i, ts) in self.tertiary.structures.iter().enumerate() {
            writeln!(f, "  {i:>3} {ts}")?;
        }
        for c in &self.tertiary.connections {
            writeln!(f, "  {} <-> {} via cycle {}", c.first, c.second, c.cycle)?;
        }

        for anomaly in &self.diagnostics {
            writeln!(f, "{} {}", "WARNING:".red(), anomaly)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StemSummary {
    pub strand1: (ResId, ResId),
    pub strand2: (ResId, ResId),
    pub pairs: usize,
    pub orientation: Orientation,
    pub layer: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopSummary {
    pub kind: LoopKind,
    pub stems: Vec<usize>,
    pub residues: Vec<ResId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    #[serde(flatten)]
    pub origin: CycleOrigin,
    pub kind: CycleKind,
    pub profile: Vec<usize>,
    pub residues: Vec<ResId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TertiarySummary {
    pub residues: Vec<ResId>,
    pub interactions: Vec<String>,
    pub cycles: Vec<usize>,
}

/// Serializable overview of an `Annotation`; stems are referred to by index.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationSummary {
    pub dot_bracket: String,
    pub stems: Vec<StemSummary>,
    pub pseudoknots: Vec<(usize, usize)>,
    pub loops: Vec<LoopSummary>,
    pub cycles: Vec<CycleSummary>,
    pub tertiary: Vec<TertiarySummary>,
    pub connections: Vec<(usize, usize, usize)>,
    pub diagnostics: Vec<Anomaly>,
}
