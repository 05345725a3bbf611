use std::path::PathBuf;
use clap::Args;
use anyhow::Result;
use log::debug;

use mf_structure::RelationMask;
use mf_motifs::AnnotationConfig;

use crate::input_parsers::read_config_file;

/// Annotation parameters.
#[derive(Debug, Args)]
pub struct AnnotationArguments {
    /// JSON configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum number of base pairs per stem
    #[arg(long)]
    pub min_stem_size: Option<usize>,

    /// Build stems from every base pair, not only canonical ones
    #[arg(long)]
    pub all_pairs: bool,

    /// Cycles with more residues are reported
    #[arg(long)]
    pub max_cycle_size: Option<usize>,

    /// Leave stacking out of cycle walks
    #[arg(long)]
    pub no_stacking: bool,
}

impl AnnotationArguments {
    pub fn build_config(&self) -> Result<AnnotationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                debug!("Using configuration file: {:?}", path);
                read_config_file(path)?
            }
            None => AnnotationConfig::default(),
        };
        if let Some(n) = self.min_stem_size {
            config.min_stem_size = n;
        }
        if let Some(n) = self.max_cycle_size {
            config.max_cycle_size = n;
        }
        if self.all_pairs {
            config.canonical_stems_only = false;
        }
        if self.no_stacking {
            config.cycle_mask = RelationMask::PAIRING | RelationMask::ADJACENCY;
        }
        debug!("Cycle relations: {}", config.cycle_mask);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        annotation: AnnotationArguments,
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["test"]);
        assert_eq!(cli.annotation.build_config().unwrap(), AnnotationConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["test", "--min-stem-size", "3", "--all-pairs", "--no-stacking"]);
        let config = cli.annotation.build_config().unwrap();
        assert_eq!(config.min_stem_size, 3);
        assert!(!config.canonical_stems_only);
        assert!(!config.cycle_mask.contains(RelationMask::STACKING));
        assert_eq!(config.max_cycle_size, 24);
    }
}
