use serde::{Serialize, Deserialize};

use mf_structure::RelationMask;

/// Tunables of the annotation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Relations a cycle walk may follow.
    pub cycle_mask: RelationMask,
    /// Stems with fewer pairs are dropped.
    pub min_stem_size: usize,
    /// Only cis Watson-Crick pairs of complementary bases form stems.
    pub canonical_stems_only: bool,
    /// Cycles above this size are kept but reported.
    pub max_cycle_size: usize,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            cycle_mask: RelationMask::ALL,
            min_stem_size: 2,
            canonical_stems_only: true,
            max_cycle_size: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_from_json() {
        let config: AnnotationConfig = serde_json::from_str(r#"{ "min_stem_size": 3 }"#).unwrap();
        assert_eq!(config.min_stem_size, 3);
        assert_eq!(config.max_cycle_size, 24);
        assert!(config.canonical_stems_only);
    }
}
