use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use paste::paste;
use mf_structure::GraphRecord;
use mf_structure::ResidueGraph;
use mf_motifs::AnnotationConfig;

// ============================================================
//  Base parser functions
// ============================================================

/// Read a residue graph from its JSON record.
pub fn read_graph<R: BufRead>(reader: R) -> Result<ResidueGraph> {
    let record: GraphRecord = serde_json::from_reader(reader)
        .context("Failed to parse residue graph record")?;
    let graph = ResidueGraph::try_from(&record)?;
    debug!("Read graph with {} residues and {} relations", graph.len(), record.relations.len());
    Ok(graph)
}

/// Read an annotation configuration; missing fields take their defaults.
pub fn read_config<R: BufRead>(reader: R) -> Result<AnnotationConfig> {
    let config = serde_json::from_reader(reader)
        .context("Failed to parse annotation configuration")?;
    Ok(config)
}

// ============================================================
//  Macro generating file/string/stdin/input helpers
// ============================================================

/// Generate input adapters for a base parser function `fn base<R: BufRead>(R) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str)`
/// - `base_file<P: AsRef<Path>>(P)`
/// - `base_stdin()`
/// - `base_input(&str)`  (dispatches "-" → stdin, otherwise → file)
macro_rules! define_input_variants {
    ($base:ident, $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str) -> $ret {
                $base(Cursor::new(s))
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P) -> $ret {
                let path = path.as_ref();
                let file = File::open(path)
                    .with_context(|| format!("Cannot open {}", path.display()))?;
                $base(BufReader::new(file))
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]() -> $ret {
                $base(BufReader::new(stdin()))
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str) -> $ret {
                if s == "-" {
                    [<$base _stdin>]()
                } else {
                    [<$base _file>](s)
                }
            }
        }
    };
}

define_input_variants!(read_graph, Result<ResidueGraph>);
define_input_variants!(read_config, Result<AnnotationConfig>);
