use std::io::Write;
use log::{info, warn};
use colored::*;
use env_logger::Builder;
use clap::Parser;
use clap::ArgAction;
use anyhow::Result;
use rayon::prelude::*;

use mf_structure::ResidueGraph;
use mf_isomorphism::find_matches;
use mf_isomorphism::MatchReport;
use mf_isomorphism::MatcherConfig;

use motifold::input_parsers::read_graph_file;


/// Search a pattern residue graph in one or more target graphs.
#[derive(Debug, Parser)]
#[command(name = "mf-match")]
#[command(author, version, about)]
pub struct Cli {
    /// Pattern graph record (JSON)
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Target graph records (JSON)
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<String>,

    /// Report every mapping, not just the first one
    #[arg(long)]
    pub all: bool,

    /// Stop after this many mappings per target (implies --all)
    #[arg(long, value_name = "N")]
    pub max_matches: Option<usize>,

    /// Give up on a target after this many search steps
    #[arg(long, value_name = "N")]
    pub step_limit: Option<usize>,

    /// Residue types must agree exactly ("N" is no wildcard)
    #[arg(long)]
    pub strict_bases: bool,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(buf, "{}", record.args())
        })
        .init();
}

fn print_report(name: &str, target: &ResidueGraph, report: &MatchReport) -> Result<()> {
    if report.budget_exhausted {
        warn!("{} step limit reached in {}, results are incomplete", "WARNING:".red(), name);
    }
    if !report.is_match() {
        println!("{} {}", name.yellow(), "no match".dimmed());
        return Ok(());
    }
    println!("{} {} match(es)", name.yellow(), report.mappings.len());
    for mapping in &report.mappings {
        let residues = mapping.iter()
            .map(|&(_, t)| target.res_id(t).map(|r| r.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        println!("  {}", residues.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pattern = read_graph_file(&cli.pattern)?;
    let config = MatcherConfig {
        stop_at_first: !cli.all && cli.max_matches.is_none(),
        step_limit: cli.step_limit,
        wildcard_bases: !cli.strict_bases,
        max_matches: cli.max_matches,
    };
    info!("{} pattern with {} residues in {} target(s)",
        "Searching".yellow(), pattern.len(), cli.targets.len());

    let targets = cli.targets.iter()
        .map(|path| read_graph_file(path))
        .collect::<Result<Vec<_>>>()?;

    let reports: Vec<Option<MatchReport>> = targets
        .par_iter()
        .map(|target| match find_matches(&pattern, target, config) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("{} {}", "WARNING:".red(), e);
                None
            }
        })
        .collect();

    for ((name, target), report) in cli.targets.iter().zip(&targets).zip(&reports) {
        match report {
            Some(report) => print_report(name, target, report)?,
            None => println!("{} {}", name.yellow(), "skipped".dimmed()),
        }
    }
    Ok(())
}
