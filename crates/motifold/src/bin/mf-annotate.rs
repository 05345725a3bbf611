use std::io::Write;
use log::info;
use colored::*;
use env_logger::Builder;
use clap::Args;
use clap::Parser;
use clap::ArgAction;
use anyhow::Result;

use mf_motifs::Annotation;

use motifold::input_parsers::read_graph_input;
use motifold::annotation_parsers::AnnotationArguments;


#[derive(Debug, Args)]
pub struct AnnotateInput {
    /// Residue graph record (JSON), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Print a JSON summary instead of the report
    #[arg(long)]
    pub json: bool,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}


#[derive(Debug, Parser)]
#[command(name = "mf-annotate")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub input: AnnotateInput,

    #[command(flatten, next_help_heading = "Annotation parameters")]
    pub annotation: AnnotationArguments,
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

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.input.verbose);

    let config = cli.annotation.build_config()?;
    let graph = read_graph_input(&cli.input.input)?;
    info!("{} {} residues", "Annotating".yellow(), graph.len());

    let annotation = Annotation::new(&graph, &config)?;
    if cli.input.json {
        println!("{}", serde_json::to_string_pretty(&annotation.summary())?);
    } else {
        print!("{}", annotation);
    }
    Ok(())
}
