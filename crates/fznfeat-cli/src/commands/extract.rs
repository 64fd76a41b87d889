//! The `extract` command: read a model, run the engine, print the row.

use std::fs;
use std::path::PathBuf;

use fznfeat_core::Variant;
use fznfeat_extract::{FeatureExtractor, GraphOutcome, OutputFormat, extract_model, render};

/// Exit code when a graph metric hit its wall-clock budget. The row is
/// still emitted, with the timed-out features at -1.
pub const EXIT_GRAPH_TIMEOUT: i32 = 8;

pub struct ExtractArgs {
    pub model: PathBuf,
    pub output: OutputFormat,
    pub sep: char,
    pub no_graph: bool,
}

pub fn run(args: ExtractArgs) -> i32 {
    let source = match fs::read_to_string(&args.model) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", args.model.display());
            return 1;
        }
    };

    let variant = if args.no_graph { Variant::NoGraph } else { Variant::Full };
    let mut engine = FeatureExtractor::new(variant);
    if let Err(err) = extract_model(&source, &mut engine) {
        eprintln!("error: {err}");
        return 1;
    }

    let extraction = engine.finalise();
    print!("{}", render(&extraction.features, args.output, args.sep));

    match extraction.graph {
        GraphOutcome::TimedOut => EXIT_GRAPH_TIMEOUT,
        GraphOutcome::Completed | GraphOutcome::Skipped => 0,
    }
}
