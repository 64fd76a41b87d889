//! CLI construction and dispatch: clap command builders plus the params
//! structs that bridge `ArgMatches` to the command handlers.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use fznfeat_extract::OutputFormat;

use crate::commands::extract::ExtractArgs;

/// Build the complete CLI.
pub fn build_cli() -> Command {
    Command::new("fznfeat")
        .about("Static feature extraction for FlatZinc constraint models")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(extract_command())
}

/// Extract the feature vector of one model.
fn extract_command() -> Command {
    Command::new("extract")
        .about("Extract the feature vector of a model")
        .arg(
            Arg::new("model")
                .value_name("MODEL")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("FlatZinc model file"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FORMAT")
                .default_value("csv")
                .value_parser(["csv", "dict", "pp"])
                .help("Output format"),
        )
        .arg(
            Arg::new("sep")
                .long("sep")
                .value_name("CHAR")
                .default_value(",")
                .value_parser(value_parser!(char))
                .help("Value separator for csv output"),
        )
        .arg(
            Arg::new("no_graph")
                .long("no-graph")
                .action(ArgAction::SetTrue)
                .help("Skip the graph features (95-key variant)"),
        )
}

pub struct ExtractParams {
    pub model: PathBuf,
    pub output: OutputFormat,
    pub sep: char,
    pub no_graph: bool,
}

impl ExtractParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let output = match m.get_one::<String>("output").map(String::as_str) {
            Some("dict") => OutputFormat::Dict,
            Some("pp") => OutputFormat::Pp,
            _ => OutputFormat::Csv,
        };
        Self {
            model: m
                .get_one::<PathBuf>("model")
                .cloned()
                .expect("MODEL is a required argument"),
            output,
            sep: m.get_one::<char>("sep").copied().unwrap_or(','),
            no_graph: m.get_flag("no_graph"),
        }
    }
}

impl From<ExtractParams> for ExtractArgs {
    fn from(p: ExtractParams) -> Self {
        Self {
            model: p.model,
            output: p.output,
            sep: p.sep,
            no_graph: p.no_graph,
        }
    }
}
