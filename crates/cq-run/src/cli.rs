use clap::{Parser, Subcommand};
use cq_lang::{
    Flatten, MergeOrRegexp, Node, PropagateBoolean, ReducePass, RewriteConjunctive,
    SearchRequest, SortAndByCost,
};
use miette::{IntoDiagnostic, WrapErr};
use std::io::{self, BufWriter, Read, Write};
use std::{fs, path::PathBuf};
use tracing::{debug, info};

use crate::config::{Config, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "cq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## To reduce the query of a search request:\n\
    cq reduce request.json\n\n\
    ## To reduce a bare query read from stdin:\n\
    cq reduce --query-only < query.json\n\n\
    ## To run selected passes only:\n\
    cq reduce --pass flatten --pass merge-or-regexp request.json\n\n\
    ## To describe a query and its cost:\n\
    cq describe request.json")]
#[command(
    about = "cq reduces commit search queries into cheaper, equivalent ones.",
    long_about = None
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Commands,

    /// Maximum number of clauses a distributive rewrite may produce
    #[arg(long, global = true)]
    max_clauses: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reduce the query and print the result
    Reduce {
        #[clap(flatten)]
        input: InputArgs,

        /// Run only the given passes, in the given order
        #[arg(short, long, value_enum)]
        pass: Vec<Pass>,

        /// Set output format
        #[arg(short = 'F', long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the description and estimated cost of the query
    Describe {
        #[clap(flatten)]
        input: InputArgs,
    },
}

#[derive(Clone, Debug, clap::Args)]
struct InputArgs {
    /// Read a bare query node instead of a search request
    #[arg(short, long, default_value_t = false)]
    query_only: bool,

    /// Input file; stdin is read when omitted
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
enum Pass {
    PropagateBoolean,
    RewriteConjunctive,
    Flatten,
    MergeOrRegexp,
    SortAndByCost,
}

const DEFAULT_PASSES: [Pass; 5] = [
    Pass::PropagateBoolean,
    Pass::RewriteConjunctive,
    Pass::Flatten,
    Pass::MergeOrRegexp,
    Pass::SortAndByCost,
];

impl Pass {
    fn build(self, max_clauses: usize) -> Box<dyn ReducePass> {
        match self {
            Pass::PropagateBoolean => Box::new(PropagateBoolean),
            Pass::RewriteConjunctive => Box::new(RewriteConjunctive::with_max_clauses(max_clauses)),
            Pass::Flatten => Box::new(Flatten),
            Pass::MergeOrRegexp => Box::new(MergeOrRegexp),
            Pass::SortAndByCost => Box::new(SortAndByCost),
        }
    }
}

/// A decoded input: either a full search request or a bare query.
#[derive(Debug)]
enum Input {
    Request(SearchRequest),
    Query(Node),
}

impl Input {
    fn query(&self) -> &Node {
        match self {
            Input::Request(request) => &request.query,
            Input::Query(node) => node,
        }
    }

    fn map_query(self, f: impl FnOnce(Node) -> Node) -> Self {
        match self {
            Input::Request(request) => Input::Request(request.map_query(f)),
            Input::Query(node) => Input::Query(f(node)),
        }
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Input::Request(request) => request.to_json(),
            Input::Query(node) => node.to_json(),
        }
    }
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        let mut config = Config::from_env();
        if let Some(max_clauses) = self.max_clauses {
            config.max_clauses = max_clauses;
        }

        init_tracing(&config);
        debug!(?config, "loaded config");

        match &self.commands {
            Commands::Reduce {
                input,
                pass,
                format,
            } => {
                let passes = if pass.is_empty() {
                    DEFAULT_PASSES.to_vec()
                } else {
                    pass.clone()
                };
                let passes: Vec<Box<dyn ReducePass>> = passes
                    .into_iter()
                    .map(|pass| pass.build(config.max_clauses))
                    .collect();
                let passes: Vec<&dyn ReducePass> = passes.iter().map(|pass| pass.as_ref()).collect();

                let reduced = read_input(input)?.map_query(|node| cq_lang::reduce_with(node, &passes));

                match format {
                    OutputFormat::Json => write_output(&reduced.to_json().into_diagnostic()?),
                    OutputFormat::Text => write_output(&reduced.query().to_string()),
                }
            }
            Commands::Describe { input } => {
                let input = read_input(input)?;
                let query = input.query();

                write_output(&format!(
                    "{}\ncost: {}\nneeds diff: {}",
                    query,
                    query.cost(),
                    query.needs_diff()
                ))
            }
        }
    }
}

fn read_input(args: &InputArgs) -> miette::Result<Input> {
    let content = match &args.file {
        Some(path) => fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .into_diagnostic()
                .wrap_err("Failed to read stdin")?;
            content
        }
    };

    if args.query_only {
        let node = Node::from_json(&content)
            .into_diagnostic()
            .wrap_err("Failed to decode query")?;
        info!(kind = node.kind_name(), cost = node.cost(), "decoded query");
        return Ok(Input::Query(node));
    }

    let request = SearchRequest::from_json(&content)
        .into_diagnostic()
        .wrap_err("Failed to decode search request")?;

    info!(
        repo = %request.repo,
        revisions = ?request.revisions,
        limit = ?request.limit,
        include_diff = request.include_diff,
        include_modified_files = request.include_modified_files,
        query = %request.query,
        "decoded search request"
    );

    Ok(Input::Request(request))
}

fn write_output(output: &str) -> miette::Result<()> {
    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());
    writeln!(handle, "{}", output).into_diagnostic()?;
    handle.flush().into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case::defaults(&["cq", "reduce"], vec![], OutputFormat::Json, false)]
    #[case::passes(
        &["cq", "reduce", "--pass", "flatten", "-p", "sort-and-by-cost"],
        vec![Pass::Flatten, Pass::SortAndByCost],
        OutputFormat::Json,
        false
    )]
    #[case::text_query(&["cq", "reduce", "-F", "text", "--query-only"], vec![], OutputFormat::Text, true)]
    fn test_parse_reduce(
        #[case] args: &[&str],
        #[case] expected_passes: Vec<Pass>,
        #[case] expected_format: OutputFormat,
        #[case] expected_query_only: bool,
    ) {
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.commands {
            Commands::Reduce {
                input,
                pass,
                format,
            } => {
                assert_eq!(pass, expected_passes);
                assert_eq!(format, expected_format);
                assert_eq!(input.query_only, expected_query_only);
            }
            commands => panic!("expected reduce, got {:?}", commands),
        }
    }

    #[test]
    fn test_parse_global_max_clauses() {
        let cli = Cli::try_parse_from(["cq", "describe", "--max-clauses", "8", "query.json"]).unwrap();

        assert_eq!(cli.max_clauses, Some(8));
        assert!(matches!(
            cli.commands,
            Commands::Describe { input } if input.file == Some(PathBuf::from("query.json"))
        ));
    }

    #[test]
    fn test_unknown_pass_is_rejected() {
        assert!(Cli::try_parse_from(["cq", "reduce", "--pass", "inline"]).is_err());
    }

    #[test]
    fn test_default_passes_build_in_order() {
        let names: Vec<_> = DEFAULT_PASSES
            .iter()
            .map(|pass| pass.build(4).name())
            .collect();

        assert_eq!(
            names,
            vec![
                "PropagateBoolean",
                "RewriteConjunctive",
                "Flatten",
                "MergeOrRegexp",
                "SortAndByCost"
            ]
        );
    }
}
