//! Command line argument parsing for the Lancet CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Lancet - run searchers and geo predicates over JSON documents
#[derive(Parser, Debug, Clone)]
#[command(name = "lancet")]
#[command(about = "Run searchers and geo shape predicates over JSON documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LancetArgs {
    /// Verbosity level (repeat for more: -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LancetArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index a JSON document file in memory and run one query against it
    Search(SearchArgs),

    /// Parse a distance string such as "5km" into meters
    Distance(DistanceArgs),

    /// Filter a file of GeoJSON shapes by their relation to a query shape
    Relate(RelateArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Documents to index: a JSON array, a JSON object keyed by id, or JSON lines
    #[arg(long, value_name = "DOCS_FILE")]
    pub docs: PathBuf,

    /// Query text. Term, phrase and prefix queries are lower-cased
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Field to search in
    #[arg(long)]
    pub field: Option<String>,

    /// Search mode
    #[arg(short = 'm', long, default_value = "term")]
    pub mode: SearchMode,

    /// Maximum edit distance for fuzzy queries
    #[arg(long, default_value_t = 1)]
    pub fuzziness: usize,

    /// Number of leading characters a fuzzy match must share exactly
    #[arg(long, default_value_t = 0)]
    pub prefix_length: usize,

    /// Lower bound of a numeric range
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound of a numeric range
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Whether the lower bound is inclusive (default true)
    #[arg(long)]
    pub inclusive_min: Option<bool>,

    /// Whether the upper bound is inclusive (default false)
    #[arg(long)]
    pub inclusive_max: Option<bool>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Offset for pagination
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Include score explanations
    #[arg(long)]
    pub explain: bool,

    /// Ceiling on expanded clauses (0 = unbounded)
    #[arg(long, env = "LANCET_MAX_CLAUSE_COUNT", default_value_t = 0)]
    pub max_clause_count: usize,

    /// Abort the search after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Index settings (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub index_config: Option<PathBuf>,
}

/// Search modes available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Exact term
    Term,
    /// Consecutive terms
    Phrase,
    /// Terms within an edit distance
    Fuzzy,
    /// Terms matching a regular expression
    Regexp,
    /// Terms starting with a prefix
    Prefix,
    /// Numeric values between --min and --max
    NumericRange,
    /// Every document
    MatchAll,
}

/// Arguments for parsing a distance
#[derive(Parser, Debug, Clone)]
pub struct DistanceArgs {
    /// Distance with an optional unit suffix
    #[arg(value_name = "DISTANCE")]
    pub distance: String,
}

/// Arguments for relating shapes
#[derive(Parser, Debug, Clone)]
pub struct RelateArgs {
    /// Query shape as GeoJSON
    #[arg(long, value_name = "GEOJSON")]
    pub query: String,

    /// Shapes to test: a JSON array of GeoJSON objects, or one per line
    #[arg(long, value_name = "SHAPES_FILE")]
    pub docs: PathBuf,

    /// Spatial relation the document shapes must have to the query shape
    #[arg(short, long, default_value = "intersects")]
    pub relation: Relation,
}

/// Spatial relations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// The shapes share at least one point
    Intersects,
    /// The document shape contains the query shape
    Contains,
    /// The document shape lies within the query shape
    Within,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Intersects => "intersects",
            Relation::Contains => "contains",
            Relation::Within => "within",
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let args = LancetArgs::try_parse_from([
            "lancet",
            "-vv",
            "search",
            "--docs",
            "docs.json",
            "--field",
            "desc",
            "-m",
            "numeric-range",
            "--min",
            "-5",
            "--inclusive-max",
            "true",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 3);
        let Command::Search(search) = args.command else {
            panic!("expected search");
        };
        assert_eq!(search.mode, SearchMode::NumericRange);
        assert_eq!(search.min, Some(-5.0));
        assert_eq!(search.inclusive_max, Some(true));
        assert_eq!(search.limit, 10);
    }

    #[test]
    fn test_parse_relate() {
        let args = LancetArgs::try_parse_from([
            "lancet",
            "-q",
            "relate",
            "--query",
            r#"{"type":"point","coordinates":[1,2]}"#,
            "--docs",
            "shapes.json",
            "-r",
            "within",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 0);
        let Command::Relate(relate) = args.command else {
            panic!("expected relate");
        };
        assert_eq!(relate.relation.as_str(), "within");
    }

    #[test]
    fn test_unknown_mode() {
        assert!(
            LancetArgs::try_parse_from(["lancet", "search", "--docs", "d", "-m", "wildcard"])
                .is_err()
        );
    }
}
