//! Command implementations for the Lancet CLI.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{IndexConfig, SearcherConfig, SearcherOptions, from_json_file};
use crate::error::{LancetError, Result};
use crate::geo::{filter_geo_shapes_on_relation, parse_distance, parse_geojson_shape};
use crate::index::{Document, IndexReader, UpsideDownIndex};
use crate::search::{
    FuzzySearcher, MatchAllSearcher, NumericRangeSearcher, PhraseSearcher, RegexpSearcher,
    Searcher, TermPrefixSearcher, TermSearcher, TimeoutableSearcher, TopNCollector,
};
use crate::storage::MemoryKvStore;

/// Execute a CLI command, writing its result to `out`.
pub fn execute_command(args: &LancetArgs, out: &mut dyn Write) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search(search_args, args, out),
        Command::Distance(distance_args) => distance(distance_args, args, out),
        Command::Relate(relate_args) => relate(relate_args, args, out),
    }
}

/// Read JSON values from a file holding one JSON document or JSON lines.
fn read_json_values(path: &Path) -> Result<Value> {
    let data = fs::read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(value) => Ok(value),
        Err(_) => {
            let lines = data
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str)
                .collect::<std::result::Result<Vec<Value>, _>>()?;
            Ok(Value::Array(lines))
        }
    }
}

/// Load documents. Array entries take their id from an `id` member, or
/// their position when there is none. Object entries are keyed by id.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    match read_json_values(path)? {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let id = match item.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(id)) => id.to_string(),
                    _ => i.to_string(),
                };
                Document::from_json(id, item)
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(id, item)| Document::from_json(id.clone(), item))
            .collect(),
        _ => Err(LancetError::invalid_argument(format!(
            "{} does not hold JSON documents",
            path.display()
        ))),
    }
}

fn build_index(args: &SearchArgs) -> Result<UpsideDownIndex> {
    let config = match &args.index_config {
        Some(path) => from_json_file::<IndexConfig, _>(path)?,
        None => IndexConfig::default(),
    };
    let index = UpsideDownIndex::new(Arc::new(MemoryKvStore::new_default()), config)?;
    let docs = load_documents(&args.docs)?;
    for doc in &docs {
        index.update(doc)?;
    }
    info!("indexed {} documents from {}", docs.len(), args.docs.display());
    Ok(index)
}

fn required<'a>(value: &'a Option<String>, name: &str, mode: SearchMode) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| {
        LancetError::invalid_argument(format!("{mode:?} search needs a {name}"))
    })
}

fn field_and_query(args: &SearchArgs) -> Result<(&str, &str)> {
    Ok((
        required(&args.field, "field", args.mode)?,
        required(&args.query, "query", args.mode)?,
    ))
}

/// Build the searcher for the requested mode.
pub fn build_searcher(
    args: &SearchArgs,
    reader: &dyn IndexReader,
) -> Result<Box<dyn Searcher>> {
    let options = SearcherOptions::default().with_explain(args.explain);
    let config = SearcherConfig::with_max_clause_count(args.max_clause_count);

    let searcher: Box<dyn Searcher> = match args.mode {
        SearchMode::MatchAll => Box::new(MatchAllSearcher::new(reader, 1.0, options)?),
        SearchMode::NumericRange => Box::new(NumericRangeSearcher::new(
            reader,
            args.min,
            args.max,
            args.inclusive_min,
            args.inclusive_max,
            required(&args.field, "field", args.mode)?,
            1.0,
            options,
            config,
        )?),
        SearchMode::Term => {
            let (field, query) = field_and_query(args)?;
            let term = query.to_lowercase();
            Box::new(TermSearcher::new(reader, term.as_bytes(), field, 1.0, options)?)
        }
        SearchMode::Phrase => {
            let (field, query) = field_and_query(args)?;
            let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
            Box::new(PhraseSearcher::new(reader, &terms, field, options)?)
        }
        SearchMode::Fuzzy => {
            let (field, query) = field_and_query(args)?;
            Box::new(FuzzySearcher::new(
                reader,
                &query.to_lowercase(),
                args.prefix_length,
                args.fuzziness,
                field,
                1.0,
                options,
                config,
            )?)
        }
        SearchMode::Regexp => {
            let (field, query) = field_and_query(args)?;
            Box::new(RegexpSearcher::new(reader, query, field, 1.0, options, config)?)
        }
        SearchMode::Prefix => {
            let (field, query) = field_and_query(args)?;
            Box::new(TermPrefixSearcher::new(
                reader,
                &query.to_lowercase(),
                field,
                1.0,
                options,
                config,
            )?)
        }
    };

    match args.timeout_ms {
        Some(ms) => Ok(Box::new(TimeoutableSearcher::new(
            searcher,
            Duration::from_millis(ms),
        )?)),
        None => Ok(searcher),
    }
}

/// Index the documents and run one query.
fn search(args: &SearchArgs, cli_args: &LancetArgs, out: &mut dyn Write) -> Result<()> {
    let index = build_index(args)?;
    let reader = index.reader()?;

    let mut searcher = build_searcher(args, &reader)?;
    debug!("searcher tree: {searcher:?}");
    let result = TopNCollector::new(args.limit, args.offset).collect(searcher.as_mut(), &reader);
    searcher.close()?;

    output_result(&result?, cli_args, out)
}

/// Parse a distance string.
fn distance(args: &DistanceArgs, cli_args: &LancetArgs, out: &mut dyn Write) -> Result<()> {
    let meters = parse_distance(&args.distance)?;
    output_result(
        &DistanceResult {
            input: args.distance.clone(),
            meters,
        },
        cli_args,
        out,
    )
}

/// Check every shape in the file against the query shape.
fn relate(args: &RelateArgs, cli_args: &LancetArgs, out: &mut dyn Write) -> Result<()> {
    let query = parse_geojson_shape(args.query.as_bytes())?;
    let shapes = match read_json_values(&args.docs)? {
        Value::Array(items) => items,
        value @ Value::Object(_) => vec![value],
        _ => {
            return Err(LancetError::invalid_argument(format!(
                "{} does not hold GeoJSON shapes",
                args.docs.display()
            )));
        }
    };
    let encoded = shapes
        .iter()
        .map(serde_json::to_vec)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let relation = args.relation.as_str();
    let matches: Vec<usize> = encoded
        .par_iter()
        .enumerate()
        .filter_map(|(i, shape)| {
            match filter_geo_shapes_on_relation(&query, shape, relation) {
                Ok(true) => Some(i),
                Ok(false) => None,
                Err(e) => {
                    warn!("shape {i}: {e}");
                    None
                }
            }
        })
        .collect();

    output_result(
        &RelateResult {
            relation: relation.to_string(),
            shapes: encoded.len(),
            matches,
        },
        cli_args,
        out,
    )
}
