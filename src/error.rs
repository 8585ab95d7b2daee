//! Error types for the Lancet library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LancetError`] enum. Construction problems (too many clauses, unknown
//! shape types, bad distance strings) surface before any iteration starts,
//! while I/O failures from readers propagate unchanged through every
//! `next`/`advance` call of a searcher tree.
//!
//! # Examples
//!
//! ```
//! use lancet::error::{LancetError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LancetError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::time::Duration;

use thiserror::Error;

/// The main error type for Lancet operations.
#[derive(Error, Debug)]
pub enum LancetError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (invalid searcher construction, bad options)
    #[error("Query error: {0}")]
    Query(String),

    /// Geo-related errors (bad coordinates, malformed shapes)
    #[error("Geo error: {0}")]
    Geo(String),

    /// Candidate expansion exceeded the configured clause ceiling
    #[error("TooManyClauses[maxClauseCount is set to {max_clause_count}]")]
    TooManyClauses { max_clause_count: usize },

    /// A timeoutable searcher passed its deadline
    #[error("search timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// A shape pair has no predicate implementation
    #[error("unknown geojson type: {0} found in document")]
    UnknownGeoJsonType(String),

    /// A GeoJSON `type` that is not a known shape
    #[error("unknown shape type: {0}")]
    UnknownShapeType(String),

    /// A spatial relation other than intersects/contains/within
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// A distance suffix that is not a known unit
    #[error("unknown distance unit: {0}")]
    UnknownDistanceUnit(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regular expression compilation errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Row encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LancetError.
pub type Result<T> = std::result::Result<T, LancetError>;

impl LancetError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        LancetError::Index(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LancetError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        LancetError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        LancetError::Query(msg.into())
    }

    /// Create a new geo error.
    pub fn geo<S: Into<String>>(msg: S) -> Self {
        LancetError::Geo(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LancetError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LancetError::Other(msg.into())
    }

    /// Create a too-many-clauses error for the given ceiling.
    pub fn too_many_clauses(max_clause_count: usize) -> Self {
        LancetError::TooManyClauses { max_clause_count }
    }

    /// Returns true if this error was produced by a timeoutable searcher.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LancetError::Timeout { .. })
    }
}
