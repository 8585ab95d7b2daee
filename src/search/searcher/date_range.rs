use chrono::{DateTime, Utc};

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::index::IndexReader;
use crate::search::searcher::numeric_range::new_int64_range_searcher;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};

/// Matches date fields in a range. Dates are indexed as nanoseconds since
/// the Unix epoch, so this is a numeric range over those values.
#[derive(Debug)]
pub struct DateRangeSearcher {
    searcher: MultiTermSearcher,
}

impl DateRangeSearcher {
    /// Create a new date range searcher. A missing bound is open; the start
    /// is inclusive and the end exclusive unless stated otherwise.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: &dyn IndexReader,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        inclusive_start: Option<bool>,
        inclusive_end: Option<bool>,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        let min = match start {
            Some(start) => to_nanos(&start)?,
            None => i64::MIN,
        };
        let max = match end {
            Some(end) => to_nanos(&end)?,
            None => i64::MAX,
        };

        let searcher = new_int64_range_searcher(
            index_reader,
            min,
            max,
            inclusive_start.unwrap_or(true),
            inclusive_end.unwrap_or(false),
            field,
            boost,
            options,
            config,
        )?;
        Ok(DateRangeSearcher { searcher })
    }
}

delegate_searcher!(DateRangeSearcher, searcher);

fn to_nanos(date: &DateTime<Utc>) -> Result<i64> {
    date.timestamp_nanos_opt().ok_or_else(|| {
        LancetError::invalid_argument(format!("date {date} is outside the representable range"))
    })
}

/// Parse an RFC 3339 date range bound.
pub fn parse_date_bound(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| LancetError::invalid_argument(format!("invalid date '{input}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Document, Field, UpsideDownIndex};
    use crate::search::searcher::test_util::ids;

    fn date_index() -> UpsideDownIndex {
        let index = UpsideDownIndex::in_memory().unwrap();
        for (id, date) in [
            ("a", "1969-07-20T20:17:40Z"),
            ("b", "2001-01-01T00:00:00Z"),
            ("c", "2014-03-07T12:00:00+01:00"),
            ("d", "2024-02-29T23:59:59Z"),
        ] {
            let date = parse_date_bound(date).unwrap();
            index
                .update(&Document::new(id).with_field(Field::date_time("when", date)))
                .unwrap();
        }
        index
    }

    fn search(
        index: &UpsideDownIndex,
        start: Option<&str>,
        end: Option<&str>,
        inclusive_end: Option<bool>,
    ) -> Vec<String> {
        let reader = index.reader().unwrap();
        let mut searcher = DateRangeSearcher::new(
            &reader,
            start.map(|s| parse_date_bound(s).unwrap()),
            end.map(|s| parse_date_bound(s).unwrap()),
            None,
            inclusive_end,
            "when",
            1.0,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )
        .unwrap();
        ids(&mut searcher)
    }

    #[test]
    fn test_parse_date_bound() {
        let date = parse_date_bound("2014-03-07T12:00:00+01:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2014-03-07T11:00:00+00:00");
        assert!(parse_date_bound("yesterday").is_err());
    }

    #[test]
    fn test_date_range() {
        let index = date_index();
        assert_eq!(
            search(&index, Some("2000-01-01T00:00:00Z"), None, None),
            vec!["b", "c", "d"]
        );
        assert_eq!(
            search(&index, None, Some("2001-01-01T00:00:00Z"), None),
            vec!["a"]
        );
        assert_eq!(
            search(&index, None, Some("2001-01-01T00:00:00Z"), Some(true)),
            vec!["a", "b"]
        );
        assert_eq!(
            search(
                &index,
                Some("2014-03-07T11:00:00Z"),
                Some("2024-01-01T00:00:00Z"),
                None
            ),
            vec!["c"]
        );
        assert_eq!(search(&index, None, None, None), vec!["a", "b", "c", "d"]);
    }
}
