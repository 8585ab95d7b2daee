//! End-to-end searcher trees over a small document set.

use std::thread;
use std::time::Duration;

use lancet::prelude::*;
use lancet::search::{
    BooleanSearcher, ConjunctionSearcher, DisjunctionSearcher, FuzzySearcher, MatchAllSearcher,
    PhraseSearcher, TermSearcher, TimeoutableSearcher,
};

fn beer_index() -> Result<UpsideDownIndex> {
    let index = UpsideDownIndex::in_memory()?;
    let docs = vec![
        Document::new("1")
            .with_field(Field::text("name", "marty"))
            .with_field(Field::text("desc", "beer beer beer beer"))
            .with_field(Field::text("street", "couchbase way")),
        Document::new("2")
            .with_field(Field::text("name", "steve"))
            .with_field(Field::text("desc", "angst beer couch database"))
            .with_field(Field::text("street", "couchbase way"))
            .with_field(Field::text("title", "mister")),
        Document::new("3")
            .with_field(Field::text("name", "dustin"))
            .with_field(Field::text("desc", "apple beer column dank"))
            .with_field(Field::text("title", "mister")),
        Document::new("4")
            .with_field(Field::text("name", "ravi"))
            .with_field(Field::text("desc", vec!["beer"; 65].join(" "))),
        Document::new("5")
            .with_field(Field::text("name", "bobert"))
            .with_field(Field::text("desc", "water"))
            .with_field(Field::text("title", "mister")),
    ];
    for doc in &docs {
        index.update(doc)?;
    }
    Ok(index)
}

fn term(
    reader: &dyn IndexReader,
    text: &str,
    field: &str,
    boost: f64,
    options: SearcherOptions,
) -> Result<Box<dyn Searcher>> {
    Ok(Box::new(TermSearcher::new(reader, text.as_bytes(), field, boost, options)?))
}

fn hit_ids(result: &SearchResult) -> Vec<&str> {
    result.hits.iter().map(|hit| hit.id.as_str()).collect()
}

#[test]
fn test_conjunction_score() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;
    let options = SearcherOptions::default().with_explain(true);

    let mut searcher = ConjunctionSearcher::new(
        vec![
            term(&reader, "beer", "desc", 1.0, options)?,
            term(&reader, "marty", "name", 5.0, options)?,
        ],
        options,
    );
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;

    assert_eq!(hit_ids(&result), vec!["1"]);
    assert!((result.hits[0].score - 2.0097428702814377).abs() < 1e-9);
    let expl = result.hits[0].expl.as_ref().expect("explanation requested");
    assert!((expl.value - result.hits[0].score).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_boolean_must_not() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;
    let options = SearcherOptions::default();

    let mut searcher = BooleanSearcher::new(
        Some(term(&reader, "beer", "desc", 1.0, options)?),
        None,
        Some(term(&reader, "steve", "name", 1.0, options)?),
        options,
    );
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
    let mut ids = hit_ids(&result);
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "3", "4"]);

    // a lone must-not clause matches nothing
    let mut searcher = BooleanSearcher::new(
        None,
        None,
        Some(term(&reader, "steve", "name", 1.0, options)?),
        options,
    );
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
    assert_eq!(result.total_hits, 0);
    Ok(())
}

#[test]
fn test_min_should_match() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;
    let options = SearcherOptions::default();

    let mut searcher = DisjunctionSearcher::new(
        vec![
            term(&reader, "beer", "desc", 1.0, options)?,
            term(&reader, "mister", "title", 1.0, options)?,
            term(&reader, "couchbase", "street", 1.0, options)?,
        ],
        2,
        options,
        SearcherConfig::default(),
    )?;
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
    let mut ids = hit_ids(&result);
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "2", "3"]);
    // doc 2 matches all three clauses
    assert_eq!(result.hits[0].id, "2");
    Ok(())
}

#[test]
fn test_clause_ceiling() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;
    let options = SearcherOptions::default();

    let err = DisjunctionSearcher::new(
        vec![
            term(&reader, "beer", "desc", 1.0, options)?,
            term(&reader, "water", "desc", 1.0, options)?,
            term(&reader, "angst", "desc", 1.0, options)?,
        ],
        0,
        options,
        SearcherConfig::with_max_clause_count(2),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LancetError::TooManyClauses {
            max_clause_count: 2
        }
    ));
    Ok(())
}

#[test]
fn test_fuzzy() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;

    let mut searcher = FuzzySearcher::new(
        &reader,
        "beet",
        0,
        1,
        "desc",
        1.0,
        SearcherOptions::default(),
        SearcherConfig::default(),
    )?;
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
    let mut ids = hit_ids(&result);
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);

    assert!(
        FuzzySearcher::new(
            &reader,
            "beet",
            0,
            3,
            "desc",
            1.0,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )
        .is_err()
    );
    Ok(())
}

#[test]
fn test_phrase_with_collector() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;

    let mut searcher =
        PhraseSearcher::new(&reader, &["angst", "beer"], "desc", SearcherOptions::default())?;
    let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
    assert_eq!(hit_ids(&result), vec!["2"]);
    let locations = &result.hits[0].locations["desc"];
    assert_eq!(locations["angst"][0].pos, 1);
    assert_eq!(locations["beer"][0].pos, 2);
    Ok(())
}

#[test]
fn test_updates_and_deletes() -> Result<()> {
    let index = beer_index()?;
    let before = index.reader()?;

    index.delete("2")?;
    index.update(&Document::new("3").with_field(Field::text("desc", "cider")))?;
    let after = index.reader()?;

    let options = SearcherOptions::default();
    let mut old = TermSearcher::new(&before, b"beer", "desc", 1.0, options)?;
    let mut new = TermSearcher::new(&after, b"beer", "desc", 1.0, options)?;
    let old = TopNCollector::new(10, 0).collect(&mut old, &before)?;
    let new = TopNCollector::new(10, 0).collect(&mut new, &after)?;

    // the earlier reader keeps its snapshot
    assert_eq!(old.total_hits, 4);
    let mut ids = hit_ids(&new);
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "4"]);
    Ok(())
}

#[test]
fn test_timeout() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;

    let inner = MatchAllSearcher::new(&reader, 1.0, SearcherOptions::default())?;
    let mut searcher = TimeoutableSearcher::new(Box::new(inner), Duration::from_millis(5))?;
    let mut ctx = SearchContext::new(searcher.document_match_pool_size());

    let first = searcher.next(&mut ctx)?.expect("first match");
    ctx.pool.put(first);
    thread::sleep(Duration::from_millis(20));
    let err = searcher.next(&mut ctx).unwrap_err();
    assert!(err.is_timeout());
    Ok(())
}

#[test]
fn test_weight_is_stable() -> Result<()> {
    let index = beer_index()?;
    let reader = index.reader()?;
    let options = SearcherOptions::default();

    let searcher = DisjunctionSearcher::new(
        vec![
            term(&reader, "beer", "desc", 2.0, options)?,
            term(&reader, "angst", "desc", 1.0, options)?,
        ],
        0,
        options,
        SearcherConfig::default(),
    )?;
    let first = searcher.weight();
    assert!(first > 0.0);
    assert_eq!(searcher.weight(), first);
    Ok(())
}
