//! Conjunctions and disjunctions agree with set algebra on random indexes.

use std::collections::{BTreeMap, BTreeSet};

use lancet::prelude::*;
use lancet::search::{ConjunctionSearcher, DisjunctionSearcher, TermSearcher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VOCABULARY: [&str; 6] = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"];

struct RandomIndex {
    index: UpsideDownIndex,
    postings: BTreeMap<&'static str, BTreeSet<String>>,
}

fn random_index(seed: u64, docs: usize) -> Result<RandomIndex> {
    let mut rng = StdRng::seed_from_u64(seed);
    let index = UpsideDownIndex::in_memory()?;
    let mut postings: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for n in 0..docs {
        let id = format!("doc{n:04}");
        let mut words: Vec<&str> = VOCABULARY
            .iter()
            .copied()
            .filter(|_| rng.random_bool(0.4))
            .collect();
        if words.is_empty() {
            words.push("filler");
        }
        for word in &words {
            postings.entry(*word).or_default().insert(id.clone());
        }
        index.update(&Document::new(id.as_str()).with_field(Field::text("body", words.join(" "))))?;
    }
    Ok(RandomIndex { index, postings })
}

impl RandomIndex {
    fn docs_with(&self, word: &str) -> BTreeSet<String> {
        self.postings.get(word).cloned().unwrap_or_default()
    }
}

fn terms(reader: &dyn IndexReader, words: &[&str]) -> Result<Vec<Box<dyn Searcher>>> {
    words
        .iter()
        .map(|word| {
            TermSearcher::new(reader, word.as_bytes(), "body", 1.0, SearcherOptions::default())
                .map(|s| Box::new(s) as Box<dyn Searcher>)
        })
        .collect()
}

// Drain a searcher, checking that ids come out strictly ascending.
fn drain(searcher: &mut dyn Searcher) -> Result<Vec<String>> {
    let mut ctx = SearchContext::new(searcher.document_match_pool_size());
    let mut rv: Vec<String> = Vec::new();
    while let Some(dm) = searcher.next(&mut ctx)? {
        let id = dm.index_internal_id.to_string();
        if let Some(last) = rv.last() {
            assert!(*last < id, "{last} came before {id}");
        }
        rv.push(id);
        ctx.pool.put(dm);
    }
    Ok(rv)
}

fn pick<'a>(rng: &mut StdRng, n: usize) -> Vec<&'a str> {
    (0..n)
        .map(|_| VOCABULARY[rng.random_range(0..VOCABULARY.len())])
        .collect()
}

#[test]
fn test_conjunction_is_intersection() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for seed in 0..8 {
        let index = random_index(seed, 120)?;
        let reader = index.index.reader()?;
        for _ in 0..10 {
            let n = rng.random_range(1..4);
            let words = pick(&mut rng, n);
            let expected = words
                .iter()
                .map(|w| index.docs_with(w))
                .reduce(|a, b| a.intersection(&b).cloned().collect())
                .unwrap_or_default();

            let mut searcher =
                ConjunctionSearcher::new(terms(&reader, &words)?, SearcherOptions::default());
            let got = drain(&mut searcher)?;
            assert_eq!(got, expected.into_iter().collect::<Vec<_>>(), "{words:?}");
        }
    }
    Ok(())
}

#[test]
fn test_disjunction_is_union() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    for seed in 0..8 {
        let index = random_index(seed, 120)?;
        let reader = index.index.reader()?;
        for _ in 0..10 {
            let n = rng.random_range(1..4);
            let words = pick(&mut rng, n);
            let expected: BTreeSet<String> =
                words.iter().flat_map(|w| index.docs_with(w)).collect();

            let mut searcher = DisjunctionSearcher::new(
                terms(&reader, &words)?,
                0,
                SearcherOptions::default(),
                SearcherConfig::default(),
            )?;
            let got = drain(&mut searcher)?;
            assert_eq!(got, expected.into_iter().collect::<Vec<_>>(), "{words:?}");
        }
    }
    Ok(())
}

#[test]
fn test_disjunction_min_counts_matching_clauses() -> Result<()> {
    let index = random_index(42, 200)?;
    let reader = index.index.reader()?;
    let words = ["alpha", "charlie", "echo", "foxtrot"];

    for min in 0..=words.len() + 1 {
        let mut expected = Vec::new();
        for doc in (0..200).map(|n| format!("doc{n:04}")) {
            let matched = words
                .iter()
                .filter(|w| index.docs_with(w).contains(&doc))
                .count();
            if matched > 0 && matched >= min {
                expected.push(doc);
            }
        }

        let mut searcher = DisjunctionSearcher::new(
            terms(&reader, &words)?,
            min,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )?;
        assert_eq!(drain(&mut searcher)?, expected, "min {min}");
    }
    Ok(())
}
