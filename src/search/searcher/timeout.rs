use std::time::{Duration, Instant};

use log::debug;

use crate::error::{LancetError, Result};
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::Searcher;

/// Fails a search that runs past a deadline.
///
/// The clock starts on the first `next` or `advance`. Every later call
/// checks it before delegating and returns [`LancetError::Timeout`] once the
/// deadline has passed. Scores and order are those of the inner searcher.
#[derive(Debug)]
pub struct TimeoutableSearcher {
    searcher: Box<dyn Searcher>,
    timeout: Duration,
    started: Option<Instant>,
}

impl TimeoutableSearcher {
    pub fn new(searcher: Box<dyn Searcher>, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(LancetError::invalid_argument("timeout must be positive"));
        }
        Ok(TimeoutableSearcher {
            searcher,
            timeout,
            started: None,
        })
    }

    fn check_deadline(&mut self) -> Result<()> {
        match self.started {
            None => {
                self.started = Some(Instant::now());
                Ok(())
            }
            Some(started) => {
                let elapsed = started.elapsed();
                if elapsed > self.timeout {
                    debug!("search timed out after {elapsed:?}");
                    Err(LancetError::Timeout { elapsed })
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Searcher for TimeoutableSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        self.check_deadline()?;
        self.searcher.next(ctx)
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        self.check_deadline()?;
        self.searcher.advance(ctx, id)
    }

    fn close(&mut self) -> Result<()> {
        self.searcher.close()
    }

    fn weight(&self) -> f64 {
        self.searcher.weight()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        self.searcher.set_query_norm(qnorm)
    }

    fn count(&self) -> u64 {
        self.searcher.count()
    }

    fn min(&self) -> usize {
        self.searcher.min()
    }

    fn document_match_pool_size(&self) -> usize {
        self.searcher.document_match_pool_size()
    }
}
