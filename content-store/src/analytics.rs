use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::{Result, StoreError};
use crate::store::ContentStore;

/// Applied when a frequency request carries no `limit`.
pub const DEFAULT_FREQUENCY_LIMIT: usize = 5;

/// Ranking direction for frequency queries. Anything but `asc`/`dsc` on the
/// wire is an invalid request, not a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyOrder {
    Asc,
    Dsc,
}

impl FromStr for FrequencyOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(FrequencyOrder::Asc),
            "dsc" => Ok(FrequencyOrder::Dsc),
            other => Err(StoreError::InvalidArgument(format!(
                "invalid `order` value `{other}`, use `asc` or `dsc`"
            ))),
        }
    }
}

/// Aggregate text analytics over the whole stored corpus.
///
/// Nothing here is persisted: every query re-reads the store and recomputes
/// from scratch.
///
/// The corpus is every record's content (read as lossy UTF-8) joined with a
/// single space, in listing order, then split on the space character. The
/// split is deliberately naive: consecutive separators and empty contents
/// produce empty tokens, and those tokens count (an empty store has a word
/// count of 1). That is the counting contract; switching to a whitespace
/// split would change it.
#[derive(Clone)]
pub struct TextAnalytics {
    store: ContentStore,
}

impl TextAnalytics {
    pub fn new(store: ContentStore) -> Self {
        TextAnalytics { store }
    }

    fn corpus(&self) -> Result<String> {
        let records = self.store.list()?;
        let contents: Vec<String> = records
            .iter()
            .map(|record| String::from_utf8_lossy(&record.content).into_owned())
            .collect();
        Ok(contents.join(" "))
    }

    /// Total token count across all stored content.
    pub fn word_count(&self) -> Result<usize> {
        let count = self.corpus()?.split(' ').count();
        log::debug!("Word count over corpus: {count}");
        Ok(count)
    }

    /// The `limit` most (`dsc`) or least (`asc`) frequent words, words only.
    ///
    /// Equal counts are broken lexicographically by word, ascending, so the
    /// ranking is reproducible across runs. `limit` is clamped to the number
    /// of distinct words.
    pub fn frequency(
        &self,
        limit: usize,
        order: FrequencyOrder,
    ) -> Result<Vec<String>> {
        let corpus = self.corpus()?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in corpus.split(' ') {
            *counts.entry(word).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        match order {
            FrequencyOrder::Asc => ranked
                .sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0))),
            FrequencyOrder::Dsc => ranked
                .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))),
        }

        let limit = limit.min(ranked.len());
        Ok(ranked[..limit]
            .iter()
            .map(|(word, _)| (*word).to_owned())
            .collect())
    }
}
