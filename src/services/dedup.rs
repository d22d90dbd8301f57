use std::collections::HashSet;

use crate::models::ArticleRecord;

use super::text::Normalization;

/// A candidate that survived deduplication, with the key it was admitted under
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueCandidate {
    pub key: String,
    pub record: ArticleRecord,
}

/// Candidates in provider order with duplicate titles collapsed
#[derive(Debug, Default)]
pub struct Deduplicated {
    pub candidates: Vec<UniqueCandidate>,
    pub untitled: usize,
    pub duplicates: usize,
}

impl Deduplicated {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Keeps the first record for each normalized title.
///
/// Later records with the same key are dropped, never merged. Records
/// without a title are dropped.
pub fn deduplicate(records: Vec<ArticleRecord>, normalization: Normalization) -> Deduplicated {
    let mut seen = HashSet::new();
    let mut result = Deduplicated::default();

    for record in records {
        let Some(title) = record.title.as_deref() else {
            result.untitled += 1;
            continue;
        };
        let key = normalization.apply(title);
        if seen.insert(key.clone()) {
            result.candidates.push(UniqueCandidate { key, record });
        } else {
            result.duplicates += 1;
        }
    }

    result
}
