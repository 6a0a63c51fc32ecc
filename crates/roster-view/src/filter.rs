// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::{TableRecord, fold_case, normalize_status};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterQuery {
    /// Case-insensitive substring match against a record's search fields.
    Text(String),
    /// Membership of the record's facet value; stored normalized.
    Values(BTreeSet<String>),
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FilterQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text(query.into())
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Values(
            values
                .into_iter()
                .map(|value| normalize_status(value.as_ref()))
                .filter(|value| !value.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(query) => query.trim().is_empty(),
            Self::Values(values) => values.is_empty(),
        }
    }

    pub fn matches<R: TableRecord>(&self, record: &R) -> bool {
        match self {
            Self::Text(query) => text_matches(&record.search_fields(), query),
            Self::Values(values) => {
                values.is_empty() || values.contains(&normalize_status(record.facet_value()))
            }
        }
    }
}

/// True when any field contains the trimmed query, ignoring case. A blank
/// query matches everything.
pub fn text_matches(fields: &[&str], query: &str) -> bool {
    let needle = fold_case(query.trim());
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| fold_case(field).contains(&needle))
}

/// Lazy filtered view. Cloning it restarts the scan from the clone point.
#[derive(Debug, Clone)]
pub struct FilterView<'q, I> {
    inner: I,
    query: &'q FilterQuery,
}

impl<'a, 'q, R, I> Iterator for FilterView<'q, I>
where
    R: TableRecord + 'a,
    I: Iterator<Item = &'a R>,
{
    type Item = &'a R;

    fn next(&mut self) -> Option<&'a R> {
        let query = self.query;
        self.inner.find(|record| query.matches(*record))
    }
}

pub fn filter<'a, 'q, R, I>(records: I, query: &'q FilterQuery) -> FilterView<'q, I::IntoIter>
where
    R: TableRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    FilterView {
        inner: records.into_iter(),
        query,
    }
}
