// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Display-only fields derived from raw records.
//!
//! Every function here is total: malformed or missing input maps to
//! [`PLACEHOLDER`] or `None`, never to a panic.

use std::collections::BTreeSet;
use time::Date;
use time::macros::format_description;

use crate::{EnrichedCondition, EnrichedPerson, HealthCondition, Person};

pub const PLACEHOLDER: &str = "-";

const DEFAULT_INACTIVE_STATUSES: [&str; 2] = ["lapsed", "deceased"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InactiveStatuses {
    statuses: BTreeSet<String>,
}

impl InactiveStatuses {
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            statuses: statuses
                .into_iter()
                .map(|status| normalize_status(status.as_ref()))
                .filter(|status| !status.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, status: &str) -> bool {
        self.statuses.contains(&normalize_status(status))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl Default for InactiveStatuses {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVE_STATUSES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichContext {
    pub today: Date,
    pub inactive: InactiveStatuses,
}

impl EnrichContext {
    pub fn new(today: Date) -> Self {
        Self {
            today,
            inactive: InactiveStatuses::default(),
        }
    }

    pub fn with_inactive(mut self, inactive: InactiveStatuses) -> Self {
        self.inactive = inactive;
        self
    }
}

/// Pure derivation of an enriched row from a raw record.
pub trait Enrich {
    type Output;

    fn enrich(&self, ctx: &EnrichContext) -> Self::Output;
}

impl Enrich for Person {
    type Output = EnrichedPerson;

    fn enrich(&self, ctx: &EnrichContext) -> EnrichedPerson {
        let birth_date = self.date_of_birth.as_deref().and_then(parse_iso_date);
        EnrichedPerson {
            person: self.clone(),
            full_name: full_name(
                self.title.as_deref(),
                Some(self.first_name.as_str()),
                Some(self.surname.as_str()),
            ),
            birth_date,
            age: birth_date.and_then(|birth| age_on(birth, ctx.today)),
            date_of_birth_display: format_display_date(self.date_of_birth.as_deref()),
            is_inactive: ctx.inactive.contains(&self.status),
        }
    }
}

impl Enrich for HealthCondition {
    type Output = EnrichedCondition;

    fn enrich(&self, ctx: &EnrichContext) -> EnrichedCondition {
        EnrichedCondition {
            condition: self.clone(),
            diagnosed_date: self.diagnosed_on.as_deref().and_then(parse_iso_date),
            diagnosed_display: format_display_date(self.diagnosed_on.as_deref()),
            is_inactive: ctx.inactive.contains(&self.status),
        }
    }
}

pub fn full_name(title: Option<&str>, first_name: Option<&str>, surname: Option<&str>) -> String {
    [title, first_name, surname]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `YYYY-MM-DD`, also accepting an ISO datetime that starts with one.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let date_part = match raw.get(10..11) {
        Some("T") => raw.get(..10)?,
        _ => raw,
    };
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_iso_date)
        .and_then(|date| date.format(format_description!("[day]/[month]/[year]")).ok())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// Whole years from `birth` to `today`; `None` for birth dates in the future.
pub fn age_on(birth: Date, today: Date) -> Option<i32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    let birthday_reached =
        (u8::from(today.month()), today.day()) >= (u8::from(birth.month()), birth.day());
    if !birthday_reached {
        years -= 1;
    }
    Some(years)
}

pub fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}
