// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;
use time::Date;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::{ConditionColumn, EnrichedCondition, EnrichedPerson, PersonColumn};

/// Closed column enumeration declared by a table.
pub trait TableColumn: Copy + Eq + Hash + Debug + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.label().eq_ignore_ascii_case(label))
    }
}

/// An enriched row the table engine can sort, filter and render.
pub trait TableRecord {
    type Column: TableColumn;

    fn row_id(&self) -> i64;
    fn is_inactive(&self) -> bool;
    fn sort_value(&self, column: Self::Column) -> SortValue;
    fn display(&self, column: Self::Column) -> String;
    fn search_fields(&self) -> Vec<&str>;
    fn facet_value(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue {
    Text(String),
    Number(Option<i64>),
    Date(Option<Date>),
}

impl SortValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Number(None) | Self::Date(None))
    }

    /// Replaces text with its collation key; other kinds pass through.
    pub fn folded(self) -> Self {
        match self {
            Self::Text(value) => Self::Text(collation_key(&value)),
            other => other,
        }
    }

    /// Compares two present values of the same kind. Callers handle nulls.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.cmp(right),
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::Text(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
        }
    }
}

/// Lowercases one character at a time, so the result of a substring is
/// always a substring of the result for the whole string.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Primary-strength sort key: accents dropped, case folded. `Émile` and
/// `emile` compare equal and both sort between `Adam` and `Zoe`.
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

impl TableColumn for PersonColumn {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Relationship,
        Self::Age,
        Self::DateOfBirth,
        Self::Email,
        Self::Status,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Relationship => "relationship",
            Self::Age => "age",
            Self::DateOfBirth => "date of birth",
            Self::Email => "email",
            Self::Status => "status",
        }
    }
}

impl TableColumn for ConditionColumn {
    const ALL: &'static [Self] = &[Self::Person, Self::Condition, Self::Diagnosed, Self::Status];

    fn label(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Condition => "condition",
            Self::Diagnosed => "diagnosed",
            Self::Status => "status",
        }
    }
}

impl TableRecord for EnrichedPerson {
    type Column = PersonColumn;

    fn row_id(&self) -> i64 {
        self.person.id.get()
    }

    fn is_inactive(&self) -> bool {
        self.is_inactive
    }

    fn sort_value(&self, column: PersonColumn) -> SortValue {
        match column {
            PersonColumn::Name => SortValue::Text(self.full_name.clone()),
            PersonColumn::Relationship => SortValue::Text(self.person.relationship.clone()),
            PersonColumn::Age => SortValue::Number(self.age.map(i64::from)),
            PersonColumn::DateOfBirth => SortValue::Date(self.birth_date),
            PersonColumn::Email => SortValue::Text(self.person.email.clone()),
            PersonColumn::Status => SortValue::Text(self.person.status.clone()),
        }
    }

    fn display(&self, column: PersonColumn) -> String {
        match column {
            PersonColumn::Name => self.full_name.clone(),
            PersonColumn::Relationship => self.person.relationship.clone(),
            PersonColumn::Age => self
                .age
                .map(|age| age.to_string())
                .unwrap_or_else(|| crate::PLACEHOLDER.to_owned()),
            PersonColumn::DateOfBirth => self.date_of_birth_display.clone(),
            PersonColumn::Email => self.person.email.clone(),
            PersonColumn::Status => self.person.status.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.full_name.as_str(),
            self.person.email.as_str(),
            self.person.relationship.as_str(),
            self.person.status.as_str(),
        ]
    }

    fn facet_value(&self) -> &str {
        &self.person.status
    }
}

impl TableRecord for EnrichedCondition {
    type Column = ConditionColumn;

    fn row_id(&self) -> i64 {
        self.condition.id.get()
    }

    fn is_inactive(&self) -> bool {
        self.is_inactive
    }

    fn sort_value(&self, column: ConditionColumn) -> SortValue {
        match column {
            ConditionColumn::Person => SortValue::Text(self.condition.person_name.clone()),
            ConditionColumn::Condition => SortValue::Text(self.condition.condition.clone()),
            ConditionColumn::Diagnosed => SortValue::Date(self.diagnosed_date),
            ConditionColumn::Status => SortValue::Text(self.condition.status.clone()),
        }
    }

    fn display(&self, column: ConditionColumn) -> String {
        match column {
            ConditionColumn::Person => self.condition.person_name.clone(),
            ConditionColumn::Condition => self.condition.condition.clone(),
            ConditionColumn::Diagnosed => self.diagnosed_display.clone(),
            ConditionColumn::Status => self.condition.status.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.condition.person_name.as_str(),
            self.condition.condition.as_str(),
            self.condition.status.as_str(),
        ]
    }

    fn facet_value(&self) -> &str {
        &self.condition.status
    }
}
