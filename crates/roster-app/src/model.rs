// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + Eq> SortSpec<C> {
    pub const fn asc(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// Next sort after a header click on `column`: none -> asc -> desc -> none.
    /// A click on a different column starts over at ascending.
    pub fn cycle(current: Option<Self>, column: C) -> Option<Self> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Asc => Some(Self::desc(column)),
                SortDirection::Desc => None,
            },
            _ => Some(Self::asc(column)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    pub surname: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub title: Option<String>,
    pub first_name: String,
    pub surname: String,
    pub relationship: String,
    pub date_of_birth: Option<String>,
    pub email: String,
    pub status: String,
}

impl NewPerson {
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            title: self.title,
            first_name: self.first_name,
            surname: self.surname,
            relationship: self.relationship,
            date_of_birth: self.date_of_birth,
            email: self.email,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCondition {
    pub id: HealthConditionId,
    pub person_name: String,
    pub condition: String,
    #[serde(default)]
    pub diagnosed_on: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPerson {
    pub person: Person,
    pub full_name: String,
    pub birth_date: Option<Date>,
    pub age: Option<i32>,
    pub date_of_birth_display: String,
    pub is_inactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedCondition {
    pub condition: HealthCondition,
    pub diagnosed_date: Option<Date>,
    pub diagnosed_display: String,
    pub is_inactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonColumn {
    Name,
    Relationship,
    Age,
    DateOfBirth,
    Email,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionColumn {
    Person,
    Condition,
    Diagnosed,
    Status,
}

/// Statuses offered by the status pickers, in display order.
pub const KNOWN_STATUSES: [&str; 5] = ["active", "prospect", "dormant", "lapsed", "deceased"];
