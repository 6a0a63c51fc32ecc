// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use roster_app::{
    HealthCondition, HealthConditionId, KNOWN_STATUSES, NewPerson, Person, PersonId,
};
use std::path::PathBuf;
use time::{Date, Month};

const TITLES: [&str; 5] = ["Mr", "Ms", "Mx", "Dr", "Prof"];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const SURNAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const RELATIONSHIPS: [&str; 8] = [
    "Self", "Spouse", "Partner", "Child", "Parent", "Sibling", "Grandparent", "Dependant",
];

const CONDITIONS: [&str; 12] = [
    "Asthma",
    "Type 2 diabetes",
    "Hypertension",
    "Migraine",
    "Eczema",
    "Coeliac disease",
    "Osteoarthritis",
    "Hay fever",
    "Hypothyroidism",
    "Anaemia",
    "Gout",
    "Sleep apnoea",
];

const CONDITION_STATUSES: [&str; 4] = ["active", "managed", "resolved", "lapsed"];

const MALFORMED_DATES: [&str; 5] = ["15/06/1980", "unknown", "1980-13-01", "", "2023-02-30"];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.int_n(100) < percent
    }
}

/// Seeded generator of household rosters. The same seed always yields the
/// same people and conditions.
#[derive(Debug, Clone)]
pub struct PeopleFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl PeopleFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn person(&mut self, id: i64) -> Person {
        self.new_person().into_person(PersonId::new(id))
    }

    /// A person as a create form would submit it.
    pub fn new_person(&mut self) -> NewPerson {
        let first_name = self.pick(&FIRST_NAMES).to_owned();
        let surname = self.pick(&SURNAMES).to_owned();
        let title = if self.rng.chance(30) {
            Some(self.pick(&TITLES).to_owned())
        } else {
            None
        };
        let email = format!(
            "{}.{}{}@example.com",
            first_name.to_lowercase(),
            surname.to_lowercase(),
            self.rng.int_n(100)
        );
        NewPerson {
            title,
            first_name,
            surname,
            relationship: self.pick(&RELATIONSHIPS).to_owned(),
            date_of_birth: self.raw_date(1930, REFERENCE_YEAR - 1),
            email,
            status: self.status(),
        }
    }

    pub fn condition(&mut self, id: i64, person_name: &str) -> HealthCondition {
        HealthCondition {
            id: HealthConditionId::new(id),
            person_name: person_name.to_owned(),
            condition: self.pick(&CONDITIONS).to_owned(),
            diagnosed_on: self.raw_date(1995, REFERENCE_YEAR),
            status: self.pick(&CONDITION_STATUSES).to_owned(),
        }
    }

    /// `count` people with ids from 1, plus zero to two conditions each.
    pub fn household(&mut self, count: usize) -> (Vec<Person>, Vec<HealthCondition>) {
        let mut people = Vec::with_capacity(count);
        let mut conditions = Vec::new();
        for index in 0..count {
            let person = self.person(index as i64 + 1);
            let name = format!("{} {}", person.first_name, person.surname);
            for _ in 0..self.rng.int_n(3) {
                let id = conditions.len() as i64 + 1;
                conditions.push(self.condition(id, &name));
            }
            people.push(person);
        }
        (people, conditions)
    }

    pub fn date_in_year(&mut self, year: i32) -> Date {
        let month = Month::try_from(self.rng.int_n(12) as u8 + 1).unwrap_or(Month::January);
        let day = self.rng.int_n(28) as u8 + 1;
        Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn status(&mut self) -> String {
        let status = self.pick(&KNOWN_STATUSES);
        if self.rng.chance(10) {
            format!(" {} ", status.to_uppercase())
        } else {
            status.to_owned()
        }
    }

    /// Mostly ISO dates, with the gaps and junk real exports contain.
    fn raw_date(&mut self, min_year: i32, max_year: i32) -> Option<String> {
        let roll = self.rng.int_n(100);
        if roll < 10 {
            return None;
        }
        if roll < 15 {
            return Some(self.pick(&MALFORMED_DATES).to_owned());
        }
        let span = (max_year - min_year).max(0) as usize + 1;
        let year = min_year + self.rng.int_n(span) as i32;
        let date = self.date_in_year(year);
        if roll < 20 {
            Some(format!("{date}T00:00:00Z"))
        } else {
            Some(date.to_string())
        }
    }
}

/// Fixed "today" so ages in fixtures never drift.
pub fn fixture_today() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::February, 19).unwrap_or(Date::MIN)
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

/// Writes `{ "people": [...], "conditions": [...] }` into a temp dir.
pub fn temp_data_file(
    people: &[Person],
    conditions: &[HealthCondition],
) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("roster.json");
    let body = serde_json::to_string_pretty(&serde_json::json!({
        "people": people,
        "conditions": conditions,
    }))
    .context("encode roster json")?;
    std::fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
