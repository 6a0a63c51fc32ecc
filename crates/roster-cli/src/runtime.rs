// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use roster_app::{HealthCondition, NewPerson, Person, PersonId};
use roster_testkit::PeopleFaker;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEMO_SEED: u64 = 2026;
const DEMO_PEOPLE: usize = 40;

/// Data files hold either a bare people array or both collections.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataFile {
    Roster {
        people: Vec<Person>,
        #[serde(default)]
        conditions: Vec<HealthCondition>,
    },
    People(Vec<Person>),
}

/// Keeps the roster in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuntime {
    people: Vec<Person>,
    conditions: Vec<HealthCondition>,
}

impl MemoryRuntime {
    pub fn new(people: Vec<Person>, conditions: Vec<HealthCondition>) -> Self {
        Self { people, conditions }
    }

    pub fn demo() -> Self {
        let (people, conditions) = PeopleFaker::new(DEMO_SEED).household(DEMO_PEOPLE);
        Self::new(people, conditions)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read data file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("decode data file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let data: DataFile = serde_json::from_str(raw).context(
            "expected a JSON array of people or an object with `people` and `conditions`",
        )?;
        let runtime = match data {
            DataFile::Roster { people, conditions } => Self::new(people, conditions),
            DataFile::People(people) => Self::new(people, Vec::new()),
        };
        runtime.check_unique_ids()?;
        Ok(runtime)
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn conditions(&self) -> &[HealthCondition] {
        &self.conditions
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut ids: Vec<i64> = self.people.iter().map(|person| person.id.get()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            bail!("duplicate person id {}", pair[0]);
        }
        Ok(())
    }

    fn next_person_id(&self) -> PersonId {
        let max = self
            .people
            .iter()
            .map(|person| person.id.get())
            .max()
            .unwrap_or(0);
        PersonId::new(max + 1)
    }

    fn person_mut(&mut self, person_id: PersonId) -> Result<&mut Person> {
        match self.people.iter_mut().find(|person| person.id == person_id) {
            Some(person) => Ok(person),
            None => bail!("person {} not found; reload and try again", person_id.get()),
        }
    }
}

impl roster_tui::RosterRuntime for MemoryRuntime {
    fn load_people(&mut self) -> Result<Vec<Person>> {
        Ok(self.people.clone())
    }

    fn load_conditions(&mut self) -> Result<Vec<HealthCondition>> {
        Ok(self.conditions.clone())
    }

    fn change_status(&mut self, person_id: PersonId, status: &str) -> Result<()> {
        let status = status.trim();
        if status.is_empty() {
            bail!("status is required");
        }
        self.person_mut(person_id)?.status = status.to_owned();
        Ok(())
    }

    fn delete_person(&mut self, person_id: PersonId) -> Result<()> {
        let before = self.people.len();
        self.people.retain(|person| person.id != person_id);
        if self.people.len() == before {
            bail!("person {} not found; reload and try again", person_id.get());
        }
        Ok(())
    }

    fn create_person(&mut self, person: &NewPerson) -> Result<PersonId> {
        if person.first_name.trim().is_empty() {
            bail!("first name is required");
        }
        let id = self.next_person_id();
        self.people.push(person.clone().into_person(id));
        Ok(id)
    }
}
