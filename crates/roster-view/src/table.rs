// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! A sortable, searchable view over one shared record collection.
//!
//! Enrichment runs once per collection identity; sorting and filtering work
//! on the cached enriched rows.

use roster_app::{Enrich, EnrichContext, SortSpec, TableColumn, TableRecord, normalize_status};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::debounce::{DebounceToken, Debouncer};
use crate::filter::{FilterQuery, filter};
use crate::sort::sort_records;

pub type ColumnOf<Raw> = <<Raw as Enrich>::Output as TableRecord>::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub query_debounce: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            query_debounce: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand<C> {
    CycleSort(C),
    /// Sort by a column named at runtime; unknown labels are rejected.
    SortByLabel(String),
    SetSort(Option<SortSpec<C>>),
    ClearSort,
    SetQuery(String),
    ClearQuery,
    ApplyQueryNow,
    ToggleFacet(String),
    SetFacets(Vec<String>),
    ClearFacets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent<C> {
    SortChanged(Option<SortSpec<C>>),
    SortRejected(String),
    QueryScheduled(DebounceToken),
    FilterApplied { query: String, matches: usize },
    FacetsChanged(Vec<String>),
    Announce(String),
}

impl<C> TableEvent<C> {
    pub fn announcement(&self) -> Option<&str> {
        match self {
            Self::Announce(message) => Some(message),
            _ => None,
        }
    }
}

pub struct TableView<Raw>
where
    Raw: Enrich,
    Raw::Output: TableRecord,
{
    ctx: EnrichContext,
    source: Option<Arc<Vec<Raw>>>,
    rows: Vec<Raw::Output>,
    enrich_runs: u64,
    sort: Option<SortSpec<ColumnOf<Raw>>>,
    input_query: String,
    text_filter: FilterQuery,
    facet_filter: FilterQuery,
    query_timer: Debouncer<String>,
}

impl<Raw> TableView<Raw>
where
    Raw: Enrich,
    Raw::Output: TableRecord,
{
    pub fn new(ctx: EnrichContext, config: TableConfig) -> Self {
        Self {
            ctx,
            source: None,
            rows: Vec::new(),
            enrich_runs: 0,
            sort: None,
            input_query: String::new(),
            text_filter: FilterQuery::default(),
            facet_filter: FilterQuery::values(Vec::<String>::new()),
            query_timer: Debouncer::new(config.query_debounce),
        }
    }

    /// Swaps in a collection. Returns whether enrichment ran; loading the
    /// same `Arc` again is free.
    pub fn load(&mut self, records: Arc<Vec<Raw>>) -> bool {
        if self
            .source
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &records))
        {
            return false;
        }
        self.source = Some(records);
        self.reenrich();
        true
    }

    pub fn set_context(&mut self, ctx: EnrichContext) {
        if self.ctx == ctx {
            return;
        }
        self.ctx = ctx;
        if self.source.is_some() {
            self.reenrich();
        }
    }

    pub fn context(&self) -> &EnrichContext {
        &self.ctx
    }

    pub fn set_query_debounce(&mut self, delay: Duration) {
        self.query_timer.set_delay(delay);
    }

    fn reenrich(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        self.rows = source.iter().map(|record| record.enrich(&self.ctx)).collect();
        self.enrich_runs += 1;
        tracing::debug!(rows = self.rows.len(), runs = self.enrich_runs, "enriched rows");
    }

    /// Visible rows: text filter, then facets, then the pinned sort.
    pub fn rows(&self) -> Vec<&Raw::Output> {
        let text = filter(&self.rows, &self.text_filter);
        sort_records(filter(text, &self.facet_filter), self.sort)
    }

    pub fn row_count(&self) -> usize {
        filter(filter(&self.rows, &self.text_filter), &self.facet_filter).count()
    }

    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    pub fn enrich_runs(&self) -> u64 {
        self.enrich_runs
    }

    pub fn sort(&self) -> Option<SortSpec<ColumnOf<Raw>>> {
        self.sort
    }

    /// What the user typed, which may not be applied yet.
    pub fn input_query(&self) -> &str {
        &self.input_query
    }

    pub fn applied_query(&self) -> &str {
        match &self.text_filter {
            FilterQuery::Text(query) => query,
            FilterQuery::Values(_) => "",
        }
    }

    pub fn facets(&self) -> Vec<String> {
        match &self.facet_filter {
            FilterQuery::Values(values) => values.iter().cloned().collect(),
            FilterQuery::Text(_) => Vec::new(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.query_timer.deadline()
    }

    /// Distinct normalized facet values across every loaded row.
    pub fn facet_values(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| normalize_status(row.facet_value()))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn dispatch(
        &mut self,
        command: TableCommand<ColumnOf<Raw>>,
        now: Instant,
    ) -> Vec<TableEvent<ColumnOf<Raw>>> {
        match command {
            TableCommand::CycleSort(column) => self.set_sort(SortSpec::cycle(self.sort, column)),
            TableCommand::SortByLabel(label) => {
                match <ColumnOf<Raw> as TableColumn>::parse(&label) {
                    Some(column) => self.set_sort(SortSpec::cycle(self.sort, column)),
                    None => {
                        tracing::warn!(label = %label, "sort rejected: unknown column");
                        vec![TableEvent::SortRejected(label)]
                    }
                }
            }
            TableCommand::SetSort(spec) => self.set_sort(spec),
            TableCommand::ClearSort => self.set_sort(None),
            TableCommand::SetQuery(query) => {
                self.input_query = query.clone();
                let token = self.query_timer.schedule(query, now);
                vec![TableEvent::QueryScheduled(token)]
            }
            TableCommand::ClearQuery => {
                self.query_timer.cancel();
                self.input_query.clear();
                self.apply_query(String::new())
            }
            TableCommand::ApplyQueryNow => match self.query_timer.flush() {
                Some(query) => self.apply_query(query),
                None => Vec::new(),
            },
            TableCommand::ToggleFacet(value) => {
                let value = normalize_status(&value);
                let mut facets = self.facets();
                match facets.iter().position(|facet| *facet == value) {
                    Some(position) => {
                        facets.remove(position);
                    }
                    None => facets.push(value),
                }
                self.set_facets(facets)
            }
            TableCommand::SetFacets(values) => self.set_facets(values),
            TableCommand::ClearFacets => self.set_facets(Vec::new()),
        }
    }

    /// Applies the pending query once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<TableEvent<ColumnOf<Raw>>> {
        match self.query_timer.poll(now) {
            Some(query) => self.apply_query(query),
            None => Vec::new(),
        }
    }

    /// Applies the pending query if `token` is still current. Stale tokens
    /// from superseded timers do nothing.
    pub fn fire(&mut self, token: DebounceToken) -> Vec<TableEvent<ColumnOf<Raw>>> {
        match self.query_timer.fire(token) {
            Some(query) => self.apply_query(query),
            None => Vec::new(),
        }
    }

    fn set_sort(
        &mut self,
        spec: Option<SortSpec<ColumnOf<Raw>>>,
    ) -> Vec<TableEvent<ColumnOf<Raw>>> {
        if self.sort == spec {
            return Vec::new();
        }
        self.sort = spec;
        let message = match spec {
            Some(spec) => format!(
                "sorted by {} {}",
                spec.column.label(),
                spec.direction.as_str()
            ),
            None => "sort cleared".to_owned(),
        };
        tracing::debug!(sort = %message, "sort changed");
        vec![TableEvent::SortChanged(spec), TableEvent::Announce(message)]
    }

    fn apply_query(&mut self, query: String) -> Vec<TableEvent<ColumnOf<Raw>>> {
        self.text_filter = FilterQuery::text(query.clone());
        let matches = self.row_count();
        tracing::debug!(query = %query, matches, "filter applied");
        vec![
            TableEvent::FilterApplied { query, matches },
            TableEvent::Announce(result_count(matches)),
        ]
    }

    fn set_facets(&mut self, values: Vec<String>) -> Vec<TableEvent<ColumnOf<Raw>>> {
        let facet_filter = FilterQuery::values(values);
        if facet_filter == self.facet_filter {
            return Vec::new();
        }
        self.facet_filter = facet_filter;
        let facets = self.facets();
        let matches = self.row_count();
        tracing::debug!(?facets, matches, "facets changed");
        vec![
            TableEvent::FacetsChanged(facets),
            TableEvent::Announce(result_count(matches)),
        ]
    }
}

fn result_count(matches: usize) -> String {
    match matches {
        1 => "1 result".to_owned(),
        count => format!("{count} results"),
    }
}

#[cfg(test)]
mod tests {
    use super::{TableCommand, TableConfig, TableEvent, TableView};
    use roster_app::{EnrichContext, Person, PersonColumn, PersonId, SortSpec, TableRecord};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use time::{Date, Month};

    fn ctx() -> EnrichContext {
        EnrichContext::new(Date::from_calendar_date(2024, Month::June, 14).expect("valid date"))
    }

    fn person(id: i64, first_name: &str, status: &str, dob: Option<&str>) -> Person {
        Person {
            id: PersonId::new(id),
            title: None,
            first_name: first_name.to_owned(),
            surname: "Example".to_owned(),
            relationship: "Friend".to_owned(),
            date_of_birth: dob.map(str::to_owned),
            email: format!("{}@example.com", first_name.to_lowercase()),
            status: status.to_owned(),
        }
    }

    fn people() -> Arc<Vec<Person>> {
        Arc::new(vec![
            person(1, "Bea", "lapsed", Some("1990-01-01")),
            person(2, "Abe", "active", Some("1970-01-01")),
            person(3, "Cal", "prospect", None),
            person(4, "Dee", "active", Some("2001-01-01")),
        ])
    }

    fn view() -> TableView<Person> {
        let mut view = TableView::new(ctx(), TableConfig::default());
        view.load(people());
        view
    }

    fn ids(view: &TableView<Person>) -> Vec<i64> {
        view.rows().iter().map(|row| row.row_id()).collect()
    }

    #[test]
    fn enrichment_is_memoized_by_collection_identity() {
        let mut view = TableView::new(ctx(), TableConfig::default());
        let records = people();
        assert!(view.load(Arc::clone(&records)));
        assert!(!view.load(Arc::clone(&records)));
        view.dispatch(TableCommand::CycleSort(PersonColumn::Name), Instant::now());
        let _ = view.rows();
        assert_eq!(view.enrich_runs(), 1);

        assert!(view.load(people()));
        assert_eq!(view.enrich_runs(), 2);
    }

    #[test]
    fn unsorted_view_pins_inactive_rows() {
        assert_eq!(ids(&view()), vec![2, 3, 4, 1]);
    }

    #[test]
    fn three_header_clicks_cycle_sort() {
        let mut view = view();
        let now = Instant::now();

        view.dispatch(TableCommand::CycleSort(PersonColumn::Age), now);
        assert_eq!(view.sort(), Some(SortSpec::asc(PersonColumn::Age)));
        assert_eq!(ids(&view), vec![4, 2, 3, 1]);

        view.dispatch(TableCommand::CycleSort(PersonColumn::Age), now);
        assert_eq!(view.sort(), Some(SortSpec::desc(PersonColumn::Age)));
        assert_eq!(ids(&view), vec![2, 4, 3, 1]);

        let events = view.dispatch(TableCommand::CycleSort(PersonColumn::Age), now);
        assert_eq!(view.sort(), None);
        assert!(events.contains(&TableEvent::Announce("sort cleared".to_owned())));
    }

    #[test]
    fn unknown_sort_label_is_rejected_without_state_change() {
        let mut view = view();
        let now = Instant::now();
        view.dispatch(TableCommand::SortByLabel("Age".to_owned()), now);

        let events = view.dispatch(TableCommand::SortByLabel("shoe size".to_owned()), now);
        assert_eq!(events, vec![TableEvent::SortRejected("shoe size".to_owned())]);
        assert_eq!(view.sort(), Some(SortSpec::asc(PersonColumn::Age)));
    }

    #[test]
    fn query_is_debounced_until_tick() {
        let mut view = view();
        let start = Instant::now();

        view.dispatch(TableCommand::SetQuery("a".to_owned()), start);
        view.dispatch(
            TableCommand::SetQuery("abe".to_owned()),
            start + Duration::from_millis(100),
        );
        assert_eq!(view.input_query(), "abe");
        assert_eq!(view.row_count(), 4);

        assert!(view.tick(start + Duration::from_millis(350)).is_empty());
        let events = view.tick(start + Duration::from_millis(400));
        assert_eq!(
            events.first(),
            Some(&TableEvent::FilterApplied {
                query: "abe".to_owned(),
                matches: 1,
            })
        );
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn stale_token_does_not_apply_old_query() {
        let mut view = view();
        let now = Instant::now();
        let stale = match view.dispatch(TableCommand::SetQuery("bea".to_owned()), now).pop() {
            Some(TableEvent::QueryScheduled(token)) => token,
            other => panic!("expected scheduled query, got {other:?}"),
        };
        let latest = match view.dispatch(TableCommand::SetQuery("cal".to_owned()), now).pop() {
            Some(TableEvent::QueryScheduled(token)) => token,
            other => panic!("expected scheduled query, got {other:?}"),
        };

        assert!(view.fire(stale).is_empty());
        assert_eq!(view.applied_query(), "");
        view.fire(latest);
        assert_eq!(view.applied_query(), "cal");
        assert_eq!(ids(&view), vec![3]);
    }

    #[test]
    fn oversized_query_delay_waits_for_an_explicit_apply() {
        let config = TableConfig {
            query_debounce: Duration::from_secs(u64::MAX),
        };
        let mut view = TableView::new(ctx(), config);
        view.load(people());
        let now = Instant::now();

        view.dispatch(TableCommand::SetQuery("a".to_owned()), now);
        assert_eq!(view.deadline(), None);
        assert!(view.tick(now + Duration::from_secs(86_400)).is_empty());
        assert_eq!(view.row_count(), 4);

        view.dispatch(TableCommand::ApplyQueryNow, now);
        assert_eq!(view.applied_query(), "a");
    }

    #[test]
    fn clearing_query_cancels_pending_and_resets_now() {
        let mut view = view();
        let now = Instant::now();
        view.dispatch(TableCommand::SetQuery("dee".to_owned()), now);
        view.dispatch(TableCommand::ApplyQueryNow, now);
        assert_eq!(ids(&view), vec![4]);

        view.dispatch(TableCommand::SetQuery("bea".to_owned()), now);
        let events = view.dispatch(TableCommand::ClearQuery, now);
        assert!(events.contains(&TableEvent::Announce("4 results".to_owned())));
        assert_eq!(view.deadline(), None);
        assert_eq!(view.input_query(), "");
        assert_eq!(ids(&view), vec![2, 3, 4, 1]);
    }

    #[test]
    fn facets_toggle_membership() {
        let mut view = view();
        let now = Instant::now();
        view.dispatch(TableCommand::ToggleFacet("Active".to_owned()), now);
        assert_eq!(view.facets(), vec!["active".to_owned()]);
        assert_eq!(ids(&view), vec![2, 4]);

        view.dispatch(TableCommand::ToggleFacet("lapsed".to_owned()), now);
        assert_eq!(ids(&view), vec![2, 4, 1]);

        view.dispatch(TableCommand::ToggleFacet("ACTIVE".to_owned()), now);
        assert_eq!(ids(&view), vec![1]);

        view.dispatch(TableCommand::ClearFacets, now);
        assert_eq!(view.row_count(), 4);
    }

    #[test]
    fn facet_values_are_distinct_and_normalized() {
        let mut view = TableView::new(ctx(), TableConfig::default());
        view.load(Arc::new(vec![
            person(1, "Ann", " Active ", None),
            person(2, "Bo", "active", None),
            person(3, "Cy", "LAPSED", None),
            person(4, "Di", "", None),
        ]));
        assert_eq!(view.facet_values(), vec!["active".to_owned(), "lapsed".to_owned()]);
    }

    #[test]
    fn context_change_reenriches() {
        let mut view = view();
        let later = ctx();
        view.set_context(later.clone());
        assert_eq!(view.enrich_runs(), 1);

        let inactive = later.with_inactive(roster_app::InactiveStatuses::new(["prospect"]));
        view.set_context(inactive);
        assert_eq!(view.enrich_runs(), 2);
        assert_eq!(ids(&view), vec![1, 2, 4, 3]);
    }
}
