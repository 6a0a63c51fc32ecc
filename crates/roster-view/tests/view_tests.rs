// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::{
    ConditionColumn, Enrich, EnrichContext, HealthCondition, HealthConditionId, Person,
    PersonColumn, PersonId, SortSpec, TableRecord,
};
use roster_testkit::{PeopleFaker, fixture_today};
use roster_view::{
    ActionKey, ActionKind, ActionOutcome, AnnouncementLog, Announcer, ComboCommand, ComboOption,
    ComboState, Combobox, ComboboxConfig, PendingActions, TableCommand, TableConfig, TableView,
    sort_records,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn person(id: i64, first_name: &str, status: &str) -> Person {
    Person {
        id: PersonId::new(id),
        title: None,
        first_name: first_name.to_owned(),
        surname: String::new(),
        relationship: String::new(),
        date_of_birth: None,
        email: String::new(),
        status: status.to_owned(),
    }
}

#[test]
fn lapsed_person_sorts_after_active_person_by_name() {
    let ctx = EnrichContext::new(fixture_today());
    let rows: Vec<_> = [person(1, "B", "lapsed"), person(2, "A", "active")]
        .iter()
        .map(|person| person.enrich(&ctx))
        .collect();

    let sorted = sort_records(&rows, Some(SortSpec::asc(PersonColumn::Name)));
    let names: Vec<&str> = sorted.iter().map(|row| row.full_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn three_clicks_on_age_header() {
    let mut view: TableView<Person> = TableView::new(
        EnrichContext::new(fixture_today()),
        TableConfig::default(),
    );
    let now = Instant::now();

    view.dispatch(TableCommand::SortByLabel("age".to_owned()), now);
    assert_eq!(view.sort(), Some(SortSpec::asc(PersonColumn::Age)));
    view.dispatch(TableCommand::SortByLabel("age".to_owned()), now);
    assert_eq!(view.sort(), Some(SortSpec::desc(PersonColumn::Age)));
    view.dispatch(TableCommand::SortByLabel("age".to_owned()), now);
    assert_eq!(view.sort(), None);
}

#[test]
fn multi_select_backspace_pops_last_value_and_stays_open() {
    let options = vec![ComboOption::new("x", "X"), ComboOption::new("y", "Y")];
    let mut combo = Combobox::new(ComboboxConfig::multi(), options);
    combo.set_selected(["x", "y"]);
    let now = Instant::now();

    combo.dispatch(ComboCommand::Open, now);
    combo.dispatch(ComboCommand::Backspace, now);

    assert_eq!(combo.selected(), ["x".to_owned()]);
    assert_eq!(combo.state(), ComboState::OpenEmptyQuery);
}

#[test]
fn faker_roster_flows_through_search_facets_and_sort() {
    let (people, _) = PeopleFaker::new(11).household(80);
    let mut view: TableView<Person> = TableView::new(
        EnrichContext::new(fixture_today()),
        TableConfig {
            query_debounce: Duration::from_millis(50),
        },
    );
    view.load(Arc::new(people));
    let start = Instant::now();

    view.dispatch(TableCommand::ToggleFacet("active".to_owned()), start);
    view.dispatch(TableCommand::ToggleFacet("lapsed".to_owned()), start);
    view.dispatch(TableCommand::CycleSort(PersonColumn::Age), start);
    view.dispatch(TableCommand::SetQuery("e".to_owned()), start);
    view.tick(start + Duration::from_millis(50));

    let rows = view.rows();
    assert_eq!(rows.len(), view.row_count());
    let mut seen_inactive = false;
    let mut last_age = None;
    for row in &rows {
        let status = row.person.status.trim().to_lowercase();
        assert!(status == "active" || status == "lapsed", "unexpected {status}");
        assert!(
            row.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains('e'))
        );
        if row.is_inactive() {
            if !seen_inactive {
                last_age = None;
            }
            seen_inactive = true;
        } else {
            assert!(!seen_inactive, "active row after inactive row");
        }
        if let (Some(previous), Some(age)) = (last_age, row.age) {
            assert!(previous <= age);
        }
        if row.age.is_some() {
            last_age = row.age;
        }
    }
    assert_eq!(view.enrich_runs(), 1);
}

#[test]
fn conditions_table_sorts_by_diagnosis_date() {
    let condition = |id: i64, diagnosed_on: Option<&str>, status: &str| HealthCondition {
        id: HealthConditionId::new(id),
        person_name: format!("Person {id}"),
        condition: "Asthma".to_owned(),
        diagnosed_on: diagnosed_on.map(str::to_owned),
        status: status.to_owned(),
    };
    let mut view: TableView<HealthCondition> =
        TableView::new(EnrichContext::new(fixture_today()), TableConfig::default());
    view.load(Arc::new(vec![
        condition(1, Some("2020-01-01"), "active"),
        condition(2, None, "active"),
        condition(3, Some("2015-06-01"), "active"),
        condition(4, Some("2010-01-01"), "lapsed"),
    ]));

    view.dispatch(
        TableCommand::SetSort(Some(SortSpec::desc(ConditionColumn::Diagnosed))),
        Instant::now(),
    );
    let order: Vec<i64> = view.rows().iter().map(|row| row.row_id()).collect();
    assert_eq!(order, vec![1, 3, 2, 4]);
}

#[test]
fn announcements_reach_an_injected_announcer() {
    let mut log = AnnouncementLog::default();
    let mut view: TableView<Person> =
        TableView::new(EnrichContext::new(fixture_today()), TableConfig::default());
    view.load(Arc::new(vec![person(1, "Ada", "active")]));

    let events = view.dispatch(TableCommand::CycleSort(PersonColumn::Name), Instant::now());
    for message in events.iter().filter_map(|event| event.announcement()) {
        log.announce(message);
    }
    assert_eq!(log.last(), Some("sorted by name ascending"));
}

#[test]
fn failed_action_keeps_rows_and_frees_the_key() {
    let records = Arc::new(vec![person(1, "Ada", "active")]);
    let mut view: TableView<Person> =
        TableView::new(EnrichContext::new(fixture_today()), TableConfig::default());
    view.load(Arc::clone(&records));
    let pending = PendingActions::default();
    let key = ActionKey::row(1, ActionKind::ChangeStatus);

    let outcome: ActionOutcome<()> = pending.run(key, "status set", || {
        anyhow::bail!("service unavailable")
    });
    assert!(!outcome.needs_reload());
    assert!(!view.load(records));
    assert_eq!(view.rows()[0].person.status, "active");
    assert!(pending.try_begin(key).is_some());
}
