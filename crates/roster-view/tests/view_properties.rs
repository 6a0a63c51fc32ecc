// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use proptest::prelude::*;
use roster_app::{
    Enrich, EnrichContext, EnrichedPerson, PersonColumn, SortDirection, SortSpec, TableColumn,
    TableRecord,
};
use roster_testkit::{PeopleFaker, fixture_today};
use roster_view::{
    ComboCommand, ComboOption, Combobox, ComboboxConfig, Debouncer, DismissReason, FilterQuery,
    filter, sort_records, text_matches,
};
use std::time::{Duration, Instant};

fn enriched_people(seed: u64, count: usize) -> Vec<EnrichedPerson> {
    let ctx = EnrichContext::new(fixture_today());
    let (people, _) = PeopleFaker::new(seed).household(count);
    people.iter().map(|person| person.enrich(&ctx)).collect()
}

fn spec_strategy() -> impl Strategy<Value = Option<SortSpec<PersonColumn>>> {
    proptest::option::of((0..PersonColumn::ALL.len(), any::<bool>())).prop_map(|choice| {
        choice.map(|(index, ascending)| SortSpec {
            column: PersonColumn::ALL[index],
            direction: if ascending {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        })
    })
}

fn ids<'a>(rows: impl IntoIterator<Item = &'a EnrichedPerson>) -> Vec<i64> {
    rows.into_iter().map(|row| row.row_id()).collect()
}

fn combo_command() -> impl Strategy<Value = ComboCommand> {
    prop_oneof![
        Just(ComboCommand::Open),
        proptest::char::range('a', 'z').prop_map(ComboCommand::Type),
        Just(ComboCommand::Backspace),
        Just(ComboCommand::ClearQuery),
        Just(ComboCommand::FocusNext),
        Just(ComboCommand::FocusPrev),
        Just(ComboCommand::Commit),
        Just(ComboCommand::Dismiss(DismissReason::Escape)),
        Just(ComboCommand::Dismiss(DismissReason::Tab)),
        Just(ComboCommand::PointerDown(None)),
        Just(ComboCommand::RemoveValue("lapsed".to_owned())),
    ]
}

proptest! {
    #[test]
    fn prop_inactive_rows_always_trail(
        seed in any::<u64>(),
        count in 0..60usize,
        spec in spec_strategy(),
    ) {
        let rows = enriched_people(seed, count);
        let sorted = sort_records(&rows, spec);
        prop_assert_eq!(sorted.len(), rows.len());
        if let Some(first_inactive) = sorted.iter().position(|row| row.is_inactive()) {
            prop_assert!(sorted[first_inactive..].iter().all(|row| row.is_inactive()));
        }
    }

    #[test]
    fn prop_sorting_is_idempotent(
        seed in any::<u64>(),
        count in 0..60usize,
        spec in spec_strategy(),
    ) {
        let rows = enriched_people(seed, count);
        let once = sort_records(&rows, spec);
        let twice = sort_records(once.iter().copied(), spec);
        prop_assert_eq!(ids(once), ids(twice));
    }

    #[test]
    fn prop_unsorted_keeps_input_order_within_partitions(
        seed in any::<u64>(),
        count in 0..60usize,
    ) {
        let rows = enriched_people(seed, count);
        let sorted = sort_records(&rows, None);
        let active: Vec<i64> = ids(rows.iter().filter(|row| !row.is_inactive()));
        let inactive: Vec<i64> = ids(rows.iter().filter(|row| row.is_inactive()));
        let expected: Vec<i64> = active.into_iter().chain(inactive).collect();
        prop_assert_eq!(ids(sorted), expected);
    }

    #[test]
    fn prop_blank_query_is_identity(
        seed in any::<u64>(),
        count in 0..40usize,
        blank in "[ \t]{0,3}",
    ) {
        let rows = enriched_people(seed, count);
        let query = FilterQuery::text(blank);
        prop_assert_eq!(ids(filter(&rows, &query)), ids(&rows));
    }

    #[test]
    fn prop_refining_query_never_grows(
        seed in any::<u64>(),
        count in 0..40usize,
        base in "[a-z]{0,3}",
        suffix in "[a-z]{1,3}",
    ) {
        let rows = enriched_people(seed, count);
        let broad = FilterQuery::text(base.clone());
        let narrow = FilterQuery::text(format!("{base}{suffix}"));

        let broad_ids = ids(filter(&rows, &broad));
        let narrow_ids = ids(filter(&rows, &narrow));
        prop_assert!(broad_ids.len() <= rows.len());
        prop_assert!(narrow_ids.iter().all(|id| broad_ids.contains(id)));
    }

    #[test]
    fn prop_refining_non_ascii_query_never_grows(
        fields in proptest::collection::vec("[a-zA-ZΑΣΩσςωéÉ]{0,8}", 0..4),
        base in "[a-zA-ZΑΣΩσςωéÉ]{0,3}",
        suffix in "[a-zA-ZΑΣΩσςωéÉ]{1,3}",
    ) {
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        let narrow = format!("{base}{suffix}");
        if text_matches(&fields, &narrow) {
            prop_assert!(text_matches(&fields, &base));
        }
    }

    #[test]
    fn prop_fewer_facets_never_grow(
        seed in any::<u64>(),
        count in 0..40usize,
        mask in proptest::collection::vec(any::<bool>(), 5),
    ) {
        let rows = enriched_people(seed, count);
        let all = ["active", "prospect", "dormant", "lapsed", "deceased"];
        let chosen: Vec<&str> = all
            .iter()
            .zip(&mask)
            .filter_map(|(status, keep)| keep.then_some(*status))
            .collect();
        if chosen.is_empty() {
            return Ok(());
        }
        let wide = FilterQuery::values(all);
        let narrow = FilterQuery::values(chosen);
        let wide_ids = ids(filter(&rows, &wide));
        let narrow_ids = ids(filter(&rows, &narrow));
        prop_assert_eq!(wide_ids.len(), rows.len());
        prop_assert!(narrow_ids.iter().all(|id| wide_ids.contains(id)));
    }

    #[test]
    fn prop_focus_stays_within_candidates(
        multi in any::<bool>(),
        keep_open in any::<bool>(),
        preview in 1..6usize,
        commands in proptest::collection::vec(combo_command(), 0..40),
    ) {
        let options: Vec<ComboOption> = ["Active", "Prospect", "Dormant", "Lapsed", "Deceased"]
            .into_iter()
            .map(|label| ComboOption::new(label.to_lowercase(), label))
            .collect();
        let config = (if multi { ComboboxConfig::multi() } else { ComboboxConfig::single() })
            .with_preview_limit(preview)
            .with_keep_open(keep_open);
        let mut combo = Combobox::new(config, options);
        let now = Instant::now();

        for command in commands {
            combo.dispatch(command, now);
            if let Some(position) = combo.focused() {
                prop_assert!(position < combo.candidate_count());
            }
            if !combo.is_open() {
                prop_assert_eq!(combo.candidate_count(), 0);
            }
            if !multi {
                prop_assert!(combo.selected().len() <= 1);
            }
        }
    }

    #[test]
    fn prop_debounce_delivers_only_the_last_value(
        gaps in proptest::collection::vec(0..299u64, 1..20),
    ) {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let mut at = start;
        let mut last = 0;
        for (index, gap) in gaps.iter().enumerate() {
            at += Duration::from_millis(*gap);
            prop_assert_eq!(debouncer.poll(at), None);
            debouncer.schedule(index, at);
            last = index;
        }
        prop_assert_eq!(debouncer.poll(at + Duration::from_millis(300)), Some(last));
        prop_assert_eq!(debouncer.poll(at + Duration::from_millis(600)), None);
    }
}
