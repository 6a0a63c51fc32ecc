// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::{SortDirection, SortSpec, SortValue, TableRecord};
use std::cmp::Ordering;

/// Orders `records` with inactive rows pinned after active ones.
///
/// Without a sort spec this is a stable partition. With a spec the named column
/// orders rows inside each partition; ties keep their input order, so sorting
/// an already sorted sequence returns it unchanged.
pub fn sort_records<'a, R, I>(records: I, spec: Option<SortSpec<R::Column>>) -> Vec<&'a R>
where
    R: TableRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let Some(spec) = spec else {
        let (active, inactive): (Vec<&R>, Vec<&R>) = records
            .into_iter()
            .partition(|record| !record.is_inactive());
        return active.into_iter().chain(inactive).collect();
    };

    let mut keyed = records
        .into_iter()
        .map(|record| {
            (
                record.is_inactive(),
                record.sort_value(spec.column).folded(),
                record,
            )
        })
        .collect::<Vec<_>>();
    keyed.sort_by(|left, right| {
        left.0
            .cmp(&right.0)
            .then_with(|| compare_values(&left.1, &right.1, spec.direction))
    });
    keyed.into_iter().map(|(_, _, record)| record).collect()
}

/// Missing values trail present ones in both directions.
pub fn compare_values(left: &SortValue, right: &SortValue, direction: SortDirection) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let order = left.cmp_value(right);
            match direction {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            }
        }
    }
}
