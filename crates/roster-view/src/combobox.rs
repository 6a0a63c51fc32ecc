// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Typeahead selection over a fixed option list.
//!
//! The combobox is a pure state machine: front ends translate keys and
//! pointer events into [`ComboCommand`]s and render whatever state results.
//! Every transition returns the events it caused, including announcement
//! strings for assistive technology.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::filter::text_matches;
use crate::regions::{RegionId, RegionRegistry};

const DEFAULT_PREVIEW_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboOption {
    pub value: String,
    pub label: String,
}

impl ComboOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxConfig {
    pub mode: SelectionMode,
    /// Candidates shown for an empty query.
    pub preview_limit: usize,
    /// Multi-select only: stay open after a commit.
    pub keep_open_after_commit: bool,
    /// When set, query edits recompute candidates on a debounce tick.
    pub filter_debounce: Option<Duration>,
}

impl ComboboxConfig {
    pub fn single() -> Self {
        Self {
            mode: SelectionMode::Single,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            keep_open_after_commit: false,
            filter_debounce: None,
        }
    }

    pub fn multi() -> Self {
        Self {
            mode: SelectionMode::Multi,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            keep_open_after_commit: true,
            filter_debounce: None,
        }
    }

    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit.max(1);
        self
    }

    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open_after_commit = keep_open;
        self
    }

    pub fn with_filter_debounce(mut self, delay: Option<Duration>) -> Self {
        self.filter_debounce = delay;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboState {
    Closed,
    OpenEmptyQuery,
    OpenFiltered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Tab,
    ClickOutside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboCommand {
    Open,
    Type(char),
    Backspace,
    ClearQuery,
    FocusNext,
    FocusPrev,
    Commit,
    Dismiss(DismissReason),
    /// Pointer pressed on `target`; `None` when it hit nothing registered.
    PointerDown(Option<RegionId>),
    RemoveValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboEvent {
    Opened,
    Closed(DismissReason),
    Committed,
    CandidatesChanged { count: usize },
    FocusChanged(Option<usize>),
    SelectionChanged(Vec<String>),
    Announce(String),
}

impl ComboEvent {
    pub fn announcement(&self) -> Option<&str> {
        match self {
            Self::Announce(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combobox {
    config: ComboboxConfig,
    options: Vec<ComboOption>,
    open: bool,
    query: String,
    applied_query: String,
    candidates: Vec<usize>,
    focused: Option<usize>,
    selected: Vec<String>,
    regions: RegionRegistry,
    input_region: RegionId,
    list_region: RegionId,
    chip_regions: BTreeMap<String, RegionId>,
    filter_timer: Option<Debouncer<String>>,
}

impl Combobox {
    pub fn new(config: ComboboxConfig, options: Vec<ComboOption>) -> Self {
        let mut regions = RegionRegistry::default();
        let input_region = regions.register();
        let list_region = regions.register();
        let filter_timer = config.filter_debounce.map(Debouncer::new);
        Self {
            config,
            options,
            open: false,
            query: String::new(),
            applied_query: String::new(),
            candidates: Vec::new(),
            focused: None,
            selected: Vec::new(),
            regions,
            input_region,
            list_region,
            chip_regions: BTreeMap::new(),
            filter_timer,
        }
    }

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn state(&self) -> ComboState {
        if !self.open {
            ComboState::Closed
        } else if self.query.trim().is_empty() {
            ComboState::OpenEmptyQuery
        } else {
            ComboState::OpenFiltered
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &[ComboOption] {
        &self.options
    }

    pub fn candidates(&self) -> impl Iterator<Item = &ComboOption> + '_ {
        self.candidates.iter().map(|index| &self.options[*index])
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_option(&self) -> Option<&ComboOption> {
        self.focused
            .and_then(|position| self.candidates.get(position))
            .map(|index| &self.options[*index])
    }

    /// Committed values in commit order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|selected| selected == value)
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    pub fn input_region(&self) -> RegionId {
        self.input_region
    }

    pub fn list_region(&self) -> RegionId {
        self.list_region
    }

    /// Region of the detached chip (and its remove button) for `value`.
    pub fn chip_region(&self, value: &str) -> Option<RegionId> {
        self.chip_regions.get(value).copied()
    }

    /// Next instant a pending filter evaluation is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.filter_timer.as_ref().and_then(Debouncer::deadline)
    }

    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map_or(value, |option| option.label.as_str())
    }

    /// Replaces committed values without emitting events.
    pub fn set_selected<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for region in std::mem::take(&mut self.chip_regions).into_values() {
            self.regions.unregister(region);
        }
        self.selected.clear();
        for value in values {
            let value = value.into();
            if self.is_selected(&value) {
                continue;
            }
            if self.config.mode == SelectionMode::Single {
                self.selected.clear();
            }
            self.selected.push(value);
        }
        if self.config.mode == SelectionMode::Multi {
            for value in self.selected.clone() {
                self.chip_regions.insert(value, self.regions.register());
            }
        }
    }

    /// Replaces the option list. New options are a new candidate list even
    /// when the matching indices line up, so focus always resets.
    pub fn set_options(&mut self, options: Vec<ComboOption>) -> Vec<ComboEvent> {
        let mut events = Vec::new();
        if options == self.options {
            return events;
        }
        self.options = options;
        if self.focused.take().is_some() {
            events.push(ComboEvent::FocusChanged(None));
        }
        if self.open {
            self.candidates = self.compute_candidates();
            self.announce_candidates(&mut events);
        } else {
            self.candidates.clear();
        }
        events
    }

    pub fn dispatch(&mut self, command: ComboCommand, now: Instant) -> Vec<ComboEvent> {
        let mut events = Vec::new();
        match command {
            ComboCommand::Open => self.open(&mut events),
            ComboCommand::Type(ch) => {
                self.open(&mut events);
                self.query.push(ch);
                self.query_changed(now, &mut events);
            }
            ComboCommand::Backspace => {
                if !self.open {
                    return events;
                }
                if self.query.is_empty() {
                    if self.config.mode == SelectionMode::Multi
                        && let Some(value) = self.selected.last().cloned()
                    {
                        self.remove_value(&value, &mut events);
                    }
                } else {
                    self.query.pop();
                    self.query_changed(now, &mut events);
                }
            }
            ComboCommand::ClearQuery => {
                if let Some(timer) = self.filter_timer.as_mut() {
                    timer.cancel();
                }
                self.query.clear();
                self.applied_query.clear();
                if self.open {
                    self.recompute(&mut events);
                }
            }
            ComboCommand::FocusNext => {
                let Some(last) = self.candidates.len().checked_sub(1) else {
                    return events;
                };
                let next = match self.focused {
                    None => 0,
                    Some(position) => (position + 1).min(last),
                };
                self.move_focus(Some(next), &mut events);
            }
            ComboCommand::FocusPrev => {
                let prev = match self.focused {
                    None | Some(0) => None,
                    Some(position) => Some(position - 1),
                };
                self.move_focus(prev, &mut events);
            }
            ComboCommand::Commit => self.commit(&mut events),
            ComboCommand::Dismiss(reason) => self.close(reason, &mut events),
            ComboCommand::PointerDown(target) => {
                if !self.regions.is_inside(target) {
                    self.close(DismissReason::ClickOutside, &mut events);
                }
            }
            ComboCommand::RemoveValue(value) => self.remove_value(&value, &mut events),
        }
        events
    }

    /// Applies a due debounced query, if any.
    pub fn tick(&mut self, now: Instant) -> Vec<ComboEvent> {
        let mut events = Vec::new();
        let due = self.filter_timer.as_mut().and_then(|timer| timer.poll(now));
        if let Some(query) = due {
            self.applied_query = query;
            if self.open {
                self.recompute(&mut events);
            }
        }
        events
    }

    fn open(&mut self, events: &mut Vec<ComboEvent>) {
        if self.open {
            return;
        }
        self.open = true;
        self.query.clear();
        self.applied_query.clear();
        self.focused = None;
        self.candidates = self.compute_candidates();
        events.push(ComboEvent::Opened);
        events.push(ComboEvent::CandidatesChanged {
            count: self.candidates.len(),
        });
        events.push(ComboEvent::Announce(options_available(
            self.candidates.len(),
        )));
    }

    fn close(&mut self, reason: DismissReason, events: &mut Vec<ComboEvent>) {
        if !self.open {
            return;
        }
        if let Some(timer) = self.filter_timer.as_mut() {
            timer.cancel();
        }
        self.open = false;
        self.query.clear();
        self.applied_query.clear();
        self.candidates.clear();
        self.focused = None;
        tracing::debug!(?reason, "combobox closed");
        events.push(ComboEvent::Closed(reason));
    }

    fn query_changed(&mut self, now: Instant, events: &mut Vec<ComboEvent>) {
        match self.filter_timer.as_mut() {
            Some(timer) => {
                timer.schedule(self.query.clone(), now);
            }
            None => {
                self.applied_query = self.query.clone();
                self.recompute(events);
            }
        }
    }

    fn compute_candidates(&self) -> Vec<usize> {
        if self.applied_query.trim().is_empty() {
            return (0..self.options.len().min(self.config.preview_limit)).collect();
        }
        self.options
            .iter()
            .enumerate()
            .filter(|(_, option)| {
                text_matches(
                    &[option.label.as_str(), option.value.as_str()],
                    &self.applied_query,
                )
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn recompute(&mut self, events: &mut Vec<ComboEvent>) {
        let candidates = self.compute_candidates();
        if candidates == self.candidates {
            return;
        }
        self.candidates = candidates;
        if self.focused.take().is_some() {
            events.push(ComboEvent::FocusChanged(None));
        }
        self.announce_candidates(events);
    }

    fn announce_candidates(&self, events: &mut Vec<ComboEvent>) {
        let count = self.candidates.len();
        events.push(ComboEvent::CandidatesChanged { count });
        events.push(ComboEvent::Announce(options_available(count)));
    }

    fn move_focus(&mut self, focused: Option<usize>, events: &mut Vec<ComboEvent>) {
        if !self.open || focused == self.focused {
            return;
        }
        self.focused = focused;
        events.push(ComboEvent::FocusChanged(focused));
        if let Some(option) = self.focused_option() {
            events.push(ComboEvent::Announce(option.label.clone()));
        }
    }

    fn commit(&mut self, events: &mut Vec<ComboEvent>) {
        if !self.open {
            return;
        }
        let Some(option) = self.focused_option().cloned() else {
            return;
        };

        match self.config.mode {
            SelectionMode::Single => {
                self.selected = vec![option.value.clone()];
                events.push(ComboEvent::Committed);
                events.push(ComboEvent::SelectionChanged(self.selected.clone()));
                events.push(ComboEvent::Announce(format!("Selected {}", option.label)));
                self.close_after_commit();
            }
            SelectionMode::Multi => {
                if self.is_selected(&option.value) {
                    self.selected.retain(|value| value != &option.value);
                    if let Some(region) = self.chip_regions.remove(&option.value) {
                        self.regions.unregister(region);
                    }
                    events.push(ComboEvent::Committed);
                    events.push(ComboEvent::SelectionChanged(self.selected.clone()));
                    events.push(ComboEvent::Announce(format!("Removed {}", option.label)));
                } else {
                    self.selected.push(option.value.clone());
                    let region = self.regions.register();
                    self.chip_regions.insert(option.value.clone(), region);
                    events.push(ComboEvent::Committed);
                    events.push(ComboEvent::SelectionChanged(self.selected.clone()));
                    events.push(ComboEvent::Announce(format!("Selected {}", option.label)));
                }

                if let Some(timer) = self.filter_timer.as_mut() {
                    timer.cancel();
                }
                self.query.clear();
                self.applied_query.clear();
                if self.config.keep_open_after_commit {
                    self.recompute(events);
                } else {
                    self.close_after_commit();
                }
            }
        }
        tracing::debug!(value = %option.value, selected = self.selected.len(), "combobox commit");
    }

    fn close_after_commit(&mut self) {
        if let Some(timer) = self.filter_timer.as_mut() {
            timer.cancel();
        }
        self.open = false;
        self.query.clear();
        self.applied_query.clear();
        self.candidates.clear();
        self.focused = None;
    }

    fn remove_value(&mut self, value: &str, events: &mut Vec<ComboEvent>) {
        let Some(position) = self.selected.iter().position(|selected| selected == value) else {
            return;
        };
        let removed = self.selected.remove(position);
        if let Some(region) = self.chip_regions.remove(&removed) {
            self.regions.unregister(region);
        }
        let label = self.label_for(&removed).to_owned();
        events.push(ComboEvent::SelectionChanged(self.selected.clone()));
        events.push(ComboEvent::Announce(format!("Removed {label}")));
    }
}

fn options_available(count: usize) -> String {
    match count {
        0 => "no options available".to_owned(),
        1 => "1 option available".to_owned(),
        count => format!("{count} options available"),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ComboCommand, ComboEvent, ComboOption, ComboState, Combobox, ComboboxConfig,
        DismissReason,
    };
    use std::time::{Duration, Instant};

    fn statuses() -> Vec<ComboOption> {
        ["Active", "Prospect", "Dormant", "Lapsed", "Deceased"]
            .into_iter()
            .map(|label| ComboOption::new(label.to_lowercase(), label))
            .collect()
    }

    fn run(combo: &mut Combobox, commands: &[ComboCommand]) -> Vec<ComboEvent> {
        let now = Instant::now();
        commands
            .iter()
            .cloned()
            .flat_map(|command| combo.dispatch(command, now))
            .collect()
    }

    #[test]
    fn open_shows_preview_without_focus() {
        let mut combo = Combobox::new(ComboboxConfig::single().with_preview_limit(3), statuses());
        let events = run(&mut combo, &[ComboCommand::Open]);

        assert_eq!(combo.state(), ComboState::OpenEmptyQuery);
        assert_eq!(combo.candidate_count(), 3);
        assert_eq!(combo.focused(), None);
        assert!(events.contains(&ComboEvent::Announce("3 options available".to_owned())));
    }

    #[test]
    fn typing_filters_and_resets_focus() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        run(&mut combo, &[ComboCommand::Open, ComboCommand::FocusNext]);
        assert_eq!(combo.focused(), Some(0));

        let events = run(&mut combo, &[ComboCommand::Type('s')]);
        assert_eq!(combo.state(), ComboState::OpenFiltered);
        let labels: Vec<_> = combo.candidates().map(|option| option.label.as_str()).collect();
        assert_eq!(labels, vec!["Prospect", "Lapsed", "Deceased"]);
        assert_eq!(combo.focused(), None);
        assert!(events.contains(&ComboEvent::FocusChanged(None)));
    }

    #[test]
    fn typing_while_closed_opens() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        let events = run(&mut combo, &[ComboCommand::Type('d')]);
        assert_eq!(events.first(), Some(&ComboEvent::Opened));
        assert_eq!(combo.query(), "d");
        assert_eq!(combo.candidate_count(), 3);
    }

    #[test]
    fn arrows_clamp_without_wrapping() {
        let mut combo = Combobox::new(ComboboxConfig::single().with_preview_limit(2), statuses());
        run(&mut combo, &[ComboCommand::Open]);

        run(&mut combo, &[ComboCommand::FocusPrev]);
        assert_eq!(combo.focused(), None);

        run(
            &mut combo,
            &[
                ComboCommand::FocusNext,
                ComboCommand::FocusNext,
                ComboCommand::FocusNext,
            ],
        );
        assert_eq!(combo.focused(), Some(1));

        run(&mut combo, &[ComboCommand::FocusPrev, ComboCommand::FocusPrev]);
        assert_eq!(combo.focused(), None);
    }

    #[test]
    fn enter_without_focus_is_a_noop() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        run(&mut combo, &[ComboCommand::Open]);
        assert!(run(&mut combo, &[ComboCommand::Commit]).is_empty());
        assert!(combo.is_open());
        assert!(combo.selected().is_empty());
    }

    #[test]
    fn single_commit_replaces_and_closes() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        combo.set_selected(["active"]);
        let events = run(
            &mut combo,
            &[
                ComboCommand::Open,
                ComboCommand::Type('l'),
                ComboCommand::Type('a'),
                ComboCommand::FocusNext,
                ComboCommand::Commit,
            ],
        );

        assert_eq!(combo.selected(), ["lapsed".to_owned()]);
        assert_eq!(combo.state(), ComboState::Closed);
        assert_eq!(combo.query(), "");
        assert!(events.contains(&ComboEvent::Announce("Selected Lapsed".to_owned())));
    }

    #[test]
    fn multi_commit_toggles_and_stays_open() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        run(
            &mut combo,
            &[
                ComboCommand::Open,
                ComboCommand::FocusNext,
                ComboCommand::Commit,
                ComboCommand::FocusNext,
                ComboCommand::Commit,
            ],
        );
        assert_eq!(combo.selected(), ["active".to_owned(), "prospect".to_owned()]);
        assert!(combo.is_open());

        let events = run(&mut combo, &[ComboCommand::Commit]);
        assert_eq!(combo.selected(), ["active".to_owned()]);
        assert!(events.contains(&ComboEvent::Announce("Removed Prospect".to_owned())));
    }

    #[test]
    fn multi_commit_clears_query() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        run(
            &mut combo,
            &[
                ComboCommand::Type('d'),
                ComboCommand::Type('o'),
                ComboCommand::FocusNext,
                ComboCommand::Commit,
            ],
        );
        assert_eq!(combo.selected(), ["dormant".to_owned()]);
        assert_eq!(combo.state(), ComboState::OpenEmptyQuery);
        assert_eq!(combo.candidate_count(), 5);
    }

    #[test]
    fn multi_can_close_after_commit() {
        let mut combo = Combobox::new(ComboboxConfig::multi().with_keep_open(false), statuses());
        run(
            &mut combo,
            &[ComboCommand::Open, ComboCommand::FocusNext, ComboCommand::Commit],
        );
        assert_eq!(combo.selected(), ["active".to_owned()]);
        assert_eq!(combo.state(), ComboState::Closed);
    }

    #[test]
    fn replacing_options_resets_focus_even_with_same_count() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        run(&mut combo, &[ComboCommand::Open, ComboCommand::FocusNext]);
        assert_eq!(combo.focused(), Some(0));

        let renamed = ["Member", "Guest", "Dormant", "Former", "Deceased"]
            .into_iter()
            .map(|label| ComboOption::new(label.to_lowercase(), label))
            .collect();
        let events = combo.set_options(renamed);
        assert_eq!(combo.focused(), None);
        assert!(events.contains(&ComboEvent::FocusChanged(None)));
        assert!(events.contains(&ComboEvent::CandidatesChanged { count: 5 }));
        assert_eq!(
            combo.candidates().next().map(|option| option.label.as_str()),
            Some("Member")
        );

        let same = combo.options().to_vec();
        assert!(combo.set_options(same).is_empty());
    }

    #[test]
    fn backspace_on_empty_query_removes_last_value() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        combo.set_selected(["lapsed", "deceased"]);
        let events = run(&mut combo, &[ComboCommand::Open, ComboCommand::Backspace]);

        assert_eq!(combo.selected(), ["lapsed".to_owned()]);
        assert!(combo.is_open());
        assert!(events.contains(&ComboEvent::Announce("Removed Deceased".to_owned())));
    }

    #[test]
    fn backspace_edits_query_when_present() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        combo.set_selected(["lapsed"]);
        run(
            &mut combo,
            &[
                ComboCommand::Type('a'),
                ComboCommand::Type('c'),
                ComboCommand::Backspace,
            ],
        );
        assert_eq!(combo.query(), "a");
        assert_eq!(combo.selected(), ["lapsed".to_owned()]);
    }

    #[test]
    fn backspace_on_empty_single_select_keeps_value() {
        let mut combo = Combobox::new(ComboboxConfig::single(), statuses());
        combo.set_selected(["active"]);
        run(&mut combo, &[ComboCommand::Open, ComboCommand::Backspace]);
        assert_eq!(combo.selected(), ["active".to_owned()]);
    }

    #[test]
    fn dismiss_discards_query_and_keeps_values() {
        for reason in [DismissReason::Escape, DismissReason::Tab] {
            let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
            combo.set_selected(["dormant"]);
            let events = run(
                &mut combo,
                &[ComboCommand::Type('x'), ComboCommand::Dismiss(reason)],
            );
            assert_eq!(combo.state(), ComboState::Closed);
            assert_eq!(combo.query(), "");
            assert_eq!(combo.selected(), ["dormant".to_owned()]);
            assert!(events.contains(&ComboEvent::Closed(reason)));
        }
    }

    #[test]
    fn pointer_inside_registered_regions_keeps_open() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        combo.set_selected(["active"]);
        run(&mut combo, &[ComboCommand::Open]);

        let chip = combo.chip_region("active");
        assert!(chip.is_some());
        let targets = [Some(combo.input_region()), Some(combo.list_region()), chip];
        for target in targets {
            assert!(run(&mut combo, &[ComboCommand::PointerDown(target)]).is_empty());
            assert!(combo.is_open());
        }

        let events = run(&mut combo, &[ComboCommand::PointerDown(None)]);
        assert_eq!(events, vec![ComboEvent::Closed(DismissReason::ClickOutside)]);
    }

    #[test]
    fn removing_a_chip_unregisters_its_region() {
        let mut combo = Combobox::new(ComboboxConfig::multi(), statuses());
        combo.set_selected(["active", "lapsed"]);
        let chip = combo.chip_region("lapsed");

        run(&mut combo, &[ComboCommand::RemoveValue("lapsed".to_owned())]);
        assert_eq!(combo.selected(), ["active".to_owned()]);
        assert_eq!(combo.chip_region("lapsed"), None);
        assert!(!combo.regions().is_inside(chip));
    }

    #[test]
    fn debounced_filter_applies_on_tick() {
        let config = ComboboxConfig::single().with_filter_debounce(Some(Duration::from_millis(150)));
        let mut combo = Combobox::new(config, statuses());
        let start = Instant::now();

        combo.dispatch(ComboCommand::Type('l'), start);
        combo.dispatch(ComboCommand::Type('a'), start + Duration::from_millis(40));
        assert_eq!(combo.candidate_count(), 5);
        assert_eq!(
            combo.deadline(),
            Some(start + Duration::from_millis(190))
        );

        assert!(combo.tick(start + Duration::from_millis(100)).is_empty());
        let events = combo.tick(start + Duration::from_millis(190));
        assert!(events.contains(&ComboEvent::CandidatesChanged { count: 1 }));
        assert_eq!(combo.deadline(), None);
    }

    #[test]
    fn empty_option_list_announces_nothing_available() {
        let mut combo = Combobox::new(ComboboxConfig::single(), Vec::new());
        let events = run(&mut combo, &[ComboCommand::Open, ComboCommand::FocusNext]);
        assert_eq!(combo.focused(), None);
        assert!(events.contains(&ComboEvent::Announce("no options available".to_owned())));
    }
}
