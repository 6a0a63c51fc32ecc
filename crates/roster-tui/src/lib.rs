// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use roster_app::{
    AppCommand, AppState, ConditionColumn, Enrich, EnrichContext, HealthCondition,
    InactiveStatuses, InputMode, KNOWN_STATUSES, NewPerson, Person, PersonColumn, PersonId,
    PickerKind, SortDirection, TabKind, TableColumn, TableRecord, normalize_status,
};
use roster_view::{
    ActionKey, ActionKind, ActionOutcome, AnnouncementLog, Announcer, ColumnOf, ComboCommand,
    ComboEvent, ComboOption, Combobox, ComboboxConfig, DismissReason, NoticeLevel,
    PendingActions, TableCommand, TableConfig, TableEvent, TableView,
};
use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use time::Date;

const SORT_ARROW_ASC: &str = "↑";
const SORT_ARROW_DESC: &str = "↓";
const IDLE_POLL: Duration = Duration::from_millis(120);
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Backend the terminal front end reads from and writes through.
pub trait RosterRuntime {
    fn load_people(&mut self) -> Result<Vec<Person>>;
    fn load_conditions(&mut self) -> Result<Vec<HealthCondition>>;
    fn change_status(&mut self, person_id: PersonId, status: &str) -> Result<()>;
    fn delete_person(&mut self, person_id: PersonId) -> Result<()>;
    fn create_person(&mut self, person: &NewPerson) -> Result<PersonId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub today: Date,
    pub inactive: InactiveStatuses,
    pub table: TableConfig,
    pub preview_limit: usize,
    pub keep_multi_select_open: bool,
    pub picker_debounce: Option<Duration>,
}

impl ViewOptions {
    pub fn new(today: Date) -> Self {
        Self {
            today,
            inactive: InactiveStatuses::default(),
            table: TableConfig::default(),
            preview_limit: 8,
            keep_multi_select_open: true,
            picker_debounce: Some(Duration::from_millis(150)),
        }
    }

    fn context(&self) -> EnrichContext {
        EnrichContext::new(self.today).with_inactive(self.inactive.clone())
    }

    fn facet_config(&self) -> ComboboxConfig {
        ComboboxConfig::multi()
            .with_preview_limit(self.preview_limit)
            .with_keep_open(self.keep_multi_select_open)
            .with_filter_debounce(self.picker_debounce)
    }

    fn status_config(&self) -> ComboboxConfig {
        ComboboxConfig::single()
            .with_preview_limit(self.preview_limit)
            .with_filter_debounce(self.picker_debounce)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableUiState {
    selected_row: usize,
    selected_col: usize,
}

struct ViewData {
    people: TableView<Person>,
    conditions: TableView<HealthCondition>,
    people_ui: TableUiState,
    conditions_ui: TableUiState,
    facet_picker: Combobox,
    status_picker: Combobox,
    status_target: Option<PersonId>,
    create_input: String,
    actions: PendingActions,
    announcements: AnnouncementLog,
    status_token: u64,
    screen: Rect,
}

impl ViewData {
    fn new(options: &ViewOptions) -> Self {
        let ctx = options.context();
        Self {
            people: TableView::new(ctx.clone(), options.table),
            conditions: TableView::new(ctx, options.table),
            people_ui: TableUiState::default(),
            conditions_ui: TableUiState::default(),
            facet_picker: Combobox::new(options.facet_config(), Vec::new()),
            status_picker: Combobox::new(options.status_config(), status_options(&[])),
            status_target: None,
            create_input: String::new(),
            actions: PendingActions::default(),
            announcements: AnnouncementLog::default(),
            status_token: 0,
            screen: Rect::default(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        [
            self.people.deadline(),
            self.conditions.deadline(),
            self.facet_picker.deadline(),
            self.status_picker.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn active_picker(&self, state: &AppState) -> Option<&Combobox> {
        match state.mode {
            InputMode::Picker(PickerKind::StatusFacet) => Some(&self.facet_picker),
            InputMode::Picker(PickerKind::ChangeStatus) => Some(&self.status_picker),
            _ => None,
        }
    }
}

pub fn run_app<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: &ViewOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let result = event_loop(&mut terminal, state, runtime, options);

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    result
}

fn event_loop<R: RosterRuntime>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runtime: &mut R,
    options: &ViewOptions,
) -> Result<()> {
    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = reload(runtime, &mut view_data) {
        tracing::error!(error = %format!("{error:#}"), "initial load failed");
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error:#}")));
    }
    tracing::info!(
        people = view_data.people.total_count(),
        conditions = view_data.conditions.total_count(),
        "roster loaded"
    );

    loop {
        process_internal_events(state, &view_data, &internal_rx);
        process_timers(state, &mut view_data, &internal_tx, Instant::now());

        let mut screen = view_data.screen;
        terminal
            .draw(|frame| {
                screen = frame.area();
                render(frame, state, &view_data);
            })
            .context("draw frame")?;
        view_data.screen = screen;

        let timeout = view_data
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));
        if !event::poll(timeout).context("poll event")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) => {
                let now = Instant::now();
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key, now) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                handle_mouse_event(state, &mut view_data, mouse, Instant::now());
            }
            _ => {}
        }
    }
}

fn reload<R: RosterRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let people = runtime.load_people().context("load people")?;
    let conditions = runtime.load_conditions().context("load health conditions")?;
    view_data.people.load(Arc::new(people));
    view_data.conditions.load(Arc::new(conditions));
    clamp_cursor(&mut view_data.people_ui, &view_data.people);
    clamp_cursor(&mut view_data.conditions_ui, &view_data.conditions);
    Ok(())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn process_timers(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    now: Instant,
) {
    let people_events = view_data.people.tick(now);
    let condition_events = view_data.conditions.tick(now);
    if !people_events.is_empty() {
        clamp_cursor(&mut view_data.people_ui, &view_data.people);
        report_table_events(state, view_data, internal_tx, &people_events);
    }
    if !condition_events.is_empty() {
        clamp_cursor(&mut view_data.conditions_ui, &view_data.conditions);
        report_table_events(state, view_data, internal_tx, &condition_events);
    }

    let facet_events = view_data.facet_picker.tick(now);
    relay_combo_announcements(&mut view_data.announcements, &facet_events);
    let status_events = view_data.status_picker.tick(now);
    relay_combo_announcements(&mut view_data.announcements, &status_events);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn report_table_events<C>(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[TableEvent<C>],
) {
    for event in events {
        match event {
            TableEvent::SortRejected(label) => {
                emit_status(state, view_data, internal_tx, format!("no column {label}"));
            }
            TableEvent::Announce(message) => {
                view_data.announcements.announce(message);
                emit_status(state, view_data, internal_tx, message.clone());
            }
            _ => {}
        }
    }
}

fn relay_combo_announcements(announcer: &mut impl Announcer, events: &[ComboEvent]) {
    for message in events.iter().filter_map(ComboEvent::announcement) {
        announcer.announce(message);
    }
}

fn handle_key_event<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    now: Instant,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        InputMode::Search => {
            handle_search_key(state, view_data, internal_tx, key, now);
            false
        }
        InputMode::Picker(kind) => {
            handle_picker_key(state, runtime, view_data, internal_tx, kind, key, now);
            false
        }
        InputMode::Create => {
            handle_create_key(state, runtime, view_data, internal_tx, key);
            false
        }
        InputMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key, now),
    }
}

fn handle_nav_key<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    now: Instant,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Tab, _) => {
            state.dispatch(AppCommand::NextTab);
        }
        (KeyCode::BackTab, _) => {
            state.dispatch(AppCommand::PrevTab);
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => move_row(state, view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_row(state, view_data, -1),
        (KeyCode::Char('h') | KeyCode::Left, _) => move_col(state, view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_col(state, view_data, 1),
        (KeyCode::Char('s'), KeyModifiers::NONE) => match state.active_tab {
            TabKind::People => {
                let column = current_column::<Person>(view_data.people_ui);
                let events = view_data.people.dispatch(TableCommand::CycleSort(column), now);
                report_table_events(state, view_data, internal_tx, &events);
            }
            TabKind::HealthConditions => {
                let column = current_column::<HealthCondition>(view_data.conditions_ui);
                let events = view_data
                    .conditions
                    .dispatch(TableCommand::CycleSort(column), now);
                report_table_events(state, view_data, internal_tx, &events);
            }
        },
        (KeyCode::Char('S'), _) => match state.active_tab {
            TabKind::People => {
                let events = view_data.people.dispatch(TableCommand::ClearSort, now);
                report_table_events(state, view_data, internal_tx, &events);
            }
            TabKind::HealthConditions => {
                let events = view_data.conditions.dispatch(TableCommand::ClearSort, now);
                report_table_events(state, view_data, internal_tx, &events);
            }
        },
        (KeyCode::Char('/'), _) => {
            state.dispatch(AppCommand::StartSearch);
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => open_facet_picker(state, view_data, now),
        (KeyCode::Char('m'), KeyModifiers::NONE) => {
            if state.active_tab != TabKind::People {
                emit_status(state, view_data, internal_tx, "status change only on people");
                return false;
            }
            let Some(row) = selected_person(view_data) else {
                emit_status(state, view_data, internal_tx, "no person selected");
                return false;
            };
            let (id, status) = (row.person.id, normalize_status(&row.person.status));
            view_data.status_target = Some(id);
            view_data
                .status_picker
                .set_options(status_options(&view_data.people.facet_values()));
            view_data.status_picker.set_selected([status]);
            let events = view_data.status_picker.dispatch(ComboCommand::Open, now);
            relay_combo_announcements(&mut view_data.announcements, &events);
            state.dispatch(AppCommand::OpenPicker(PickerKind::ChangeStatus));
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            if state.active_tab != TabKind::People {
                emit_status(state, view_data, internal_tx, "create only on people");
                return false;
            }
            view_data.create_input.clear();
            state.dispatch(AppCommand::StartCreate);
        }
        (KeyCode::Char('D'), _) => delete_selected(state, runtime, view_data, internal_tx),
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ClearStatus);
        }
        _ => {}
    }
    false
}

fn handle_search_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    now: Instant,
) {
    let current = match state.active_tab {
        TabKind::People => view_data.people.input_query().to_owned(),
        TabKind::HealthConditions => view_data.conditions.input_query().to_owned(),
    };

    let command = match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ExitToNav);
            Some(QueryEdit::Clear)
        }
        (KeyCode::Enter, _) => {
            state.dispatch(AppCommand::ExitToNav);
            Some(QueryEdit::ApplyNow)
        }
        (KeyCode::Backspace, _) => {
            let mut next = current;
            next.pop();
            if next.is_empty() {
                Some(QueryEdit::Clear)
            } else {
                Some(QueryEdit::Set(next))
            }
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(QueryEdit::Clear)
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            Some(QueryEdit::Set(format!("{current}{ch}")))
        }
        _ => None,
    };

    let Some(command) = command else {
        return;
    };
    match state.active_tab {
        TabKind::People => {
            let events = view_data.people.dispatch(command.into_table_command(), now);
            clamp_cursor(&mut view_data.people_ui, &view_data.people);
            report_table_events(state, view_data, internal_tx, &events);
        }
        TabKind::HealthConditions => {
            let events = view_data
                .conditions
                .dispatch(command.into_table_command(), now);
            clamp_cursor(&mut view_data.conditions_ui, &view_data.conditions);
            report_table_events(state, view_data, internal_tx, &events);
        }
    }
}

/// Search edits, independent of which table receives them.
enum QueryEdit {
    Set(String),
    Clear,
    ApplyNow,
}

impl QueryEdit {
    fn into_table_command<C>(self) -> TableCommand<C> {
        match self {
            Self::Set(query) => TableCommand::SetQuery(query),
            Self::Clear => TableCommand::ClearQuery,
            Self::ApplyNow => TableCommand::ApplyQueryNow,
        }
    }
}

fn combo_command_for_key(key: KeyEvent) -> Option<ComboCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Some(ComboCommand::Dismiss(DismissReason::Escape)),
        (KeyCode::Tab | KeyCode::BackTab, _) => Some(ComboCommand::Dismiss(DismissReason::Tab)),
        (KeyCode::Down, _) => Some(ComboCommand::FocusNext),
        (KeyCode::Char('n'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ComboCommand::FocusNext)
        }
        (KeyCode::Up, _) => Some(ComboCommand::FocusPrev),
        (KeyCode::Char('p'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ComboCommand::FocusPrev)
        }
        (KeyCode::Enter, _) => Some(ComboCommand::Commit),
        (KeyCode::Backspace, _) => Some(ComboCommand::Backspace),
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ComboCommand::ClearQuery)
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            Some(ComboCommand::Type(ch))
        }
        _ => None,
    }
}

fn handle_picker_key<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PickerKind,
    key: KeyEvent,
    now: Instant,
) {
    let Some(command) = combo_command_for_key(key) else {
        return;
    };
    let events = match kind {
        PickerKind::StatusFacet => view_data.facet_picker.dispatch(command, now),
        PickerKind::ChangeStatus => view_data.status_picker.dispatch(command, now),
    };
    apply_picker_events(state, runtime, view_data, internal_tx, kind, &events, now);
}

fn handle_mouse_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    mouse: MouseEvent,
    now: Instant,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let InputMode::Picker(kind) = state.mode else {
        return;
    };
    let area = picker_area(view_data.screen);
    let inside = area.contains(Position::new(mouse.column, mouse.row));
    let picker = match kind {
        PickerKind::StatusFacet => &mut view_data.facet_picker,
        PickerKind::ChangeStatus => &mut view_data.status_picker,
    };
    let target = inside.then(|| picker.list_region());
    let events = picker.dispatch(ComboCommand::PointerDown(target), now);
    relay_combo_announcements(&mut view_data.announcements, &events);
    if events
        .iter()
        .any(|event| matches!(event, ComboEvent::Closed(_)))
    {
        state.dispatch(AppCommand::ExitToNav);
    }
}

fn apply_picker_events<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PickerKind,
    events: &[ComboEvent],
    now: Instant,
) {
    relay_combo_announcements(&mut view_data.announcements, events);

    for event in events {
        match (kind, event) {
            (PickerKind::StatusFacet, ComboEvent::SelectionChanged(values)) => {
                match state.active_tab {
                    TabKind::People => {
                        let table_events = view_data
                            .people
                            .dispatch(TableCommand::SetFacets(values.clone()), now);
                        clamp_cursor(&mut view_data.people_ui, &view_data.people);
                        report_table_events(state, view_data, internal_tx, &table_events);
                    }
                    TabKind::HealthConditions => {
                        let table_events = view_data
                            .conditions
                            .dispatch(TableCommand::SetFacets(values.clone()), now);
                        clamp_cursor(&mut view_data.conditions_ui, &view_data.conditions);
                        report_table_events(state, view_data, internal_tx, &table_events);
                    }
                }
            }
            (PickerKind::ChangeStatus, ComboEvent::Committed) => {
                let status = view_data.status_picker.selected().first().cloned();
                if let (Some(person_id), Some(status)) = (view_data.status_target.take(), status)
                {
                    change_status(state, runtime, view_data, internal_tx, person_id, &status);
                }
            }
            _ => {}
        }
    }

    let picker_open = match kind {
        PickerKind::StatusFacet => view_data.facet_picker.is_open(),
        PickerKind::ChangeStatus => view_data.status_picker.is_open(),
    };
    if !picker_open {
        view_data.status_target = None;
        state.dispatch(AppCommand::ExitToNav);
    }
}

fn open_facet_picker(state: &mut AppState, view_data: &mut ViewData, now: Instant) {
    let (values, selected) = match state.active_tab {
        TabKind::People => {
            let mut values: BTreeSet<String> =
                KNOWN_STATUSES.iter().map(|status| (*status).to_owned()).collect();
            values.extend(view_data.people.facet_values());
            (values.into_iter().collect::<Vec<_>>(), view_data.people.facets())
        }
        TabKind::HealthConditions => (
            view_data.conditions.facet_values(),
            view_data.conditions.facets(),
        ),
    };
    view_data.facet_picker.set_options(
        values
            .iter()
            .map(|value| ComboOption::new(value.clone(), title_case(value)))
            .collect(),
    );
    view_data.facet_picker.set_selected(selected);
    let events = view_data.facet_picker.dispatch(ComboCommand::Open, now);
    relay_combo_announcements(&mut view_data.announcements, &events);
    state.dispatch(AppCommand::OpenPicker(PickerKind::StatusFacet));
}

fn handle_create_key<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.create_input.clear();
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Backspace, _) => {
            view_data.create_input.pop();
        }
        (KeyCode::Enter, _) => {
            let input = std::mem::take(&mut view_data.create_input);
            state.dispatch(AppCommand::ExitToNav);
            match new_person_from_input(&input) {
                Some(person) => create_person(state, runtime, view_data, internal_tx, &person),
                None => emit_status(state, view_data, internal_tx, "name required"),
            }
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            view_data.create_input.push(ch);
        }
        _ => {}
    }
}

/// First word is the first name; the rest is the surname.
fn new_person_from_input(input: &str) -> Option<NewPerson> {
    let mut words = input.split_whitespace();
    let first_name = words.next()?.to_owned();
    let surname = words.collect::<Vec<_>>().join(" ");
    Some(NewPerson {
        title: None,
        first_name,
        surname,
        relationship: String::new(),
        date_of_birth: None,
        email: String::new(),
        status: "prospect".to_owned(),
    })
}

fn change_status<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    person_id: PersonId,
    status: &str,
) {
    let key = ActionKey::row(person_id.get(), ActionKind::ChangeStatus);
    let outcome = view_data
        .actions
        .run(key, &format!("status set to {status}"), || {
            runtime.change_status(person_id, status)
        });
    finish_action(state, runtime, view_data, internal_tx, outcome);
}

fn delete_selected<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.active_tab != TabKind::People {
        emit_status(state, view_data, internal_tx, "delete only on people");
        return;
    }
    let Some(row) = selected_person(view_data) else {
        emit_status(state, view_data, internal_tx, "no person selected");
        return;
    };
    let (person_id, name) = (row.person.id, row.full_name.clone());
    let key = ActionKey::row(person_id.get(), ActionKind::Delete);
    let outcome = view_data
        .actions
        .run(key, &format!("deleted {name}"), || runtime.delete_person(person_id));
    finish_action(state, runtime, view_data, internal_tx, outcome);
}

fn create_person<R: RosterRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    person: &NewPerson,
) {
    let label = format!("created {} {}", person.first_name, person.surname);
    let outcome = view_data
        .actions
        .run(ActionKey::create(), label.trim_end(), || runtime.create_person(person));
    finish_action(state, runtime, view_data, internal_tx, outcome);
}

fn finish_action<R: RosterRuntime, T>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    outcome: ActionOutcome<T>,
) {
    let notice = outcome.notice().clone();
    if outcome.needs_reload()
        && let Err(error) = reload(runtime, view_data)
    {
        emit_status(state, view_data, internal_tx, format!("reload failed: {error:#}"));
        return;
    }
    if notice.level == NoticeLevel::Error {
        tracing::warn!(message = %notice.message, "action failed");
    }
    view_data.announcements.announce(&notice.message);
    emit_status(state, view_data, internal_tx, notice.message);
}

fn selected_person(view_data: &ViewData) -> Option<&roster_app::EnrichedPerson> {
    view_data
        .people
        .rows()
        .get(view_data.people_ui.selected_row)
        .copied()
}

fn current_column<Raw>(ui: TableUiState) -> ColumnOf<Raw>
where
    Raw: Enrich,
    Raw::Output: TableRecord,
{
    let columns = <ColumnOf<Raw> as TableColumn>::ALL;
    columns[ui.selected_col.min(columns.len().saturating_sub(1))]
}

fn move_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let (ui, count) = match state.active_tab {
        TabKind::People => (&mut view_data.people_ui, view_data.people.row_count()),
        TabKind::HealthConditions => (
            &mut view_data.conditions_ui,
            view_data.conditions.row_count(),
        ),
    };
    ui.selected_row = ui
        .selected_row
        .saturating_add_signed(delta)
        .min(count.saturating_sub(1));
}

fn move_col(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let (ui, count) = match state.active_tab {
        TabKind::People => (&mut view_data.people_ui, PersonColumn::ALL.len()),
        TabKind::HealthConditions => (&mut view_data.conditions_ui, ConditionColumn::ALL.len()),
    };
    ui.selected_col = ui
        .selected_col
        .saturating_add_signed(delta)
        .min(count.saturating_sub(1));
}

fn clamp_cursor<Raw>(ui: &mut TableUiState, view: &TableView<Raw>)
where
    Raw: Enrich,
    Raw::Output: TableRecord,
{
    ui.selected_row = ui.selected_row.min(view.row_count().saturating_sub(1));
}

fn status_options(extra: &[String]) -> Vec<ComboOption> {
    let mut values: Vec<String> = KNOWN_STATUSES
        .iter()
        .map(|status| (*status).to_owned())
        .collect();
    for value in extra {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
        .into_iter()
        .map(|value| {
            let label = title_case(&value);
            ComboOption::new(value, label)
        })
        .collect()
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("roster").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::People => render_table(
            frame,
            layout[1],
            state.active_tab.label(),
            &view_data.people,
            view_data.people_ui,
        ),
        TabKind::HealthConditions => render_table(
            frame,
            layout[1],
            state.active_tab.label(),
            &view_data.conditions,
            view_data.conditions_ui,
        ),
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(picker) = view_data.active_picker(state) {
        let area = picker_area(frame.area());
        frame.render_widget(Clear, area);
        let title = match state.mode {
            InputMode::Picker(PickerKind::ChangeStatus) => "change status",
            _ => "filter status",
        };
        let overlay = Paragraph::new(picker_lines(picker, &view_data.announcements))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }
}

fn tab_title(tab: TabKind, view_data: &ViewData) -> String {
    let (shown, total) = match tab {
        TabKind::People => (view_data.people.row_count(), view_data.people.total_count()),
        TabKind::HealthConditions => (
            view_data.conditions.row_count(),
            view_data.conditions.total_count(),
        ),
    };
    if shown == total {
        format!("{} ({total})", tab.label())
    } else {
        format!("{} ({shown}/{total})", tab.label())
    }
}

fn header_label<C: TableColumn>(column: C, sort: Option<roster_app::SortSpec<C>>) -> String {
    match sort {
        Some(spec) if spec.column == column => {
            let arrow = match spec.direction {
                SortDirection::Asc => SORT_ARROW_ASC,
                SortDirection::Desc => SORT_ARROW_DESC,
            };
            format!("{} {arrow}", column.label())
        }
        _ => column.label().to_owned(),
    }
}

fn render_table<Raw>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    view: &TableView<Raw>,
    ui: TableUiState,
) where
    Raw: Enrich,
    Raw::Output: TableRecord,
{
    let columns = <ColumnOf<Raw> as TableColumn>::ALL;
    let widths = vec![Constraint::Min(8); columns.len().max(1)];

    let header_cells = columns.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if index == ui.selected_col {
            style = style.fg(Color::Cyan);
        }
        Cell::from(header_label(*column, view.sort())).style(style)
    });
    let header = Row::new(header_cells);

    let rows = view.rows();
    let body = rows.iter().enumerate().map(|(row_index, row)| {
        let selected_row = row_index == ui.selected_row;
        let cells = columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| {
                let mut style = Style::default();
                if row.is_inactive() {
                    style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column_index == ui.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(row.display(*column)).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let mut block_title = title.to_owned();
    if !view.applied_query().trim().is_empty() {
        block_title.push_str(&format!(" /{}", view.applied_query()));
    }
    let facets = view.facets();
    if !facets.is_empty() {
        block_title.push_str(&format!(" [{}]", facets.join(", ")));
    }

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(block_title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn picker_lines<'a>(picker: &'a Combobox, announcements: &'a AnnouncementLog) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(format!("> {}", picker.query()))];
    if !picker.selected().is_empty() {
        let chips = picker
            .selected()
            .iter()
            .map(|value| picker.label_for(value))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(format!("selected: {chips}")));
    }
    for (position, option) in picker.candidates().enumerate() {
        let mark = if picker.is_selected(&option.value) {
            "[x]"
        } else {
            "[ ]"
        };
        let line = Line::from(format!("{mark} {}", option.label));
        if picker.focused() == Some(position) {
            lines.push(line.style(Style::default().fg(Color::Black).bg(Color::Cyan)));
        } else {
            lines.push(line);
        }
    }
    if let Some(message) = announcements.last() {
        lines.push(Line::from(message.to_owned()).style(Style::default().fg(Color::DarkGray)));
    }
    lines
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let default = "j/k/h/l | s/S sort | / search | f filter | m status | a add | D delete | q";
    match state.mode {
        InputMode::Search => {
            let query = match state.active_tab {
                TabKind::People => view_data.people.input_query(),
                TabKind::HealthConditions => view_data.conditions.input_query(),
            };
            format!("SEARCH | /{query}")
        }
        InputMode::Create => format!("NEW | name: {}", view_data.create_input),
        InputMode::Picker(_) => "PICK | up/down enter esc".to_owned(),
        InputMode::Nav => match &state.status_line {
            Some(status) => format!("NAV | {status} | {default}"),
            None => format!("NAV | {default}"),
        },
    }
}

fn picker_area(screen: Rect) -> Rect {
    centered_rect(50, 60, screen)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
