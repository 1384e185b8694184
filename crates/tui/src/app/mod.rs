use std::time::Duration;

use api_types::expense::ExpenseByCategorySummary;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use insights::{
    CategoryChoice, ColorSource, Dashboard, DashboardEvent, DashboardView, ExpenseRecord,
    is_calendar_day,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub type Colors = Box<dyn ColorSource + Send>;

/// Length of a complete `YYYY-MM-DD` input.
const DATE_INPUT_LEN: usize = 10;

type FetchOutcome = std::result::Result<Vec<ExpenseByCategorySummary>, ClientError>;

/// A fetch result tagged with the generation of the request that produced it.
type FetchMessage = (u64, FetchOutcome);

/// Outer state of the screen.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Error(String),
    Ready(Box<Dashboard<Colors>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    StartDate,
    EndDate,
}

impl FilterField {
    fn next(self) -> Self {
        match self {
            Self::Category => Self::StartDate,
            Self::StartDate => Self::EndDate,
            Self::EndDate => Self::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Category => Self::EndDate,
            Self::StartDate => Self::Category,
            Self::EndDate => Self::StartDate,
        }
    }
}

/// What the filter controls currently show.
///
/// Date inputs hold raw typed text; only a complete valid day reaches the
/// dashboard, anything else counts as an empty bound.
#[derive(Debug)]
pub struct FilterForm {
    pub focus: FilterField,
    pub options: Vec<CategoryChoice>,
    pub category: usize,
    pub start_input: String,
    pub end_input: String,
}

impl FilterForm {
    fn new(categories: &[String]) -> Self {
        let mut options = vec![CategoryChoice::All];
        options.extend(
            categories
                .iter()
                .map(|name| CategoryChoice::named(name.as_str()))
                .filter(|choice| *choice != CategoryChoice::All),
        );

        Self {
            focus: FilterField::Category,
            options,
            category: 0,
            start_input: String::new(),
            end_input: String::new(),
        }
    }

    pub fn selected(&self) -> CategoryChoice {
        self.options
            .get(self.category)
            .cloned()
            .unwrap_or_default()
    }

    fn cycle_category(&mut self, forward: bool) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        self.category = if forward {
            (self.category + 1) % len
        } else {
            (self.category + len - 1) % len
        };
    }

    fn date_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FilterField::Category => None,
            FilterField::StartDate => Some(&mut self.start_input),
            FilterField::EndDate => Some(&mut self.end_input),
        }
    }

    /// Events that bring a dashboard in line with this form.
    fn events(&self) -> [DashboardEvent; 3] {
        [
            DashboardEvent::SelectCategory(self.selected()),
            DashboardEvent::SetStartDate(committed_day(&self.start_input)),
            DashboardEvent::SetEndDate(committed_day(&self.end_input)),
        ]
    }
}

fn committed_day(input: &str) -> String {
    if is_calendar_day(input) {
        input.to_string()
    } else {
        String::new()
    }
}

#[derive(Debug)]
pub struct AppState {
    pub load: LoadState,
    pub form: FilterForm,
    pub endpoint: String,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn dashboard(&self) -> Option<&Dashboard<Colors>> {
        match &self.load {
            LoadState::Ready(dashboard) => Some(&**dashboard),
            _ => None,
        }
    }

    fn dashboard_mut(&mut self) -> Option<&mut Dashboard<Colors>> {
        match &mut self.load {
            LoadState::Ready(dashboard) => Some(&mut **dashboard),
            _ => None,
        }
    }
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    fetch_tx: mpsc::UnboundedSender<FetchMessage>,
    fetch_rx: mpsc::UnboundedReceiver<FetchMessage>,
    /// Generation of the latest fetch; older results are dropped.
    fetch_generation: u64,
    frame_area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, &config.expenses_path, config.timeout())?;
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let state = AppState {
            load: LoadState::Loading,
            form: FilterForm::new(&config.categories),
            endpoint: client.endpoint().to_string(),
            last_refresh: None,
        };

        Ok(Self {
            config,
            client,
            state,
            fetch_tx,
            fetch_rx,
            fetch_generation: 0,
            frame_area: Rect::default(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.start_fetch();
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            let mut area = self.frame_area;
            terminal
                .draw(|frame| {
                    area = frame.area();
                    ui::render(frame, &self.state);
                })
                .map_err(|err| AppError::Terminal(err.to_string()))?;
            self.frame_area = area;

            while let Ok((generation, outcome)) = self.fetch_rx.try_recv() {
                self.finish_fetch(generation, outcome);
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Enters `Loading` and fetches the records on a background task.
    ///
    /// Each fetch bumps the generation; only results of the latest one are
    /// applied.
    fn start_fetch(&mut self) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        tracing::info!(
            "fetching expenses from {} (request {generation})",
            self.state.endpoint
        );
        self.state.load = LoadState::Loading;

        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch_expenses_by_category().await;
            if tx.send((generation, outcome)).is_err() {
                tracing::warn!("fetch finished after the app closed");
            }
        });
    }

    pub(crate) fn finish_fetch(&mut self, generation: u64, outcome: FetchOutcome) {
        if generation != self.fetch_generation {
            tracing::debug!(
                "dropping result of request {generation}, latest is {}",
                self.fetch_generation
            );
            return;
        }
        self.state.last_refresh = Some(Local::now());

        let rows = match outcome {
            Ok(rows) if rows.is_empty() => {
                tracing::warn!("expenses endpoint returned no data");
                self.state.load = LoadState::Error("no expenses returned".to_string());
                return;
            }
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!("failed to fetch expenses: {err}");
                self.state.load = LoadState::Error(err.to_string());
                return;
            }
        };

        tracing::info!("loaded {} expense rows", rows.len());
        let records = rows.into_iter().map(to_record).collect();
        let mut dashboard = Dashboard::new(records, self.config.colors.source(self.config.seed));
        for event in self.state.form.events() {
            dashboard.apply(event);
        }
        dashboard.subscribe(Box::new(|view: &DashboardView| {
            tracing::debug!(
                "view: {} categories, total {}, highlight {}",
                view.entries.len(),
                view.total,
                view.highlight.index()
            );
        }));
        self.state.load = LoadState::Ready(Box::new(dashboard));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let action = map_key(key);
        self.handle_action(action);
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Refresh => self.start_fetch(),
            AppAction::None => {}
            _ if self.state.dashboard().is_none() => {}
            AppAction::NextField => self.state.form.focus = self.state.form.focus.next(),
            AppAction::PrevField => self.state.form.focus = self.state.form.focus.prev(),
            AppAction::Left | AppAction::Right => {
                if self.state.form.focus == FilterField::Category {
                    self.state.form.cycle_category(action == AppAction::Right);
                    self.sync_filter();
                } else {
                    self.move_highlight(action == AppAction::Right);
                }
            }
            AppAction::Up => self.move_highlight(false),
            AppAction::Down => self.move_highlight(true),
            AppAction::Backspace => {
                if let Some(input) = self.state.form.date_input_mut() {
                    input.pop();
                } else {
                    self.state.form.category = 0;
                }
                self.sync_filter();
            }
            AppAction::Clear => {
                if let Some(input) = self.state.form.date_input_mut() {
                    input.clear();
                } else {
                    self.state.form.category = 0;
                }
                self.sync_filter();
            }
            AppAction::Input(ch) => self.handle_char(ch),
        }
    }

    fn handle_char(&mut self, ch: char) {
        match ch {
            '[' | 'k' => self.move_highlight(false),
            ']' | 'j' => self.move_highlight(true),
            'c' => self.handle_action(AppAction::Clear),
            '0'..='9' | '-' => {
                if let Some(input) = self.state.form.date_input_mut() {
                    if input.len() < DATE_INPUT_LEN {
                        input.push(ch);
                        self.sync_filter();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved) {
            return;
        }
        let Some(dashboard) = self.state.dashboard() else {
            return;
        };
        let Some(index) = ui::slice_at(self.frame_area, dashboard.view(), mouse.column, mouse.row)
        else {
            return;
        };
        if let Some(dashboard) = self.state.dashboard_mut() {
            dashboard.apply(DashboardEvent::HighlightSegment(index));
        }
    }

    fn move_highlight(&mut self, forward: bool) {
        if let Some(dashboard) = self.state.dashboard_mut() {
            if forward {
                dashboard.highlight_next();
            } else {
                dashboard.highlight_prev();
            }
        }
    }

    /// Pushes the form into the dashboard; unchanged values are no-ops.
    fn sync_filter(&mut self) {
        let events = self.state.form.events();
        if let Some(dashboard) = self.state.dashboard_mut() {
            for event in events {
                dashboard.apply(event);
            }
        }
    }
}

fn to_record(row: ExpenseByCategorySummary) -> ExpenseRecord {
    ExpenseRecord {
        category: row.category,
        amount: row.amount,
        date: row.date,
    }
}

#[cfg(test)]
mod tests {
    use insights::Total;

    use super::*;

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn rows() -> Vec<ExpenseByCategorySummary> {
        vec![
            ExpenseByCategorySummary::new("Office", "100", "2024-01-05"),
            ExpenseByCategorySummary::new("Office", "50", "2024-02-01"),
            ExpenseByCategorySummary::new("Salaries", "1000", "2024-01-10"),
        ]
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_action(AppAction::Input(ch));
        }
    }

    fn total(app: &App) -> Total {
        app.state.dashboard().unwrap().view().total
    }

    #[test]
    fn starts_loading_with_all_selected() {
        let app = app();
        assert!(matches!(app.state.load, LoadState::Loading));
        assert_eq!(app.state.form.selected(), CategoryChoice::All);
        assert_eq!(app.state.form.options.len(), 4);
    }

    #[test]
    fn empty_fetch_is_an_error() {
        let mut app = app();
        app.finish_fetch(0, Ok(Vec::new()));
        assert!(matches!(app.state.load, LoadState::Error(_)));
        assert!(app.state.last_refresh.is_some());
    }

    #[test]
    fn failed_fetch_is_an_error() {
        let mut app = app();
        app.finish_fetch(0, Err(ClientError::Server("boom".to_string())));
        match &app.state.load {
            LoadState::Error(message) => assert!(message.contains("boom")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn filter_keys_are_ignored_until_ready() {
        let mut app = app();
        app.handle_action(AppAction::NextField);
        assert_eq!(app.state.form.focus, FilterField::Category);
    }

    #[test]
    fn category_selector_cycles_and_filters() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));
        assert_eq!(total(&app), Total::Amount(1150));

        app.handle_action(AppAction::Right);
        assert_eq!(app.state.form.selected(), CategoryChoice::named("Office"));
        assert_eq!(total(&app), Total::Amount(150));

        app.handle_action(AppAction::Left);
        app.handle_action(AppAction::Left);
        assert_eq!(app.state.form.selected(), CategoryChoice::named("Salaries"));
        assert_eq!(total(&app), Total::Amount(1000));
    }

    #[test]
    fn dates_apply_only_when_complete_and_both_set() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));

        app.handle_action(AppAction::NextField);
        type_text(&mut app, "2024-01-01");
        assert_eq!(app.state.dashboard().unwrap().filter().start_date, "2024-01-01");
        assert_eq!(total(&app), Total::Amount(1150));

        app.handle_action(AppAction::NextField);
        type_text(&mut app, "2024-01-3");
        assert_eq!(app.state.dashboard().unwrap().filter().end_date, "");
        assert_eq!(total(&app), Total::Amount(1150));

        type_text(&mut app, "1");
        assert_eq!(total(&app), Total::Amount(1100));

        app.handle_action(AppAction::Backspace);
        assert_eq!(app.state.form.end_input, "2024-01-3");
        assert_eq!(total(&app), Total::Amount(1150));
    }

    #[test]
    fn date_input_is_capped() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));
        app.handle_action(AppAction::NextField);
        type_text(&mut app, "2024-01-019999");
        assert_eq!(app.state.form.start_input, "2024-01-01");
    }

    #[test]
    fn filter_survives_a_refetch() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));
        app.handle_action(AppAction::Right);

        app.finish_fetch(0, Ok(rows()));
        let dashboard = app.state.dashboard().unwrap();
        assert_eq!(
            dashboard.filter().selected_category,
            CategoryChoice::named("Office")
        );
        assert_eq!(dashboard.view().entries.len(), 1);
    }

    #[test]
    fn highlight_moves_and_clamps_after_narrowing() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));

        app.handle_action(AppAction::Down);
        assert_eq!(
            app.state.dashboard().unwrap().view().highlight.index(),
            1
        );

        app.handle_action(AppAction::Right);
        let view = app.state.dashboard().unwrap().view();
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.highlight.index(), 0);
    }

    #[tokio::test]
    async fn refresh_returns_to_loading() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));
        app.handle_action(AppAction::Refresh);
        assert!(matches!(app.state.load, LoadState::Loading));
    }

    #[tokio::test]
    async fn stale_fetch_results_are_dropped() {
        let mut app = app();
        app.finish_fetch(0, Ok(rows()));

        app.handle_action(AppAction::Refresh);
        app.handle_action(AppAction::Refresh);
        assert_eq!(app.fetch_generation, 2);

        let older = vec![ExpenseByCategorySummary::new("Office", "1", "2024-01-05")];
        app.finish_fetch(1, Ok(older));
        assert!(matches!(app.state.load, LoadState::Loading));

        app.finish_fetch(2, Ok(rows()));
        assert_eq!(total(&app), Total::Amount(1150));

        app.finish_fetch(1, Err(ClientError::NotFound));
        assert_eq!(total(&app), Total::Amount(1150));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = app();
        app.handle_action(AppAction::Quit);
        assert!(app.should_quit);
    }
}
