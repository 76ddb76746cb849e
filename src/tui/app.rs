use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::db::Backend;
use crate::forms::contract::ContractForm;
use crate::forms::database::DatabasePanel;
use crate::forms::player::PlayerForm;
use crate::forms::statistics::{StatisticsForm, COUNTER_LABELS};
use crate::forms::utilities::UtilitiesPanel;
use crate::forms::{Confirmation, Destructive, Feedback, Step};
use crate::procedure::Procedure;

// ---------------------------------------------------------------------------
// Tabs and focusable items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Player,
    Statistics,
    Contract,
    Utilities,
    Database,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Player,
        Tab::Statistics,
        Tab::Contract,
        Tab::Utilities,
        Tab::Database,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Player => "Player Management",
            Tab::Statistics => "Statistics Management",
            Tab::Contract => "Contract Management",
            Tab::Utilities => "Utilities",
            Tab::Database => "Database Management",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Player => 0,
            Tab::Statistics => 1,
            Tab::Contract => 2,
            Tab::Utilities => 3,
            Tab::Database => 4,
        }
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Tab::ALL.len() as isize;
        let i = (self.index() as isize + delta).rem_euclid(len);
        Tab::ALL[i as usize]
    }

    fn field_labels(self) -> &'static [&'static str] {
        const PLAYER: &[&str] = &[
            "First Name",
            "Last Name",
            "Date of Birth (YYYY-MM-DD)",
            "Nationality",
            "Main Position",
            "Estimated Market Price",
            "Player ID (for updating)",
        ];
        const STATISTICS: &[&str] = &[
            "Player ID",
            COUNTER_LABELS[0],
            COUNTER_LABELS[1],
            COUNTER_LABELS[2],
            COUNTER_LABELS[3],
            COUNTER_LABELS[4],
            COUNTER_LABELS[5],
            COUNTER_LABELS[6],
            COUNTER_LABELS[7],
        ];
        const CONTRACT: &[&str] = &[
            "Player ID",
            "Sign Date (YYYY-MM-DD)",
            "End Date (YYYY-MM-DD)",
            "Monthly Salary",
        ];
        match self {
            Tab::Player => PLAYER,
            Tab::Statistics => STATISTICS,
            Tab::Contract => CONTRACT,
            Tab::Utilities => &["Last Name"],
            Tab::Database => &["Table Name"],
        }
    }

    fn buttons(self) -> &'static [Action] {
        match self {
            Tab::Player => &[Action::AddPlayer, Action::UpdatePlayer],
            Tab::Statistics => &[Action::UpdateStatistics],
            Tab::Contract => &[Action::UpdateContract],
            Tab::Utilities => &[
                Action::Search,
                Action::DeletePlayer,
                Action::DeleteSelected,
                Action::Display(Procedure::DisplayPlayers),
                Action::Display(Procedure::DisplayContracts),
                Action::Display(Procedure::DisplayStatistics),
                Action::Display(Procedure::DisplayAvgPerformance),
            ],
            Tab::Database => &[
                Action::CleanTable,
                Action::CleanAllTables,
                Action::DropDatabase,
            ],
        }
    }

    /// Focus order: fields, then buttons, then the results grid.
    pub fn items(self) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .field_labels()
            .iter()
            .enumerate()
            .map(|(index, label)| Item::Field { index, label })
            .collect();
        items.extend(self.buttons().iter().copied().map(Item::Button));
        if self == Tab::Utilities {
            items.push(Item::Grid);
        }
        items
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddPlayer,
    UpdatePlayer,
    UpdateStatistics,
    UpdateContract,
    Search,
    DeletePlayer,
    DeleteSelected,
    Display(Procedure),
    CleanTable,
    CleanAllTables,
    DropDatabase,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::AddPlayer => "Add Player",
            Action::UpdatePlayer => "Update Player",
            Action::UpdateStatistics => "Update Statistics",
            Action::UpdateContract => "Update Contract",
            Action::Search => "Search by Last Name",
            Action::DeletePlayer => "Delete Player",
            Action::DeleteSelected => "Delete Selected",
            Action::Display(Procedure::DisplayPlayers) => "Display Players",
            Action::Display(Procedure::DisplayContracts) => "Display Contracts",
            Action::Display(Procedure::DisplayStatistics) => "Display Statistics",
            Action::Display(Procedure::DisplayAvgPerformance) => "Display Avg Performance",
            Action::Display(_) => "Display",
            Action::CleanTable => "Clean Table",
            Action::CleanAllTables => "Clean All Tables",
            Action::DropDatabase => "Drop Database",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Field { index: usize, label: &'static str },
    Button(Action),
    Grid,
}

// ---------------------------------------------------------------------------
// Popups and requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Message(Feedback),
    Confirm(Destructive),
}

/// Work the run loop has to await on behalf of a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Run(Action),
    Resolve(Destructive, Confirmation),
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct App {
    pub tab: TabState,
    pub player: PlayerForm,
    pub statistics: StatisticsForm,
    pub contract: ContractForm,
    pub utilities: UtilitiesPanel,
    pub database: DatabasePanel,
    pub popup: Option<Popup>,
    pub busy: bool,
    quit: bool,
}

/// Active tab plus the focused item on each tab.
#[derive(Debug, Default)]
pub struct TabState {
    active: usize,
    focus: [usize; 5],
}

impl TabState {
    pub fn active(&self) -> Tab {
        Tab::ALL[self.active]
    }

    pub fn focus(&self) -> usize {
        self.focus[self.active]
    }

    fn select(&mut self, tab: Tab) {
        self.active = tab.index();
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.active().items().len() as isize;
        let cur = self.focus[self.active] as isize;
        self.focus[self.active] = (cur + delta).rem_euclid(len) as usize;
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn focused_item(&self) -> Item {
        let items = self.tab.active().items();
        items[self.tab.focus().min(items.len() - 1)]
    }

    pub fn field(&self, tab: Tab, index: usize) -> &str {
        match (tab, index) {
            (Tab::Player, 0) => &self.player.first_name,
            (Tab::Player, 1) => &self.player.last_name,
            (Tab::Player, 2) => &self.player.date_of_birth,
            (Tab::Player, 3) => &self.player.nationality,
            (Tab::Player, 4) => &self.player.main_position,
            (Tab::Player, 5) => &self.player.market_price,
            (Tab::Player, 6) => &self.player.player_id,
            (Tab::Statistics, 0) => &self.statistics.player_id,
            (Tab::Statistics, i) => self.statistics.counters.get(i - 1).map_or("", String::as_str),
            (Tab::Contract, 0) => &self.contract.player_id,
            (Tab::Contract, 1) => &self.contract.sign_date,
            (Tab::Contract, 2) => &self.contract.end_date,
            (Tab::Contract, 3) => &self.contract.monthly_salary,
            (Tab::Utilities, 0) => &self.utilities.last_name,
            (Tab::Database, 0) => &self.database.table_name,
            _ => "",
        }
    }

    fn field_mut(&mut self, tab: Tab, index: usize) -> Option<&mut String> {
        let field = match (tab, index) {
            (Tab::Player, 0) => &mut self.player.first_name,
            (Tab::Player, 1) => &mut self.player.last_name,
            (Tab::Player, 2) => &mut self.player.date_of_birth,
            (Tab::Player, 3) => &mut self.player.nationality,
            (Tab::Player, 4) => &mut self.player.main_position,
            (Tab::Player, 5) => &mut self.player.market_price,
            (Tab::Player, 6) => &mut self.player.player_id,
            (Tab::Statistics, 0) => &mut self.statistics.player_id,
            (Tab::Statistics, i) => self.statistics.counters.get_mut(i - 1)?,
            (Tab::Contract, 0) => &mut self.contract.player_id,
            (Tab::Contract, 1) => &mut self.contract.sign_date,
            (Tab::Contract, 2) => &mut self.contract.end_date,
            (Tab::Contract, 3) => &mut self.contract.monthly_salary,
            (Tab::Utilities, 0) => &mut self.utilities.last_name,
            (Tab::Database, 0) => &mut self.database.table_name,
            _ => return None,
        };
        Some(field)
    }

    /// Applies a key press. Returns work for the run loop when the key
    /// triggers a backend action or answers a confirmation.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.quit = true;
            return None;
        }

        if let Some(popup) = self.popup.take() {
            return self.handle_popup_key(popup, key);
        }

        match key.code {
            KeyCode::F(n @ 1..=5) => self.tab.select(Tab::ALL[usize::from(n) - 1]),
            KeyCode::Right if ctrl => self.tab.select(self.tab.active().offset(1)),
            KeyCode::Left if ctrl => self.tab.select(self.tab.active().offset(-1)),
            KeyCode::Tab => self.tab.move_focus(1),
            KeyCode::BackTab => self.tab.move_focus(-1),
            KeyCode::Down => match self.focused_item() {
                Item::Grid => self.utilities.select_next(),
                _ => self.tab.move_focus(1),
            },
            KeyCode::Up => match self.focused_item() {
                Item::Grid => self.utilities.select_prev(),
                _ => self.tab.move_focus(-1),
            },
            KeyCode::Enter => match self.focused_item() {
                Item::Button(action) => return Some(Request::Run(action)),
                Item::Field { .. } => self.tab.move_focus(1),
                Item::Grid => {}
            },
            KeyCode::Backspace => {
                if let Item::Field { index, .. } = self.focused_item() {
                    if let Some(field) = self.field_mut(self.tab.active(), index) {
                        field.pop();
                    }
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Item::Field { index, .. } = self.focused_item() {
                    if let Some(field) = self.field_mut(self.tab.active(), index) {
                        field.push(c);
                    }
                }
            }
            _ => {}
        }
        None
    }

    fn handle_popup_key(&mut self, popup: Popup, key: KeyEvent) -> Option<Request> {
        match popup {
            Popup::Message(_) => {
                if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.popup = Some(popup);
                }
                None
            }
            Popup::Confirm(action) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    Some(Request::Resolve(action, Confirmation::Yes))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(Request::Resolve(action, Confirmation::No))
                }
                _ => {
                    self.popup = Some(Popup::Confirm(action));
                    None
                }
            },
        }
    }

    /// Runs a request against the backend and records what to show.
    pub async fn perform(&mut self, backend: &dyn Backend, request: Request) {
        debug!(?request, "performing");
        match request {
            Request::Run(action) => {
                let step = match action {
                    Action::AddPlayer => Step::Done(self.player.add(backend).await),
                    Action::UpdatePlayer => Step::Done(self.player.update(backend).await),
                    Action::UpdateStatistics => Step::Done(self.statistics.update(backend).await),
                    Action::UpdateContract => Step::Done(self.contract.update(backend).await),
                    Action::Search => match self.utilities.search(backend).await {
                        Some(fb) => Step::Done(fb),
                        None => return,
                    },
                    Action::Display(procedure) => {
                        match self.utilities.show(backend, procedure).await {
                            Some(fb) => Step::Done(fb),
                            None => return,
                        }
                    }
                    Action::DeletePlayer => self.utilities.delete_player(),
                    Action::DeleteSelected => self.utilities.delete_selected(),
                    Action::CleanTable => self.database.clean_table(),
                    Action::CleanAllTables => self.database.clean_all_tables(),
                    Action::DropDatabase => self.database.drop_database(),
                };
                match step {
                    Step::Done(fb) => self.notify(fb),
                    Step::Confirm(action) => self.popup = Some(Popup::Confirm(action)),
                }
            }
            Request::Resolve(action, answer) => {
                let fb = action.execute(backend, answer).await;
                if let Destructive::DeleteById { row, .. } = action {
                    if fb.is_success() {
                        self.utilities.remove_row(row);
                    }
                }
                self.notify(fb);
            }
        }
    }

    fn notify(&mut self, fb: Feedback) {
        if fb != Feedback::Cancelled {
            self.popup = Some(Popup::Message(fb));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::testing::RecordingBackend;
    use crate::types::Value;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Moves focus to the button with `action` on the current tab.
    fn focus_button(app: &mut App, action: Action) {
        for _ in 0..app.tab.active().items().len() {
            if app.focused_item() == Item::Button(action) {
                return;
            }
            app.handle_key(key(KeyCode::Tab));
        }
        panic!("no {action:?} button on {:?}", app.tab.active());
    }

    #[test]
    fn tabs_follow_function_keys() {
        let mut app = App::new();
        assert_eq!(app.tab.active(), Tab::Player);
        app.handle_key(key(KeyCode::F(4)));
        assert_eq!(app.tab.active(), Tab::Utilities);
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(app.tab.active(), Tab::Database);
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(app.tab.active(), Tab::Player);
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut app = App::new();
        type_text(&mut app, "Gavi");
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Down));
        type_text(&mut app, "Paez");
        assert_eq!(app.player.first_name, "Gav");
        assert_eq!(app.player.last_name, "Paez");
    }

    #[test]
    fn ctrl_q_quits() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert!(app.player.first_name.is_empty());
    }

    #[test]
    fn enter_on_button_requests_the_action() {
        let mut app = App::new();
        focus_button(&mut app, Action::UpdatePlayer);
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Request::Run(Action::UpdatePlayer))
        );
    }

    #[tokio::test]
    async fn invalid_add_pops_a_warning_without_calls() {
        let backend = RecordingBackend::new();
        let mut app = App::new();
        focus_button(&mut app, Action::AddPlayer);
        let req = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.perform(&backend, req).await;

        assert!(matches!(app.popup, Some(Popup::Message(Feedback::Warning(_)))));
        assert!(backend.calls().is_empty());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.popup.is_none());
    }

    #[tokio::test]
    async fn drop_database_declined_then_confirmed() {
        let backend = RecordingBackend::new();
        let mut app = App::new();
        app.handle_key(key(KeyCode::F(5)));
        focus_button(&mut app, Action::DropDatabase);

        let req = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.perform(&backend, req).await;
        assert_eq!(app.popup, Some(Popup::Confirm(Destructive::DropDatabase)));

        // Unrelated keys leave the question open.
        assert!(app.handle_key(key(KeyCode::Char('x'))).is_none());
        assert!(app.popup.is_some());

        let req = app.handle_key(key(KeyCode::Char('n'))).unwrap();
        app.perform(&backend, req).await;
        assert!(app.popup.is_none());
        assert_eq!(backend.drop_count(), 0);

        let req = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.perform(&backend, req).await;
        let req = app.handle_key(key(KeyCode::Char('y'))).unwrap();
        app.perform(&backend, req).await;
        assert_eq!(backend.drop_count(), 1);
        assert!(matches!(app.popup, Some(Popup::Message(Feedback::Info(_)))));
    }

    #[tokio::test]
    async fn delete_selected_removes_row_after_yes() {
        let rows = vec![
            vec![Value::Int(5), Value::Text("A".into()), Value::Text("B".into())],
            vec![Value::Int(6), Value::Text("C".into()), Value::Text("D".into())],
        ];
        let backend = RecordingBackend::new().with_rows(Procedure::DisplayContracts, rows);
        let mut app = App::new();
        app.handle_key(key(KeyCode::F(4)));

        app.perform(&backend, Request::Run(Action::Display(Procedure::DisplayContracts)))
            .await;
        assert!(app.popup.is_none());
        assert_eq!(app.utilities.results.as_ref().unwrap().rows.len(), 2);

        app.perform(&backend, Request::Run(Action::DeleteSelected)).await;
        assert_eq!(
            app.popup,
            Some(Popup::Confirm(Destructive::DeleteById { id: 5, row: 0 }))
        );
        let req = app.handle_key(key(KeyCode::Char('y'))).unwrap();
        app.perform(&backend, req).await;

        let table = app.utilities.results.as_ref().unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.row_id(0), Some("6"));
    }

    #[test]
    fn grid_focus_moves_selection() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::F(4)));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focused_item(), Item::Grid);
        // No results yet: arrows do nothing and focus stays on the grid.
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focused_item(), Item::Grid);
        assert_eq!(app.utilities.selected, None);
    }

    #[test]
    fn every_tab_has_fields_and_buttons() {
        for tab in Tab::ALL {
            let items = tab.items();
            assert!(matches!(items[0], Item::Field { index: 0, .. }), "{tab:?}");
            assert!(items.iter().any(|i| matches!(i, Item::Button(_))), "{tab:?}");
        }
        assert_eq!(Tab::Statistics.items().len(), 10);
    }
}
