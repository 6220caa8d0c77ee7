use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use treadline_core::analytics::AnalyticsSnapshot;
use treadline_core::domain::{LeadId, LeadStatus, NoteType};
use treadline_core::dto::{LeadDetailDto, LeadListItemDto};
use treadline_core::filter::{parse_filter, LeadFilter};

use crate::actions::Action;

const LIST_EMPTY: &str = "No leads match. Press '/' to change the filter.";
const NOTE_TYPES: [&str; 4] = ["note", "call", "email", "meeting"];

#[derive(Debug, Clone)]
pub enum Mode {
    List,
    FilterEditing,
    Detail(LeadId),
    Stats,
    ModalStatus(StatusPicker),
    ModalAddNote(NoteForm),
    Confirm(ConfirmState),
}

#[derive(Debug, Clone)]
pub struct App {
    pub mode: Mode,
    pub show_help: bool,
    pub should_quit: bool,
    pub filter_input: String,
    pub filter: Option<LeadFilter>,
    pub filter_error: Option<String>,
    pub leads: Vec<LeadListItemDto>,
    pub selected: usize,
    pub detail: Option<LeadDetailDto>,
    pub detail_scroll: usize,
    pub stats: Option<AnalyticsSnapshot>,
    pub analytics_months: usize,
    pub notify_on_approval: bool,
    pub status: Option<String>,
    pub error: Option<String>,
    actions: VecDeque<Action>,
}

impl App {
    pub fn new(analytics_months: usize, notify_on_approval: bool) -> Self {
        let mut app = Self {
            mode: Mode::List,
            show_help: false,
            should_quit: false,
            filter_input: String::new(),
            filter: None,
            filter_error: None,
            leads: Vec::new(),
            selected: 0,
            detail: None,
            detail_scroll: 0,
            stats: None,
            analytics_months,
            notify_on_approval,
            status: None,
            error: None,
            actions: VecDeque::new(),
        };
        app.enqueue(Action::LoadList);
        app
    }

    /// Applies a filter passed on the command line before the first load.
    pub fn with_initial_filter(mut self, raw: &str) -> Result<Self, String> {
        self.filter_input = raw.to_string();
        if !raw.trim().is_empty() {
            self.filter = Some(parse_filter(raw).map_err(|err| err.to_string())?);
        }
        Ok(self)
    }

    pub fn enqueue(&mut self, action: Action) {
        if action.is_reload() && self.actions.contains(&action) {
            return;
        }
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    /// Queues reloads for whatever the current view shows. Called when the
    /// store reports a change.
    pub fn refresh_views(&mut self) {
        self.enqueue(Action::LoadList);
        match &self.mode {
            Mode::Detail(id) => {
                let id = *id;
                self.enqueue(Action::LoadDetail(id));
            }
            Mode::Stats => self.enqueue(Action::LoadStats),
            _ => {}
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn selected_lead_id(&self) -> Option<LeadId> {
        self.leads.get(self.selected).map(|lead| lead.id)
    }

    pub fn apply_list(&mut self, items: Vec<LeadListItemDto>) {
        let keep = self.selected_lead_id();
        self.leads = items;
        if let Some(target) = keep {
            if let Some(pos) = self.leads.iter().position(|item| item.id == target) {
                self.selected = pos;
            }
        }
        if self.selected >= self.leads.len() {
            self.selected = self.leads.len().saturating_sub(1);
        }
    }

    pub fn apply_detail(&mut self, detail: LeadDetailDto) {
        let same_lead = self.detail.as_ref().map(|current| current.id) == Some(detail.id);
        if !same_lead {
            self.detail_scroll = 0;
        }
        self.detail = Some(detail);
    }

    pub fn apply_stats(&mut self, snapshot: AnalyticsSnapshot) {
        self.stats = Some(snapshot);
    }

    pub fn empty_hint(&self) -> &'static str {
        LIST_EMPTY
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let typing = matches!(self.mode, Mode::FilterEditing | Mode::ModalAddNote(_));
        if !typing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                    return;
                }
                _ => {}
            }
        }

        let mut mode = std::mem::replace(&mut self.mode, Mode::List);
        match &mut mode {
            Mode::List => {
                if let Some(next) = self.handle_list_key(key) {
                    mode = next;
                }
            }
            Mode::FilterEditing => {
                if let Some(next) = self.handle_filter_key(key) {
                    mode = next;
                }
            }
            Mode::Detail(lead_id) => {
                if let Some(next) = self.handle_detail_key(key, *lead_id) {
                    mode = next;
                }
            }
            Mode::Stats => {
                if let Some(next) = self.handle_stats_key(key) {
                    mode = next;
                }
            }
            Mode::ModalStatus(picker) => {
                if let Some(next) = self.handle_status_key(picker, key) {
                    mode = next;
                }
            }
            Mode::ModalAddNote(form) => {
                if let Some(next) = self.handle_note_form_key(form, key) {
                    mode = next;
                }
            }
            Mode::Confirm(state) => {
                if let Some(next) = self.handle_confirm_key(state, key) {
                    mode = next;
                }
            }
        }
        self.mode = mode;
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.leads.len().saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_lead_id() {
                    self.enqueue(Action::LoadDetail(id));
                    return Some(Mode::Detail(id));
                }
            }
            KeyCode::Char('/') => {
                self.filter_error = None;
                return Some(Mode::FilterEditing);
            }
            KeyCode::Char('c') => {
                self.filter_input.clear();
                self.filter = None;
                self.filter_error = None;
                self.enqueue(Action::LoadList);
            }
            KeyCode::Char('s') => {
                if let Some(item) = self.leads.get(self.selected) {
                    let picker = StatusPicker::new(
                        item.id,
                        &item.status,
                        self.notify_on_approval,
                        ReturnTo::List,
                    );
                    return Some(Mode::ModalStatus(picker));
                }
            }
            KeyCode::Char('n') => {
                if let Some(id) = self.selected_lead_id() {
                    return Some(Mode::ModalAddNote(NoteForm::new(id, ReturnTo::List)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.leads.get(self.selected) {
                    return Some(Mode::Confirm(ConfirmState::delete(item.id, &item.name)));
                }
            }
            KeyCode::Char('a') => {
                self.enqueue(Action::LoadStats);
                return Some(Mode::Stats);
            }
            KeyCode::Char('r') => self.enqueue(Action::LoadList),
            _ => {}
        }
        None
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => {
                self.filter_error = None;
                return Some(Mode::List);
            }
            KeyCode::Enter => {
                if self.filter_input.trim().is_empty() {
                    self.filter = None;
                    self.filter_error = None;
                    self.enqueue(Action::LoadList);
                    return Some(Mode::List);
                }
                match parse_filter(&self.filter_input) {
                    Ok(parsed) => {
                        self.filter = Some(parsed);
                        self.filter_error = None;
                        self.enqueue(Action::LoadList);
                        return Some(Mode::List);
                    }
                    Err(err) => self.filter_error = Some(err.to_string()),
                }
            }
            _ => apply_text_input(&mut self.filter_input, key),
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent, lead_id: LeadId) -> Option<Mode> {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.detail = None;
                return Some(Mode::List);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => self.detail_scroll = self.detail_scroll.saturating_add(10),
            KeyCode::PageUp => self.detail_scroll = self.detail_scroll.saturating_sub(10),
            KeyCode::Char('s') => {
                let current = self
                    .detail
                    .as_ref()
                    .map(|detail| detail.status.clone())
                    .unwrap_or_default();
                let picker = StatusPicker::new(
                    lead_id,
                    &current,
                    self.notify_on_approval,
                    ReturnTo::Detail(lead_id),
                );
                return Some(Mode::ModalStatus(picker));
            }
            KeyCode::Char('n') => {
                return Some(Mode::ModalAddNote(NoteForm::new(
                    lead_id,
                    ReturnTo::Detail(lead_id),
                )));
            }
            KeyCode::Char('r') => self.enqueue(Action::LoadDetail(lead_id)),
            _ => {}
        }
        None
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('a') => return Some(Mode::List),
            KeyCode::Char('r') => self.enqueue(Action::LoadStats),
            KeyCode::Char('+') => {
                if self.analytics_months < 24 {
                    self.analytics_months += 1;
                    self.enqueue(Action::LoadStats);
                }
            }
            KeyCode::Char('-') => {
                if self.analytics_months > 1 {
                    self.analytics_months -= 1;
                    self.enqueue(Action::LoadStats);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_status_key(&mut self, picker: &mut StatusPicker, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => return Some(picker.return_to.mode()),
            KeyCode::Down | KeyCode::Char('j') => picker.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => picker.move_selection(-1),
            KeyCode::Char(' ') | KeyCode::Char('n') => picker.notify = !picker.notify,
            KeyCode::Enter => {
                let status = picker.selected_status();
                self.enqueue(Action::SetStatus {
                    lead_id: picker.lead_id,
                    status,
                    notify: picker.notify,
                });
                return Some(picker.return_to.mode());
            }
            _ => {}
        }
        None
    }

    fn handle_note_form_key(&mut self, form: &mut NoteForm, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => return Some(form.return_to.mode()),
            KeyCode::Tab => form.focus_next(),
            KeyCode::BackTab => form.focus_prev(),
            KeyCode::Left if form.focus == NoteFocus::Kind => form.cycle_kind(-1),
            KeyCode::Right if form.focus == NoteFocus::Kind => form.cycle_kind(1),
            KeyCode::Char(' ') if form.focus == NoteFocus::Kind => form.cycle_kind(1),
            KeyCode::Enter => match form.focus {
                NoteFocus::Kind => form.focus_next(),
                NoteFocus::Note => form.note.push('\n'),
                NoteFocus::Save => match form.to_action() {
                    Ok(action) => {
                        self.enqueue(action);
                        return Some(form.return_to.mode());
                    }
                    Err(err) => self.set_error(err),
                },
                NoteFocus::Cancel => return Some(form.return_to.mode()),
            },
            _ => {
                if form.focus == NoteFocus::Note {
                    apply_text_input(&mut form.note, key);
                }
            }
        }
        None
    }

    fn handle_confirm_key(&mut self, state: &mut ConfirmState, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.enqueue(state.action.clone());
                Some(Mode::List)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Mode::List),
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.leads.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.leads.len() as i32 - 1;
        self.selected = (self.selected as i32 + delta).clamp(0, last) as usize;
    }
}

fn apply_text_input(target: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => target.clear(),
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                target.push(ch);
            }
        }
        KeyCode::Backspace => {
            target.pop();
        }
        _ => {}
    }
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(char::is_whitespace) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}

/// Where a modal goes back to once it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTo {
    List,
    Detail(LeadId),
}

impl ReturnTo {
    fn mode(self) -> Mode {
        match self {
            ReturnTo::List => Mode::List,
            ReturnTo::Detail(id) => Mode::Detail(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusPicker {
    pub lead_id: LeadId,
    pub current: LeadStatus,
    pub selected_index: usize,
    pub notify: bool,
    return_to: ReturnTo,
}

impl StatusPicker {
    pub fn new(lead_id: LeadId, current: &str, notify: bool, return_to: ReturnTo) -> Self {
        let current = LeadStatus::parse(current);
        let selected_index = LeadStatus::KNOWN
            .iter()
            .position(|status| *status == current)
            .unwrap_or(0);
        Self {
            lead_id,
            current,
            selected_index,
            notify,
            return_to,
        }
    }

    pub fn selected_status(&self) -> LeadStatus {
        LeadStatus::KNOWN[self.selected_index].clone()
    }

    pub fn move_selection(&mut self, delta: i32) {
        let last = LeadStatus::KNOWN.len() as i32 - 1;
        self.selected_index = (self.selected_index as i32 + delta).clamp(0, last) as usize;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFocus {
    Kind,
    Note,
    Save,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct NoteForm {
    pub lead_id: LeadId,
    pub focus: NoteFocus,
    pub kind_index: usize,
    pub note: String,
    return_to: ReturnTo,
}

impl NoteForm {
    pub fn new(lead_id: LeadId, return_to: ReturnTo) -> Self {
        Self {
            lead_id,
            focus: NoteFocus::Note,
            kind_index: 0,
            note: String::new(),
            return_to,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        NOTE_TYPES[self.kind_index]
    }

    fn cycle_kind(&mut self, delta: i32) {
        let len = NOTE_TYPES.len() as i32;
        self.kind_index = (self.kind_index as i32 + delta).rem_euclid(len) as usize;
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            NoteFocus::Kind => NoteFocus::Note,
            NoteFocus::Note => NoteFocus::Save,
            NoteFocus::Save => NoteFocus::Cancel,
            NoteFocus::Cancel => NoteFocus::Kind,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            NoteFocus::Kind => NoteFocus::Cancel,
            NoteFocus::Note => NoteFocus::Kind,
            NoteFocus::Save => NoteFocus::Note,
            NoteFocus::Cancel => NoteFocus::Save,
        };
    }

    pub fn to_action(&self) -> Result<Action, String> {
        let note = self.note.trim();
        if note.is_empty() {
            return Err("note cannot be empty".to_string());
        }
        let note_type = NoteType::parse(self.kind_label()).map_err(|err| err.to_string())?;
        Ok(Action::AddNote {
            lead_id: self.lead_id,
            note_type,
            note: note.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: Action,
}

impl ConfirmState {
    fn delete(lead_id: LeadId, name: &str) -> Self {
        Self {
            message: format!("Delete {} and all of its notes? (y/n)", name),
            action: Action::DeleteLead(lead_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Mode, NoteFocus, NoteForm, ReturnTo, StatusPicker};
    use crate::actions::Action;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use treadline_core::domain::{LeadId, LeadStatus, NoteType};
    use treadline_core::dto::LeadListItemDto;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn item(name: &str, status: &str) -> LeadListItemDto {
        LeadListItemDto {
            id: LeadId::new(),
            name: name.to_string(),
            email: "lead@example.com".to_string(),
            company: None,
            channel: "otr".to_string(),
            status: status.to_string(),
            created_at: 0,
        }
    }

    fn drain(app: &mut App) -> Vec<Action> {
        std::iter::from_fn(|| app.next_action()).collect()
    }

    #[test]
    fn reloads_are_not_queued_twice() {
        let mut app = App::new(6, true);
        app.enqueue(Action::LoadList);
        app.refresh_views();
        assert_eq!(drain(&mut app), vec![Action::LoadList]);
    }

    #[test]
    fn refresh_in_detail_reloads_detail() {
        let mut app = App::new(6, true);
        drain(&mut app);
        let id = LeadId::new();
        app.mode = Mode::Detail(id);
        app.refresh_views();
        assert_eq!(
            drain(&mut app),
            vec![Action::LoadList, Action::LoadDetail(id)]
        );
    }

    #[test]
    fn apply_list_keeps_selected_lead() {
        let mut app = App::new(6, true);
        let a = item("Ana", "pending");
        let b = item("Bruno", "approved");
        app.apply_list(vec![a.clone(), b.clone()]);
        app.selected = 1;
        app.apply_list(vec![item("Carla", "pending"), a, b.clone()]);
        assert_eq!(app.selected_lead_id(), Some(b.id));

        app.apply_list(Vec::new());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn invalid_filter_stays_in_editing() {
        let mut app = App::new(6, true);
        drain(&mut app);
        app.handle_key(key(KeyCode::Char('/')));
        for ch in "since:ontem".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.mode, Mode::FilterEditing));
        assert!(app.filter_error.is_some());
        assert!(drain(&mut app).is_empty());
    }

    #[test]
    fn q_types_into_filter_instead_of_quitting() {
        let mut app = App::new(6, true);
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.filter_input, "q");
    }

    #[test]
    fn status_picker_starts_on_current_status() {
        let id = LeadId::new();
        let mut picker = StatusPicker::new(id, "converted", true, ReturnTo::List);
        assert_eq!(picker.selected_status(), LeadStatus::Converted);
        picker.move_selection(10);
        assert_eq!(picker.selected_status(), LeadStatus::Rejected);
        picker.move_selection(-10);
        assert_eq!(picker.selected_status(), LeadStatus::Pending);
    }

    #[test]
    fn status_picker_enqueues_change_and_returns() {
        let mut app = App::new(6, false);
        drain(&mut app);
        let lead = item("Ana", "pending");
        let id = lead.id;
        app.apply_list(vec![lead]);
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.mode, Mode::List));
        assert_eq!(
            drain(&mut app),
            vec![Action::SetStatus {
                lead_id: id,
                status: LeadStatus::Approved,
                notify: true,
            }]
        );
    }

    #[test]
    fn note_form_requires_text_and_cycles_kind() {
        let id = LeadId::new();
        let mut form = NoteForm::new(id, ReturnTo::Detail(id));
        assert!(form.to_action().is_err());

        form.cycle_kind(1);
        assert_eq!(form.kind_label(), "call");
        form.cycle_kind(-2);
        assert_eq!(form.kind_label(), "meeting");

        form.note = "  Visitou o pátio  ".to_string();
        assert_eq!(
            form.to_action().unwrap(),
            Action::AddNote {
                lead_id: id,
                note_type: NoteType::Meeting,
                note: "Visitou o pátio".to_string(),
            }
        );
        form.focus_prev();
        assert_eq!(form.focus, NoteFocus::Kind);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = App::new(6, true);
        drain(&mut app);
        let lead = item("Ana", "pending");
        let id = lead.id;
        app.apply_list(vec![lead]);
        app.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(app.mode, Mode::Confirm(_)));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(drain(&mut app), vec![Action::DeleteLead(id)]);
    }
}
