use std::collections::VecDeque;

use chrono::Local;

use crate::form::CreateForm;
use crate::view::{CardAction, DetailCard, Notice, PlayerCard, Surface, View};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Terminal-side copy of everything the renderer has drawn.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub cards: Vec<PlayerCard>,
    pub detail: Option<DetailCard>,
    pub selected: usize,
    pub form: Option<CreateForm>,
    pub form_open: bool,
    pub notice: Option<Notice>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub loading: bool,
    pub renders: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::List,
            cards: Vec::new(),
            detail: None,
            selected: 0,
            form: None,
            form_open: false,
            notice: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            loading: true,
            renders: 0,
        }
    }

    pub fn selected_card(&self) -> Option<&PlayerCard> {
        self.cards.get(self.selected)
    }

    /// The action bound to the selected card at `slot` (0 = detail, 1 = remove).
    pub fn selected_action(&self, slot: usize) -> Option<CardAction> {
        if self.screen != Screen::List {
            return None;
        }
        self.selected_card()
            .and_then(|card| card.actions.get(slot).copied())
    }

    pub fn select_next(&mut self) {
        if self.cards.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(self.cards.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_form(&mut self) {
        if self.form.is_some() {
            self.form_open = true;
        }
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Surface for AppState {
    fn replace(&mut self, view: View) {
        self.loading = false;
        self.renders += 1;
        match view {
            View::List(cards) => {
                self.screen = Screen::List;
                self.detail = None;
                self.cards = cards;
                if self.selected >= self.cards.len() {
                    self.selected = self.cards.len().saturating_sub(1);
                }
            }
            View::Detail(card) => {
                self.screen = Screen::Detail;
                self.detail = Some(card);
            }
        }
    }

    fn install_form(&mut self, form: CreateForm) {
        self.form = Some(form);
    }

    fn reset_form(&mut self) {
        if let Some(form) = self.form.as_mut() {
            *form = CreateForm::new();
        }
        self.form_open = false;
    }

    fn notify(&mut self, notice: Notice) {
        let line = match &notice {
            Notice::Info(msg) => format!("[INFO] {msg}"),
            Notice::Error(msg) => format!("[WARN] {msg}"),
        };
        self.push_log(line);
        self.notice = Some(notice);
    }

    fn log(&mut self, line: String) {
        self.push_log(line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    Replace(View),
    InstallForm(CreateForm),
    ResetForm,
    Notify(Notice),
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    Act(CardAction),
    Submit(CreateForm),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Replace(view) => state.replace(view),
        Delta::InstallForm(form) => state.install_form(form),
        Delta::ResetForm => state.reset_form(),
        Delta::Notify(notice) => state.notify(notice),
        Delta::Log(msg) => state.push_log(msg),
    }
}
