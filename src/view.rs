use tracing::{debug, info};

use crate::api::{RosterClient, Transport};
use crate::form::{CreateForm, REQUIRED_FIELDS_MESSAGE};
use crate::model::{Player, PlayerStatus};

pub const FAILED_ADD_MESSAGE: &str = "Failed to add new player. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    ViewDetail(i64),
    Remove(i64),
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub status: PlayerStatus,
    pub actions: [CardAction; 2],
}

impl PlayerCard {
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            image_url: player.image_url.clone(),
            status: player.status,
            actions: [CardAction::ViewDetail(player.id), CardAction::Remove(player.id)],
        }
    }

    pub fn id_label(&self) -> String {
        format!("ID: {}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCard {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub image_url: String,
    pub team: String,
    pub back: CardAction,
}

impl DetailCard {
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            breed: player.breed_label().to_string(),
            image_url: player.image_url.clone(),
            team: player.team_label().to_string(),
            back: CardAction::Back,
        }
    }
}

/// Whole-surface content. Installing one discards whatever was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    List(Vec<PlayerCard>),
    Detail(DetailCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Where the renderer draws. The list/detail view and the create form are
/// separate mount points.
pub trait Surface {
    fn replace(&mut self, view: View);
    fn install_form(&mut self, form: CreateForm);
    fn reset_form(&mut self);
    fn notify(&mut self, notice: Notice);
    fn log(&mut self, line: String);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn replace(&mut self, view: View) {
        (**self).replace(view)
    }
    fn install_form(&mut self, form: CreateForm) {
        (**self).install_form(form)
    }
    fn reset_form(&mut self) {
        (**self).reset_form()
    }
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice)
    }
    fn log(&mut self, line: String) {
        (**self).log(line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    ListView,
    DetailView { id: i64 },
}

pub struct Renderer<T, S> {
    client: RosterClient<T>,
    surface: S,
    shown: Vec<Player>,
    state: ViewState,
}

impl<T: Transport, S: Surface> Renderer<T, S> {
    pub fn new(client: RosterClient<T>, surface: S) -> Self {
        Self {
            client,
            surface,
            shown: Vec::new(),
            state: ViewState::ListView,
        }
    }

    pub fn client(&self) -> &RosterClient<T> {
        &self.client
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn shown(&self) -> &[Player] {
        &self.shown
    }

    /// Initial fetch and render, then the create form.
    pub fn start(&mut self) {
        info!(base_url = %self.client.base_url(), "starting roster view");
        self.refresh();
        self.show_create_form();
    }

    pub fn refresh(&mut self) {
        let players = self.client.list();
        self.show_list(players);
    }

    pub fn show_list(&mut self, players: Vec<Player>) {
        let cards = players.iter().map(PlayerCard::from_player).collect();
        self.shown = players;
        self.state = ViewState::ListView;
        self.surface.replace(View::List(cards));
    }

    pub fn show_detail(&mut self, player: &Player) {
        self.state = ViewState::DetailView { id: player.id };
        self.surface
            .replace(View::Detail(DetailCard::from_player(player)));
    }

    pub fn show_create_form(&mut self) {
        self.surface.install_form(CreateForm::new());
    }

    pub fn dispatch(&mut self, action: CardAction) {
        match action {
            CardAction::ViewDetail(id) => {
                self.view_detail(id);
            }
            CardAction::Remove(id) => {
                self.remove(id);
            }
            CardAction::Back => self.back(),
        }
    }

    /// Local transition using the record already on screen.
    pub fn view_detail(&mut self, id: i64) -> bool {
        let Some(player) = self.shown.iter().find(|p| p.id == id).cloned() else {
            self.surface
                .log(format!("[WARN] Player #{id} is not on screen"));
            return false;
        };
        self.show_detail(&player);
        true
    }

    /// Delete, then re-fetch and re-render. A failed delete leaves the
    /// current view alone.
    pub fn remove(&mut self, id: i64) -> bool {
        if !self.client.delete(id) {
            self.surface
                .log(format!("[WARN] Trouble removing player #{id} from the roster"));
            return false;
        }
        self.surface
            .log(format!("[INFO] Player #{id} has been removed"));
        self.refresh();
        true
    }

    pub fn back(&mut self) {
        debug!("back to all players");
        self.refresh();
    }

    pub fn submit(&mut self, form: &CreateForm) -> bool {
        let candidate = match form.submission() {
            Ok(candidate) => candidate,
            Err(missing) => {
                debug!(?missing, "create form blocked");
                self.surface
                    .notify(Notice::Error(REQUIRED_FIELDS_MESSAGE.to_string()));
                return false;
            }
        };

        let Some(added) = self.client.create(&candidate) else {
            self.surface
                .notify(Notice::Error(FAILED_ADD_MESSAGE.to_string()));
            return false;
        };

        self.refresh();
        self.surface.reset_form();
        self.surface.notify(Notice::Info(format!(
            "Player \"{}\" added successfully!",
            added.name
        )));
        true
    }
}
