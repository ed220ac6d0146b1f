use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RosterConfig;
use crate::http_client::http_client;
use crate::model::{Player, PlayerInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam for [`RosterClient`]. An `Err` means the request never
/// produced an HTTP response.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<HttpReply>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &ApiRequest) -> Result<HttpReply> {
        (**self).execute(request)
    }
}

pub struct ReqwestTransport {
    client: &'static Client,
}

impl ReqwestTransport {
    pub fn new(config: &RosterConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout)?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &ApiRequest) -> Result<HttpReply> {
        let mut req = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if let Some(body) = request.body.as_ref() {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        let resp = req.send().context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(HttpReply { status, body })
    }
}

/// Why a call failed before it was collapsed to an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub struct RosterClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> RosterClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn try_list(&self) -> Result<Vec<Player>, ApiFailure> {
        let body = self.send(Method::Get, self.players_url(), None)?;
        parse_players_json(&body).map_err(malformed)
    }

    pub fn try_get(&self, id: i64) -> Result<Player, ApiFailure> {
        let body = self.send(Method::Get, self.player_url(id), None)?;
        let player = parse_player_json(&body).map_err(malformed)?;
        if player.id != id {
            return Err(ApiFailure::Malformed(format!(
                "asked for player {id}, got {}",
                player.id
            )));
        }
        Ok(player)
    }

    pub fn try_create(&self, candidate: &PlayerInput) -> Result<Player, ApiFailure> {
        let payload = serde_json::to_string(candidate)
            .map_err(|err| ApiFailure::Malformed(format!("encode player: {err}")))?;
        let body = self.send(Method::Post, self.players_url(), Some(payload))?;
        parse_new_player_json(&body).map_err(malformed)
    }

    pub fn try_delete(&self, id: i64) -> Result<(), ApiFailure> {
        self.send(Method::Delete, self.player_url(id), None)
            .map(|_| ())
    }

    /// Every player, or nothing when the fetch fails for any reason.
    pub fn list(&self) -> Vec<Player> {
        match self.try_list() {
            Ok(players) => {
                debug!(count = players.len(), "fetched players");
                players
            }
            Err(err) => {
                warn!(error = %err, "trouble fetching players");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<Player> {
        self.try_get(id)
            .inspect_err(|err| warn!(player_id = id, error = %err, "trouble fetching player"))
            .ok()
    }

    pub fn create(&self, candidate: &PlayerInput) -> Option<Player> {
        match self.try_create(candidate) {
            Ok(player) => {
                debug!(player_id = player.id, name = %player.name, "player created");
                Some(player)
            }
            Err(err) => {
                warn!(name = %candidate.name, error = %err, "trouble adding player");
                None
            }
        }
    }

    pub fn delete(&self, id: i64) -> bool {
        match self.try_delete(id) {
            Ok(()) => {
                debug!(player_id = id, "player removed");
                true
            }
            Err(err) => {
                warn!(player_id = id, error = %err, "trouble removing player");
                false
            }
        }
    }

    fn players_url(&self) -> String {
        format!("{}/players", self.base_url)
    }

    fn player_url(&self, id: i64) -> String {
        format!("{}/players/{id}", self.base_url)
    }

    fn send(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<String, ApiFailure> {
        let request = ApiRequest { method, url, body };
        let reply = self
            .transport
            .execute(&request)
            .map_err(|err| ApiFailure::Transport(format!("{err:#}")))?;
        if !reply.is_success() {
            return Err(ApiFailure::Status(reply.status));
        }
        Ok(reply.body)
    }
}

fn malformed(err: anyhow::Error) -> ApiFailure {
    ApiFailure::Malformed(format!("{err:#}"))
}

#[derive(Debug, Deserialize)]
struct Envelope<D> {
    data: D,
}

#[derive(Debug, Deserialize)]
struct PlayersData {
    players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
struct PlayerData {
    player: Option<Player>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPlayerData {
    new_player: Option<Player>,
}

/// `{data:{players:[...]}}`, preserving server order.
pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    let env: Envelope<PlayersData> =
        serde_json::from_str(raw.trim()).context("invalid players json")?;
    Ok(env.data.players)
}

/// `{data:{player:{...}}}`.
pub fn parse_player_json(raw: &str) -> Result<Player> {
    let env: Envelope<PlayerData> =
        serde_json::from_str(raw.trim()).context("invalid player json")?;
    env.data.player.context("response has no player")
}

/// `{data:{newPlayer:{...}}}`.
pub fn parse_new_player_json(raw: &str) -> Result<Player> {
    let env: Envelope<NewPlayerData> =
        serde_json::from_str(raw.trim()).context("invalid new player json")?;
    env.data.new_player.context("response has no newPlayer")
}
