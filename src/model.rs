use serde::{Deserialize, Serialize};

pub const UNKNOWN_BREED: &str = "Unknown";
pub const UNASSIGNED_TEAM: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Field,
    Bench,
}

impl PlayerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerStatus::Field => "field",
            PlayerStatus::Bench => "bench",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerStatus::Field => "Field",
            PlayerStatus::Bench => "Bench",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            PlayerStatus::Field => PlayerStatus::Bench,
            PlayerStatus::Bench => PlayerStatus::Field,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "field" => Some(PlayerStatus::Field),
            "bench" => Some(PlayerStatus::Bench),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

/// A roster entry as served by the remote API. Never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub breed: Option<String>,
    pub status: PlayerStatus,
    #[serde(default)]
    pub team: Option<Team>,
}

impl Player {
    pub fn breed_label(&self) -> &str {
        self.breed
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNKNOWN_BREED)
    }

    pub fn team_label(&self) -> &str {
        self.team
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or(UNASSIGNED_TEAM)
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    pub name: String,
    pub image_url: String,
    pub breed: String,
    pub status: PlayerStatus,
}
