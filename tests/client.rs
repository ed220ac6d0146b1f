use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use roster_terminal::api::{
    ApiFailure, ApiRequest, HttpReply, Method, RosterClient, Transport, parse_players_json,
};
use roster_terminal::model::{PlayerInput, PlayerStatus, UNASSIGNED_TEAM, UNKNOWN_BREED};

const BASE: &str = "https://api.test/api/cohort";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
struct StubTransport {
    replies: Mutex<VecDeque<Result<HttpReply, String>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    fn reply(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(HttpReply {
            status,
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, msg: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(msg.to_string()));
        self
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &ApiRequest) -> Result<HttpReply> {
        self.seen.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("no reply queued")),
        }
    }
}

fn candidate() -> PlayerInput {
    PlayerInput {
        name: "Biscuit".to_string(),
        image_url: "https://images.example.com/biscuit.png".to_string(),
        breed: UNKNOWN_BREED.to_string(),
        status: PlayerStatus::Bench,
    }
}

#[test]
fn list_returns_players_in_server_order() {
    let stub = StubTransport::default().reply(200, &read_fixture("players.json"));
    let client = RosterClient::new(&stub, BASE);

    let players = client.list();
    let ids: Vec<i64> = players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 4, 2]);
    assert_eq!(players[0].team_label(), "Ruff");
    assert_eq!(players[1].breed_label(), UNKNOWN_BREED);
    assert_eq!(players[1].status, PlayerStatus::Bench);
    assert_eq!(players[2].team_label(), UNASSIGNED_TEAM);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url, format!("{BASE}/players"));
    assert!(requests[0].body.is_none());
}

#[test]
fn list_is_empty_on_transport_failure() {
    let stub = StubTransport::default().fail("connection refused");
    let client = RosterClient::new(&stub, BASE);
    assert!(client.list().is_empty());
    assert!(matches!(
        RosterClient::new(StubTransport::default().fail("dns"), BASE).try_list(),
        Err(ApiFailure::Transport(_))
    ));
}

#[test]
fn list_is_empty_on_error_status() {
    let body = read_fixture("players.json");
    let client = RosterClient::new(StubTransport::default().reply(500, &body), BASE);
    assert_eq!(client.try_list(), Err(ApiFailure::Status(500)));

    let client = RosterClient::new(StubTransport::default().reply(404, &body), BASE);
    assert!(client.list().is_empty());
}

#[test]
fn list_is_empty_on_malformed_body() {
    let bodies = [
        "<html>oops</html>",
        "null",
        r#"{"data":{}}"#,
        r#"{"data":{"players":[{"id":"x"}]}}"#,
    ];
    for body in bodies {
        let client = RosterClient::new(StubTransport::default().reply(200, body), BASE);
        assert!(
            matches!(client.try_list(), Err(ApiFailure::Malformed(_))),
            "body {body:?} should be malformed"
        );
        let client = RosterClient::new(StubTransport::default().reply(200, body), BASE);
        assert!(client.list().is_empty());
    }
}

#[test]
fn get_returns_requested_player() {
    let stub = StubTransport::default().reply(200, &read_fixture("player.json"));
    let client = RosterClient::new(&stub, BASE);

    let player = client.get(1).expect("player should be returned");
    assert_eq!(player.id, 1);
    assert_eq!(player.name, "Rex");
    assert_eq!(stub.requests()[0].url, format!("{BASE}/players/1"));
}

#[test]
fn get_is_none_for_missing_or_failing_id() {
    let client = RosterClient::new(
        StubTransport::default().reply(200, r#"{"success":false,"data":{"player":null}}"#),
        BASE,
    );
    assert!(client.get(42).is_none());

    let client = RosterClient::new(StubTransport::default().reply(404, "{}"), BASE);
    assert!(client.get(42).is_none());

    let client = RosterClient::new(StubTransport::default().fail("timeout"), BASE);
    assert!(client.get(42).is_none());
}

#[test]
fn get_rejects_a_different_id() {
    let client = RosterClient::new(
        StubTransport::default().reply(200, &read_fixture("player.json")),
        BASE,
    );
    assert!(matches!(client.try_get(2), Err(ApiFailure::Malformed(_))));
}

#[test]
fn create_posts_candidate_and_returns_assigned_id() {
    let stub = StubTransport::default().reply(201, &read_fixture("new_player.json"));
    let client = RosterClient::new(&stub, BASE);

    let created = client.create(&candidate()).expect("create should succeed");
    assert_eq!(created.id, 99);
    assert_eq!(created.name, "Biscuit");

    let requests = stub.requests();
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, format!("{BASE}/players"));
    let sent: serde_json::Value =
        serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({
            "name": "Biscuit",
            "imageUrl": "https://images.example.com/biscuit.png",
            "breed": "Unknown",
            "status": "bench",
        })
    );
}

#[test]
fn create_does_no_local_validation() {
    let stub = StubTransport::default().reply(400, r#"{"success":false}"#);
    let client = RosterClient::new(&stub, BASE);
    let blank = PlayerInput {
        name: String::new(),
        image_url: String::new(),
        ..candidate()
    };
    assert!(client.create(&blank).is_none());
    assert_eq!(stub.requests().len(), 1);
}

#[test]
fn create_is_none_on_failure() {
    let client = RosterClient::new(StubTransport::default().fail("reset"), BASE);
    assert!(client.create(&candidate()).is_none());

    let client = RosterClient::new(StubTransport::default().reply(200, r#"{"data":{}}"#), BASE);
    assert!(matches!(
        client.try_create(&candidate()),
        Err(ApiFailure::Malformed(_))
    ));
}

#[test]
fn delete_reports_http_outcome() {
    let stub = StubTransport::default()
        .reply(200, r#"{"success":true,"data":null}"#)
        .reply(404, "")
        .fail("offline");
    let client = RosterClient::new(&stub, BASE);

    assert!(client.delete(5));
    assert!(!client.delete(6));
    assert!(!client.delete(7));

    let requests = stub.requests();
    assert!(requests.iter().all(|r| r.method == Method::Delete));
    assert_eq!(requests[0].url, format!("{BASE}/players/5"));
}

#[test]
fn parse_players_tolerates_surrounding_whitespace() {
    let raw = format!("\n  {}  \n", read_fixture("players.json"));
    assert_eq!(parse_players_json(&raw).unwrap().len(), 3);
}

#[test]
fn base_url_trailing_slash_is_ignored() {
    let stub = StubTransport::default().reply(200, r#"{"data":{"players":[]}}"#);
    let client = RosterClient::new(&stub, format!("{BASE}/"));
    assert!(client.list().is_empty());
    assert_eq!(stub.requests()[0].url, format!("{BASE}/players"));
}

#[test]
fn record_without_image_keeps_rest_of_roster() {
    let body = r#"{"data":{"players":[
        {"id":1,"name":"Rex","status":"field"},
        {"id":2,"name":"Ace","imageUrl":"https://img/ace.png","status":"bench"}
    ]}}"#;
    let client = RosterClient::new(StubTransport::default().reply(200, body), BASE);
    let players = client.list();
    assert_eq!(players.len(), 2);
    assert!(players[0].image_url.is_empty());
    assert_eq!(players[1].image_url, "https://img/ace.png");
}
