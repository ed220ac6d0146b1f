use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use roster_terminal::api::{ApiRequest, HttpReply, Method, Transport};
use roster_terminal::form::CreateForm;
use roster_terminal::provider::spawn_provider;
use roster_terminal::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};
use roster_terminal::view::{CardAction, View};

const TWO_PLAYERS: &str = r#"{"data":{"players":[
    {"id":1,"name":"Rex","imageUrl":"https://img/rex.png","status":"field"},
    {"id":2,"name":"Ace","imageUrl":"https://img/ace.png","status":"bench"}
]}}"#;
const ACE_ONLY: &str = r#"{"data":{"players":[
    {"id":2,"name":"Ace","imageUrl":"https://img/ace.png","status":"bench"}
]}}"#;

#[derive(Clone, Default)]
struct SharedStub {
    replies: Arc<Mutex<VecDeque<HttpReply>>>,
    seen: Arc<Mutex<Vec<(Method, String)>>>,
}

impl SharedStub {
    fn reply(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(HttpReply {
            status,
            body: body.to_string(),
        });
        self
    }
}

impl Transport for SharedStub {
    fn execute(&self, request: &ApiRequest) -> Result<HttpReply> {
        self.seen
            .lock()
            .unwrap()
            .push((request.method, request.url.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no reply queued"))
    }
}

#[test]
fn commands_run_in_order_and_stream_deltas() {
    let stub = SharedStub::default()
        .reply(200, TWO_PLAYERS)
        .reply(204, "")
        .reply(200, ACE_ONLY);
    let seen = stub.seen.clone();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(stub, "https://api.test/c".to_string(), tx, cmd_rx);

    cmd_tx
        .send(ProviderCommand::Act(CardAction::ViewDetail(1)))
        .unwrap();
    cmd_tx
        .send(ProviderCommand::Act(CardAction::Remove(1)))
        .unwrap();
    drop(cmd_tx);
    handle.join().unwrap();

    let deltas: Vec<Delta> = rx.try_iter().collect();
    assert!(matches!(&deltas[0], Delta::Replace(View::List(cards)) if cards.len() == 2));
    assert!(matches!(&deltas[1], Delta::InstallForm(_)));
    assert!(matches!(&deltas[2], Delta::Replace(View::Detail(card)) if card.id == 1));
    assert!(matches!(deltas.last(), Some(Delta::Replace(View::List(cards))) if cards.len() == 1));

    let calls = seen.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            (Method::Get, "https://api.test/c/players".to_string()),
            (Method::Delete, "https://api.test/c/players/1".to_string()),
            (Method::Get, "https://api.test/c/players".to_string()),
        ]
    );

    let mut state = AppState::new();
    for delta in deltas {
        apply_delta(&mut state, delta);
    }
    assert_eq!(state.screen, Screen::List);
    assert_eq!(state.cards.len(), 1);
    assert!(state.form.is_some());
}

#[test]
fn blocked_submit_only_notifies() {
    let stub = SharedStub::default().reply(200, r#"{"data":{"players":[]}}"#);
    let seen = stub.seen.clone();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(stub, "https://api.test/c".to_string(), tx, cmd_rx);
    cmd_tx
        .send(ProviderCommand::Submit(CreateForm::new()))
        .unwrap();
    drop(cmd_tx);
    handle.join().unwrap();

    let deltas: Vec<Delta> = rx.try_iter().collect();
    assert!(matches!(deltas.last(), Some(Delta::Notify(_))));
    assert_eq!(seen.lock().unwrap().len(), 1);
}
