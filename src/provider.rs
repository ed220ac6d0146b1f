use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::api::{RosterClient, Transport};
use crate::form::CreateForm;
use crate::state::{Delta, ProviderCommand};
use crate::view::{Notice, Renderer, Surface, View};

/// Forwards everything the renderer draws to the UI thread.
pub struct ChannelSurface {
    tx: Sender<Delta>,
}

impl ChannelSurface {
    pub fn new(tx: Sender<Delta>) -> Self {
        Self { tx }
    }

    fn send(&self, delta: Delta) {
        // A closed channel means the UI is gone; the command loop notices on
        // its next recv.
        let _ = self.tx.send(delta);
    }
}

impl Surface for ChannelSurface {
    fn replace(&mut self, view: View) {
        self.send(Delta::Replace(view));
    }

    fn install_form(&mut self, form: CreateForm) {
        self.send(Delta::InstallForm(form));
    }

    fn reset_form(&mut self) {
        self.send(Delta::ResetForm);
    }

    fn notify(&mut self, notice: Notice) {
        self.send(Delta::Notify(notice));
    }

    fn log(&mut self, line: String) {
        self.send(Delta::Log(line));
    }
}

/// Runs the initial load, then one command at a time until the command
/// channel closes. Each command finishes all of its network calls and
/// renders before the next one starts.
pub fn run_provider<T: Transport, S: Surface>(
    renderer: &mut Renderer<T, S>,
    cmd_rx: &Receiver<ProviderCommand>,
) {
    renderer.start();
    while let Ok(cmd) = cmd_rx.recv() {
        debug!(?cmd, "provider command");
        match cmd {
            ProviderCommand::Refresh => renderer.refresh(),
            ProviderCommand::Act(action) => renderer.dispatch(action),
            ProviderCommand::Submit(form) => {
                renderer.submit(&form);
            }
        }
    }
    info!("provider stopped");
}

pub fn spawn_provider<T>(
    transport: T,
    base_url: String,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    T: Transport + Send + 'static,
{
    thread::spawn(move || {
        let client = RosterClient::new(transport, base_url);
        let mut renderer = Renderer::new(client, ChannelSurface::new(tx));
        run_provider(&mut renderer, &cmd_rx);
    })
}
