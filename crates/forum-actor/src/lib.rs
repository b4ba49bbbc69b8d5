//! Mailbox front-end for the forum engine.
//!
//! A single OS thread owns the mailbox and runs engine calls one at a time,
//! in arrival order. [`EngineHandle`] is the async side: it queues a command
//! and awaits the answer.

mod command;
mod handle;

use std::io;
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info};

use forum_engine::{Engine, EngineError};

pub use handle::EngineHandle;

use crate::command::Command;

/// How many users the actor's stats report ranks.
pub const TOP_USERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("engine mailbox closed")]
    MailboxClosed,
}

/// Starts the actor thread. It exits once every handle is dropped or
/// [`EngineHandle::shutdown`] is called. `capacity` must be at least one.
pub fn spawn(engine: Arc<Engine>, capacity: usize) -> io::Result<(EngineHandle, thread::JoinHandle<()>)> {
    if capacity == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "engine mailbox capacity must be at least 1",
        ));
    }
    let (tx, rx) = mpsc::channel(capacity);
    let join = thread::Builder::new()
        .name("forum-engine-actor".into())
        .spawn(move || run(engine, rx))?;
    Ok((EngineHandle::new(tx), join))
}

fn run(engine: Arc<Engine>, mut mailbox: mpsc::Receiver<Command>) {
    info!("Engine actor started");

    while let Some(command) = mailbox.blocking_recv() {
        debug!(command = command.name(), "engine actor received command");
        if matches!(command, Command::Shutdown) {
            break;
        }
        command.execute(&engine);
    }

    info!("Engine actor stopped");
}
