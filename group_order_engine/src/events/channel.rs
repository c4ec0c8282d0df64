//! Lobby event fan-out.
//!
//! A small pub-sub layer over tokio mpsc channels. Components that want to react to lobby events (push a status
//! update to connected clients, send an invite notification) register a hook. Hooks receive the event payload
//! only, never a handle on engine state, and every invocation runs as its own task so one slow hook cannot stall
//! the dispatch loop.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    inbox: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    hook: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, hook: Handler<E>) -> Self {
        let (sender, inbox) = mpsc::channel(buffer_size);
        Self { inbox, sender, hook }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs the dispatch loop until every producer has been dropped, then waits for in-flight hook invocations
    /// to complete before returning.
    pub async fn start_handler(mut self) {
        debug!("📬️ Event dispatch loop started");
        // Our own sender must go first, or the channel would never report closed.
        drop(self.sender);
        let mut in_flight = JoinSet::new();
        while let Some(event) = self.inbox.recv().await {
            trace!("📬️ Dispatching event to hook");
            let hook = Arc::clone(&self.hook);
            in_flight.spawn(async move { (hook)(event).await });
        }
        debug!("📬️ All producers dropped. Draining {} hook invocation(s)", in_flight.len());
        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                warn!("📬️ An event hook invocation did not complete cleanly: {e}");
            }
        }
        debug!("📬️ Event dispatch loop stopped");
    }
}

/// A cloneable handle for publishing events into a handler's queue.
#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Event dropped. The dispatch loop is no longer running: {e}");
        }
    }
}
