use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{BudgetUpdatedEvent, EventHandler, EventProducer, Handler, LobbyLockedEvent, PhaseChangedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub phase_changed_producer: Vec<EventProducer<PhaseChangedEvent>>,
    pub budget_updated_producer: Vec<EventProducer<BudgetUpdatedEvent>>,
    pub lobby_locked_producer: Vec<EventProducer<LobbyLockedEvent>>,
}

pub struct EventHandlers {
    pub on_phase_changed: Option<EventHandler<PhaseChangedEvent>>,
    pub on_budget_updated: Option<EventHandler<BudgetUpdatedEvent>>,
    pub on_lobby_locked: Option<EventHandler<LobbyLockedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_phase_changed = hooks.on_phase_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_budget_updated = hooks.on_budget_updated.map(|f| EventHandler::new(buffer_size, f));
        let on_lobby_locked = hooks.on_lobby_locked.map(|f| EventHandler::new(buffer_size, f));
        Self { on_phase_changed, on_budget_updated, on_lobby_locked }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_phase_changed {
            result.phase_changed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_budget_updated {
            result.budget_updated_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_lobby_locked {
            result.lobby_locked_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_phase_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_budget_updated {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_lobby_locked {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_phase_changed: Option<Handler<PhaseChangedEvent>>,
    pub on_budget_updated: Option<Handler<BudgetUpdatedEvent>>,
    pub on_lobby_locked: Option<Handler<LobbyLockedEvent>>,
}

impl EventHooks {
    pub fn on_phase_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PhaseChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_phase_changed = Some(Arc::new(f));
        self
    }

    pub fn on_budget_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BudgetUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_budget_updated = Some(Arc::new(f));
        self
    }

    pub fn on_lobby_locked<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(LobbyLockedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_lobby_locked = Some(Arc::new(f));
        self
    }
}
