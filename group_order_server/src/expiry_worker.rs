use chrono::Utc;
use group_order_engine::{db_types::GroupOrder, events::EventProducers, LobbyFlowApi, LocalOrderService, SqliteDatabase};
use log::*;
use tokio::task::JoinHandle;

use crate::config::EXPIRY_SWEEP_INTERVAL_SECS;

/// Starts the lobby expiry worker. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_expiry_worker(db: SqliteDatabase, producers: EventProducers) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(EXPIRY_SWEEP_INTERVAL_SECS));
        let api = LobbyFlowApi::new(db, LocalOrderService, producers);
        info!("🕰️ Abandoned lobby expiry worker started");
        loop {
            timer.tick().await;
            trace!("🕰️ Running abandoned lobby expiry job");
            match api.expire_old_lobbies(Utc::now()).await {
                Ok(expired) => {
                    if !expired.is_empty() {
                        info!("🕰️ {} lobbies expired: {}", expired.len(), lobby_list(&expired));
                    }
                },
                Err(e) => {
                    error!("🕰️ Error running abandoned lobby expiry job: {e}");
                },
            }
        }
    })
}

fn lobby_list(lobbies: &[GroupOrder]) -> String {
    lobbies
        .iter()
        .map(|l| format!("[{}] {} created by {}", l.id, l.group_order_id, l.created_by))
        .collect::<Vec<String>>()
        .join(", ")
}
