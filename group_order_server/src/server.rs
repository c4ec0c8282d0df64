use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use group_order_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    LobbyFlowApi,
    LocalOrderService,
    SqliteDatabase,
    MIGRATOR,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    expiry_worker::start_expiry_worker,
    routes::{
        contribute_budget,
        create_lobby,
        get_lobby,
        health,
        join_lobby,
        lobby_status,
        lock_lobby,
        resolve_share_token,
        set_ready,
        start_selection,
        update_selections,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = if config.database_url.is_empty() {
        SqliteDatabase::new(25).await
    } else {
        SqliteDatabase::new_with_url(&config.database_url, 25).await
    }
    .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    MIGRATOR.run(db.pool()).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let mut hooks = EventHooks::default();
    hooks.on_lobby_locked(|ev| {
        Box::pin(async move {
            info!("🔒️ Lobby [{}] locked. Order {} handed to fulfilment.", ev.order.group_order_id, ev.placed_order_id);
        })
    });
    let handlers = EventHandlers::new(16, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let _expiry_handle = start_expiry_worker(db.clone(), producers.clone());
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = LobbyFlowApi::new(db.clone(), LocalOrderService, producers.clone())
            .with_lock_policy(config.lock_policy());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gos::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(config.auth.clone()));
        let api_scope = web::scope("/api")
            .service(create_lobby)
            .service(get_lobby)
            .service(lobby_status)
            .service(join_lobby)
            .service(contribute_budget)
            .service(start_selection)
            .service(update_selections)
            .service(set_ready)
            .service(lock_lobby)
            .service(resolve_share_token);
        app.service(health).service(api_scope)
    })
    .bind((host.as_str(), port))
    .map_err(|e| ServerError::InitializeError(format!("Could not bind to {host}:{port}. {e}")))?
    .run();
    Ok(srv)
}
