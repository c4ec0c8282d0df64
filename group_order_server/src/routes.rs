//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are written against the concrete `SqliteDatabase`/`LocalOrderService` engine instance (actix's
//! routing macros cannot carry generic handlers), and every authenticated handler receives the verified
//! principal via the [`AuthenticatedUser`] extractor. The engine never reads identity from ambient state.
use actix_web::{get, post, put, web, HttpResponse, Responder};
use chrono::Duration;
use cn_common::Pence;
use group_order_engine::{
    db_types::{GroupOrderId, NewGroupOrder, SelectionStatus},
    LobbyFlowApi,
    LocalOrderService,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::AuthenticatedUser,
    data_objects::{
        ContributeRequest,
        JoinRequest,
        JsonResponse,
        LockResponse,
        NewLobbyRequest,
        ReadyRequest,
        SelectionsRequest,
    },
    errors::ServerError,
};

pub type LobbyApi = LobbyFlowApi<SqliteDatabase, LocalOrderService>;

/// Longest lobby lifetime a client may request at creation (one week).
pub const MAX_EXPIRY_HOURS: i64 = 7 * 24;

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[post("/lobbies")]
pub async fn create_lobby(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    body: web::Json<NewLobbyRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let mut lobby = NewGroupOrder::new(
        user.user_id,
        user.display_name,
        req.restaurant_name,
        Pence::from(req.initial_budget),
    );
    if let Some(title) = req.title {
        lobby = lobby.with_title(title);
    }
    if let Some(hours) = req.expires_in_hours {
        // Duration::hours panics on extreme values, so gate the range before building one.
        if !(1..=MAX_EXPIRY_HOURS).contains(&hours) {
            return Err(ServerError::InvalidRequestBody(format!(
                "expires_in_hours must be between 1 and {MAX_EXPIRY_HOURS}"
            )));
        }
        lobby = lobby.with_expiry(Duration::hours(hours));
    }
    let state = api.create_lobby(lobby).await?;
    Ok(HttpResponse::Created().json(state))
}

#[get("/lobbies/{id}")]
pub async fn get_lobby(
    api: web::Data<LobbyApi>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let state = api.fetch_lobby(&id).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[get("/lobbies/{id}/status")]
pub async fn lobby_status(
    api: web::Data<LobbyApi>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let status = api.lobby_status(&id).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[post("/lobbies/{id}/join")]
pub async fn join_lobby(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<JoinRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let participant =
        api.join_lobby(&id, &user.user_id, &user.display_name, Pence::from(body.initial_budget)).await?;
    Ok(HttpResponse::Created().json(participant))
}

#[post("/lobbies/{id}/budget")]
pub async fn contribute_budget(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<ContributeRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let summary = api.contribute_budget(&id, &user.user_id, Pence::from(body.amount)).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[post("/lobbies/{id}/start-selection")]
pub async fn start_selection(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let state = api.start_selection(&id, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[put("/lobbies/{id}/selections")]
pub async fn update_selections(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<SelectionsRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let state = api.update_selections(&id, &user.user_id, body.into_inner().selections).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[post("/lobbies/{id}/ready")]
pub async fn set_ready(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<ReadyRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let status = if body.ready { SelectionStatus::Ready } else { SelectionStatus::NotReady };
    let state = api.set_selection_status(&id, &user.user_id, &user.user_id, status).await?;
    Ok(HttpResponse::Ok().json(state))
}

/// Resolves an invite token (the trailing segment of a share link) to its lobby.
#[get("/share/{token}")]
pub async fn resolve_share_token(
    api: web::Data<LobbyApi>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let token = path.into_inner();
    match api.fetch_lobby_by_share_token(&token).await? {
        Some(state) => Ok(HttpResponse::Ok().json(state)),
        None => Ok(HttpResponse::NotFound().json(JsonResponse::failure("No lobby matches this invite link"))),
    }
}

#[post("/lobbies/{id}/lock")]
pub async fn lock_lobby(
    api: web::Data<LobbyApi>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = GroupOrderId(path.into_inner());
    let outcome = api.lock_lobby(&id, &user.user_id).await?;
    let response = LockResponse { phase: outcome.lobby.phase(), placed_order_id: outcome.placed_order_id };
    Ok(HttpResponse::Ok().json(response))
}
