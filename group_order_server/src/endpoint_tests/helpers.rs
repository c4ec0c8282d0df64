use actix_http::Request;
use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
};
use chrono::Utc;
use group_order_engine::{
    events::EventProducers,
    test_utils::{prepare_test_env, random_db_path},
    LobbyFlowApi,
    LocalOrderService,
    SqliteDatabase,
};
use serde::Serialize;

use crate::{
    auth::{issue_token, TokenClaims},
    config::AuthConfig,
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

// Any fixed secret will do for tests. DO NOT re-use it anywhere.
pub const TEST_SECRET: &str = "gos-endpoint-test-do-not-reuse";

pub fn token_for(user_id: &str, name: &str) -> String {
    let claims =
        TokenClaims { user_id: user_id.to_string(), name: name.to_string(), exp: Utc::now().timestamp() + 3600 };
    issue_token(&claims, TEST_SECRET)
}

/// Creates a fresh, migrated SQLite database for a single test.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to test database")
}

/// Builds the same route tree as the production server, minus middleware, against the given database.
pub async fn init_test_service(
    db: SqliteDatabase,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let api = LobbyFlowApi::new(db, LocalOrderService, EventProducers::default());
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
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(AuthConfig::new(TEST_SECRET)))
        .service(health)
        .service(api_scope);
    test::init_service(app).await
}

pub async fn get<S>(service: &S, token: &str, path: &str) -> (StatusCode, serde_json::Value)
where S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let mut req = TestRequest::get().uri(path);
    if !token.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    send(service, req.to_request()).await
}

pub async fn post<S, B>(service: &S, token: &str, path: &str, body: &B) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    B: Serialize,
{
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();
    send(service, req).await
}

pub async fn put<S, B>(service: &S, token: &str, path: &str, body: &B) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    B: Serialize,
{
    let req = TestRequest::put()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();
    send(service, req).await
}

async fn send<S>(service: &S, req: Request) -> (StatusCode, serde_json::Value)
where S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let res = test::call_service(service, req).await;
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().expect("Response body was not complete");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
