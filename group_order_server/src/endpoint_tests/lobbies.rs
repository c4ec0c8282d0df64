use actix_web::http::StatusCode;
use serde_json::json;

use super::helpers::{get, init_test_service, new_test_db, post, put, token_for};

#[actix_web::test]
async fn health_check_needs_no_token() {
    let service = init_test_service(new_test_db().await).await;
    let (status, _) = get(&service, "", "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn lobby_routes_reject_missing_tokens() {
    let service = init_test_service(new_test_db().await).await;
    let (status, body) = get(&service, "", "/api/lobbies/GRP-1-XXXXXX").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication Error. No access token provided.");
}

#[actix_web::test]
async fn full_lobby_flow_over_http() {
    let service = init_test_service(new_test_db().await).await;
    let alice = token_for("u_alice", "Alice Mbeki");
    let bob = token_for("u_bob", "Bob Osei");

    // Alice opens the lobby with a £10.00 opening contribution.
    let (status, state) = post(
        &service,
        &alice,
        "/api/lobbies",
        &json!({ "restaurant_name": "Mama T's Kitchen", "initial_budget": 1000 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state["order"]["phase"], "Budgeting");
    assert_eq!(state["participants"][0]["user_id"], "u_alice");
    let id = state["order"]["group_order_id"].as_str().unwrap().to_string();

    // Bob joins with £5.00.
    let (status, participant) =
        post(&service, &bob, &format!("/api/lobbies/{id}/join"), &json!({ "initial_budget": 500 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(participant["display_name"], "Bob Osei");
    assert_eq!(participant["initials"], "BO");

    // Bob revises his contribution. Contributions overwrite, so the pool is 1000 + 750.
    let (status, summary) =
        post(&service, &bob, &format!("/api/lobbies/{id}/budget"), &json!({ "amount": 750 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_budget"], 1750);
    assert_eq!(summary["participant_count"], 2);

    // Only Alice, the creator, can move the lobby on.
    let (status, _) = post(&service, &bob, &format!("/api/lobbies/{id}/start-selection"), &json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, state) = post(&service, &alice, &format!("/api/lobbies/{id}/start-selection"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["order"]["phase"], "Selection");

    // Joining is closed once selection starts.
    let charlie = token_for("u_charlie", "Charlie");
    let (status, _) =
        post(&service, &charlie, &format!("/api/lobbies/{id}/join"), &json!({ "initial_budget": 100 })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Both pick meals and mark themselves ready.
    let selections = json!({ "selections": [{ "meal_id": "m1", "name": "Jollof rice", "quantity": 2, "unit_price": 450 }] });
    for token in [&alice, &bob] {
        let (status, _) = put(&service, token, &format!("/api/lobbies/{id}/selections"), &selections).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = post(&service, token, &format!("/api/lobbies/{id}/ready"), &json!({ "ready": true })).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Alice locks. The order materializes exactly once.
    let (status, outcome) = post(&service, &alice, &format!("/api/lobbies/{id}/lock"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["phase"], "Locked");
    assert!(outcome["placed_order_id"].as_str().unwrap().starts_with("order_"));

    let (status, _) = post(&service, &alice, &format!("/api/lobbies/{id}/lock"), &json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, status_view) = get(&service, &bob, &format!("/api/lobbies/{id}/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_view["phase"], "Locked");
    assert_eq!(status_view["budget"]["total_budget"], 1750);
}

#[actix_web::test]
async fn starting_selection_with_an_empty_pool_fails() {
    let service = init_test_service(new_test_db().await).await;
    let creator = token_for("u_skint", "Skint Sam");
    let (status, state) = post(
        &service,
        &creator,
        "/api/lobbies",
        &json!({ "restaurant_name": "The Chippy", "initial_budget": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = state["order"]["group_order_id"].as_str().unwrap().to_string();
    let (status, body) = post(&service, &creator, &format!("/api/lobbies/{id}/start-selection"), &json!({})).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body["error"].as_str().unwrap().contains("budget"));
}

#[actix_web::test]
async fn unknown_lobbies_return_not_found() {
    let service = init_test_service(new_test_db().await).await;
    let token = token_for("u1", "User One");
    let (status, _) = get(&service, &token, "/api/lobbies/GRP-0-NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn negative_budgets_are_rejected() {
    let service = init_test_service(new_test_db().await).await;
    let token = token_for("u1", "User One");
    let (status, _) = post(
        &service,
        &token,
        "/api/lobbies",
        &json!({ "restaurant_name": "The Chippy", "initial_budget": -100 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn out_of_range_expiry_windows_are_rejected() {
    let service = init_test_service(new_test_db().await).await;
    let token = token_for("u1", "User One");
    for hours in [i64::MAX, i64::MIN, 0, 24 * 7 + 1] {
        let (status, body) = post(
            &service,
            &token,
            "/api/lobbies",
            &json!({ "restaurant_name": "The Chippy", "initial_budget": 100, "expires_in_hours": hours }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expires_in_hours = {hours} must be rejected");
        assert!(body["error"].as_str().unwrap().contains("expires_in_hours"));
    }

    // A sensible window is still accepted.
    let (status, _) = post(
        &service,
        &token,
        "/api/lobbies",
        &json!({ "restaurant_name": "The Chippy", "initial_budget": 100, "expires_in_hours": 48 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn share_tokens_resolve_to_their_lobby() {
    let service = init_test_service(new_test_db().await).await;
    let creator = token_for("u1", "User One");
    let (_, state) = post(
        &service,
        &creator,
        "/api/lobbies",
        &json!({ "restaurant_name": "Mama T's Kitchen", "initial_budget": 1000 }),
    )
    .await;
    let share_token = state["order"]["share_token"].as_str().unwrap().to_string();
    let id = state["order"]["group_order_id"].as_str().unwrap().to_string();

    let guest = token_for("u2", "User Two");
    let (status, resolved) = get(&service, &guest, &format!("/api/share/{share_token}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["order"]["group_order_id"], id.as_str());

    let (status, _) = get(&service, &guest, "/api/share/not-a-real-token").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
