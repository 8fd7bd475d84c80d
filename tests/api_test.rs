//! End-to-end tests against the HTTP surface: token issuance, the auth
//! guard, CRUD round trips and the query surface.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use sechub::models::UserPayload;
use sechub::{AppState, Config, Database};

fn admin_payload() -> UserPayload {
    UserPayload {
        username: Some("admin".to_string()),
        name: Some("Anna".to_string()),
        surname: Some("Adminova".to_string()),
        middle_name: None,
        phone: Some("+79990000000".to_string()),
        email: Some("admin@example.com".to_string()),
        password: Some("correct horse".to_string()),
        is_superuser: Some(true),
        is_active: Some(true),
    }
}

/// App over an in-memory database with one seeded superuser, plus a valid
/// access token for that superuser.
async fn app_with_admin() -> (Router, String) {
    let db = Database::in_memory().await.unwrap();
    sechub::identity::create_superuser(&db, &admin_payload())
        .await
        .unwrap();

    let config = Config {
        jwt_secret: "test-secret".to_string(),
        ..Config::default()
    };
    let app = sechub::routes(AppState::new(db, &config));

    let response = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "admin", "password": "correct horse" })),
    )
    .await;
    assert_eq!(response.0, StatusCode::OK);
    let access = response.1["access"].as_str().unwrap().to_string();

    (app, access)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let (app, _token) = app_with_admin().await;

    let (status, _) = send(&app, "GET", "/groups", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/groups",
        None,
        Some(json!({ "name": "audit" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/groups", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let (app, _token) = app_with_admin().await;
    let (status, _) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "admin", "password": "wrong horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn group_crud_round_trip() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (status, created) = send(
        &app,
        "POST",
        "/groups",
        token,
        Some(json!({ "name": "audit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "audit");
    assert_eq!(created["is_active"], true);

    let (status, fetched) = send(&app, "GET", &format!("/groups/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "audit");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/groups/{}", id),
        token,
        Some(json!({ "name": "audit-2024", "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "audit-2024");
    assert_eq!(updated["is_active"], false);

    let (status, _) = send(&app, "DELETE", &format!("/groups/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/groups/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_group_name_conflicts() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (status, _) = send(&app, "POST", "/groups", token, Some(json!({ "name": "audit" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/groups", token, Some(json!({ "name": "audit" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn user_validation_surfaces_field_errors() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        token,
        Some(json!({
            "username": "ivanov",
            "name": "Ivan",
            "surname": "Ivanov",
            "email": "ivanov@example.com",
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "phone");

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        token,
        Some(json!({
            "username": "ivanov",
            "name": "Ivan",
            "surname": "Ivanov",
            "phone": "+79123456789",
            "email": "not-an-email",
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn created_user_response_never_contains_password_material() {
    let (app, token) = app_with_admin().await;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(token.as_str()),
        Some(json!({
            "username": "ivanov",
            "name": "Ivan",
            "surname": "Ivanov",
            "phone": "+79123456789",
            "email": "ivanov@example.com",
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn superuser_creation_requires_a_superuser_caller() {
    let (app, admin_token) = app_with_admin().await;

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(admin_token.as_str()),
        Some(json!({
            "username": "regular",
            "name": "Pyotr",
            "surname": "Petrov",
            "phone": "+79123456780",
            "email": "petrov@example.com",
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, pair) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "regular", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let regular_token = pair["access"].as_str().unwrap().to_string();

    let escalation = json!({
        "username": "wannabe",
        "name": "Eve",
        "surname": "Evseeva",
        "phone": "+79123456781",
        "email": "eve@example.com",
        "password": "correct horse",
        "is_superuser": true
    });

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(regular_token.as_str()),
        Some(escalation.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(admin_token.as_str()),
        Some(escalation),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_superuser"], true);
}

#[tokio::test]
async fn infosystem_type_is_validated_at_the_edge() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (_, group) = send(&app, "POST", "/groups", token, Some(json!({ "name": "audit" }))).await;
    let group_id = group["id"].as_i64().unwrap();
    let (_, org) = send(
        &app,
        "POST",
        "/organizations",
        token,
        Some(json!({ "name": "Acme", "group_id": group_id })),
    )
    .await;
    let (_, object) = send(
        &app,
        "POST",
        "/objects",
        token,
        Some(json!({
            "name": "HQ",
            "group_id": group_id,
            "organization_id": org["id"].as_i64().unwrap()
        })),
    )
    .await;
    let object_id = object["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/infosystems",
        token,
        Some(json!({ "name": "Billing", "type": "OTHER", "object_id": object_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "type");

    let (status, created) = send(
        &app,
        "POST",
        "/infosystems",
        token,
        Some(json!({ "name": "Billing", "type": "GIS_ISPDN", "object_id": object_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "GIS_ISPDN");
}

#[tokio::test]
async fn project_deadline_is_required_and_must_be_a_date() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (_, group) = send(&app, "POST", "/groups", token, Some(json!({ "name": "audit" }))).await;
    let group_id = group["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        token,
        Some(json!({
            "name": "Certification",
            "deadline": "soon",
            "infosystem_id": 1,
            "group_rp_id": group_id,
            "group_work_id": group_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "deadline");
}

#[tokio::test]
async fn lists_are_paginated_and_filterable() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    for i in 0..5 {
        let (status, _) = send(
            &app,
            "POST",
            "/groups",
            token,
            Some(json!({ "name": format!("group-{}", i), "is_active": i % 2 == 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, "GET", "/groups?limit=2", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    // newest first
    assert_eq!(page["items"][0]["name"], "group-4");

    let (status, page) = send(&app, "GET", "/groups?is_active=false", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);

    let (status, page) = send(&app, "GET", "/groups?search=group-3", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (status, _) = send(&app, "GET", "/groups?colour=red", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_tokens_rotate_and_blacklist() {
    let (app, _token) = app_with_admin().await;

    let (_, pair) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "admin", "password": "correct horse" })),
    )
    .await;
    let refresh = pair["refresh"].as_str().unwrap().to_string();

    let (status, rotated) = send(
        &app,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(rotated["access"].is_string());

    // the superseded refresh token is blacklisted
    let (status, _) = send(
        &app,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // a refresh token is not an access token
    let (status, _) = send(
        &app,
        "GET",
        "/groups",
        Some(rotated["refresh"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cascading_delete_over_http() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (_, group) = send(&app, "POST", "/groups", token, Some(json!({ "name": "audit" }))).await;
    let group_id = group["id"].as_i64().unwrap();
    let (_, org) = send(
        &app,
        "POST",
        "/organizations",
        token,
        Some(json!({ "name": "Acme", "group_id": group_id })),
    )
    .await;
    let org_id = org["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/groups/{}", group_id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/organizations/{}", org_id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_can_be_ordered_by_join_date() {
    let (app, token) = app_with_admin().await;
    let token = Some(token.as_str());

    let (status, page) = send(&app, "GET", "/users?ordering=-date_joined", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"].as_i64(), Some(1));

    let (status, _) = send(&app, "GET", "/users?ordering=last_login", token, None).await;
    assert_eq!(status, StatusCode::OK);

    // the stored hash stays out of the query surface
    let (status, _) = send(&app, "GET", "/users?ordering=password_hash", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deactivated_user_is_locked_out() {
    let (app, admin) = app_with_admin().await;
    let admin = Some(admin.as_str());

    let (status, user) = send(
        &app,
        "POST",
        "/users",
        admin,
        Some(json!({
            "username": "petrov",
            "name": "Petr",
            "surname": "Petrov",
            "phone": "+79161234567",
            "email": "petrov@example.com",
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().unwrap();

    let (status, pair) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "petrov", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = pair["access"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/groups", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);

    // full-replace update, password omitted keeps the stored hash
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{}", user_id),
        admin,
        Some(json!({
            "username": "petrov",
            "name": "Petr",
            "surname": "Petrov",
            "phone": "+79161234567",
            "email": "petrov@example.com",
            "is_active": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the still-valid access token no longer opens anything
    let (status, _) = send(&app, "GET", "/groups", Some(&access), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // and a fresh login with the right password is refused too
    let (status, _) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "petrov", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
