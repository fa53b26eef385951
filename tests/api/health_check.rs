use crate::helpers::{spawn_app, spawn_app_without_debug_endpoints};

#[tokio::test]
async fn health_check_works() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "festive-notifications-api");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn the_vapid_public_key_is_served() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(format!("{}/api/vapid-public-key", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["publicKey"], app.vapid_public_key.as_str());
}

#[tokio::test]
async fn unknown_api_paths_return_a_404_listing_the_endpoints() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(format!("{}/api/does-not-exist", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "API endpoint not found");
    let endpoints = body["availableEndpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /api/subscribe"));
}

#[tokio::test]
async fn requests_from_the_allowed_origin_get_cors_headers() {
    // arrange
    let app = spawn_app().await;

    // act
    let allowed = app
        .api_client
        .get(format!("{}/api/health", app.address))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .expect("Failed to execute request.");
    let other = app
        .api_client
        .get(format!("{}/api/health", app.address))
        .header("Origin", "https://elsewhere.example")
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert_eq!(allowed.headers()["access-control-allow-credentials"], "true");
    assert!(other.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn preflight_requests_are_answered_with_no_content() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/admin/subscriptions", app.address),
        )
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 204);
    assert!(response
        .headers()
        .get("access-control-allow-methods")
        .is_some());
}

#[tokio::test]
async fn the_debug_endpoint_reports_the_token_without_revealing_it() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(format!("{}/api/admin/debug-token", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let text = response.text().await.unwrap();
    assert!(!text.contains(&app.admin_token));
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["configured"], true);
    assert_eq!(body["length"], app.admin_token.len());
}

#[tokio::test]
async fn the_debug_endpoint_is_not_mounted_when_disabled() {
    // arrange
    let app = spawn_app_without_debug_endpoints().await;

    // act
    let response = app
        .api_client
        .get(format!("{}/api/admin/debug-token", app.address))
        .bearer_auth(&app.admin_token)
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "API endpoint not found");
    assert!(body["availableEndpoints"].is_array());
}
