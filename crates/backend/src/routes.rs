use axum::{middleware, routing::get, Json, Router};
use serde_json::json;

use crate::shared::state::AppState;
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    // Все маршруты каталога требуют x-client-id
    let catalog = Router::new()
        .route(
            "/v1/",
            get(handlers::a001_offer::search).post(handlers::usecases::u501_sync_offers),
        )
        .route(
            "/v1/supplementaries",
            get(handlers::a001_offer::list_supplementaries),
        )
        .route("/v1/:id", get(handlers::a001_offer::get_by_id))
        .layer(middleware::from_fn(
            system::auth::middleware::require_client_id,
        ));

    Router::new()
        .route(
            "/health-check/",
            get(|| async { Json(json!({"status": "Running"})) }),
        )
        .merge(catalog)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::Config;
    use crate::shared::data::db::connect_in_memory;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use contracts::domain::a001_offer::Offer;
    use tower::ServiceExt;

    const CONFIG: &str = r#"
[database]
path = "unused.db"

[sync]
background = false

[categories.VPS]
category = "DATACENTER"
type = "VPS"
"#;

    async fn state(config: &str) -> AppState {
        let config: Config = toml::from_str(config).unwrap();
        let conn = connect_in_memory().await.unwrap();
        AppState::new(conn, &config).unwrap()
    }

    async fn app() -> Router {
        configure_routes(state(CONFIG).await)
    }

    fn sync_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/")
            .header("content-type", "application/json")
            .header("x-client-id", "bss")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-client-id", "bss")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const BATCH: &str = r#"{"syncOffers": [
        {"offer": {
            "offer_id": "P1", "offer_name": "VPS Small", "primary_flag": "1", "status": "2",
            "attrList": {"attr": [
                {"attr_code": "C_PH2_SERVICE_TYPE", "attr_value": "VPS", "attr_type": "1"},
                {"attr_code": "CN_CPU_NUM", "attr_value": "2", "attr_type": "1"}
            ]},
            "relationshipList": {"attached": [{"offeringID": "S1", "releationType": "1"}]}
        }}
    ]}"#;

    #[tokio::test]
    async fn health_check_needs_no_client_id() {
        let response = app()
            .await
            .oneshot(Request::get("/health-check/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "Running");
    }

    #[tokio::test]
    async fn missing_client_id_is_rejected() {
        let response = app()
            .await
            .oneshot(Request::get("/v1/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = app()
            .await
            .oneshot(sync_request("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sync_then_read_back() {
        let app = app().await;

        let response = app.clone().oneshot(sync_request(BATCH)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, serde_json::json!({}));

        let response = app
            .clone()
            .oneshot(get("/v1/?active=true&category=DATACENTER"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let offers: Vec<Offer> = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].spec.name, "VPS Small");
        assert_eq!(offers[0].spec.supplementaries.len(), 1);

        let response = app
            .clone()
            .oneshot(get(&format!("/v1/{}", offers[0].to_string_id())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let supplementary_id = offers[0].spec.supplementaries[0].value();
        let response = app
            .clone()
            .oneshot(get(&format!("/v1/supplementaries?ids={}", supplementary_id)))
            .await
            .unwrap();
        let stubs: Vec<Offer> = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].external_id.as_deref(), Some("S1"));
    }

    #[tokio::test]
    async fn unknown_offer_is_not_found() {
        let response = app()
            .await
            .oneshot(get(&format!("/v1/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inline_sync_failure_is_server_error() {
        let batch = BATCH.replace(r#""attr_value": "VPS""#, r#""attr_value": "UNMAPPED""#);
        let response = app().await.oneshot(sync_request(&batch)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn background_sync_answers_created_and_still_applies_valid_offers() {
        let state = state(&CONFIG.replace("background = false", "background = true")).await;
        let app = configure_routes(state.clone());
        let batch = r#"{"syncOffers": [
            {"offer": {"offer_id": "BAD", "offer_name": "Broken", "primary_flag": "1",
                       "status": "2", "offer_cata": "NOPE"}},
            {"offer": {"offer_id": "OK", "offer_name": "VPS Medium", "primary_flag": "1",
                       "status": "2", "offer_cata": "VPS"}}
        ]}"#;

        let response = app.oneshot(sync_request(batch)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, serde_json::json!({}));

        let mut synced = Vec::new();
        for _ in 0..100 {
            synced = state
                .offers
                .search(&crate::domain::a001_offer::repository::OfferFilter::default())
                .await
                .unwrap();
            if !synced.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0].external_id.as_deref(), Some("OK"));
        assert_eq!(synced[0].spec.name, "VPS Medium");
    }
}
