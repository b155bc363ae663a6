use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::foods::dtos::FoodResponseDto;
use crate::features::foods::models::CategoryFilter;
use crate::features::gacha::dtos::{
    CancelResponseDto, CategoryOptionsDto, CategoryQuery, GachaEventDto, GachaStateDto,
    SetCategoryDto, SpinResponseDto,
};
use crate::features::gacha::engine::GachaEvent;
use crate::features::gacha::services::GachaService;
use crate::shared::types::{ApiResponse, Meta};

/// Get the current gacha state
#[utoipa::path(
    get,
    path = "/api/gacha",
    responses(
        (status = 200, description = "Current state", body = ApiResponse<GachaStateDto>),
        (status = 500, description = "Store unavailable")
    ),
    tag = "gacha"
)]
pub async fn get_state(
    State(service): State<Arc<GachaService>>,
) -> Result<Json<ApiResponse<GachaStateDto>>> {
    let (snapshot, total) = service.state().await?;
    Ok(Json(ApiResponse::success(
        Some(GachaStateDto::new(snapshot, total)),
        None,
        None,
    )))
}

/// List category selectors
#[utoipa::path(
    get,
    path = "/api/gacha/categories",
    responses(
        (status = 200, description = "Category selectors", body = ApiResponse<CategoryOptionsDto>)
    ),
    tag = "gacha"
)]
pub async fn list_categories() -> Json<ApiResponse<CategoryOptionsDto>> {
    Json(ApiResponse::success(
        Some(CategoryOptionsDto::default()),
        None,
        None,
    ))
}

/// List the items a category would draw from
///
/// Only active items are returned, newest first.
#[utoipa::path(
    get,
    path = "/api/gacha/eligible",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Eligible items", body = ApiResponse<Vec<FoodResponseDto>>),
        (status = 500, description = "Store unavailable")
    ),
    tag = "gacha"
)]
pub async fn list_eligible(
    State(service): State<Arc<GachaService>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<FoodResponseDto>>>> {
    let category = CategoryFilter::parse(query.category.as_deref());
    let items: Vec<FoodResponseDto> = service
        .eligible(&category)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Change the active category
///
/// A running sequence keeps going on the new set, or stops if the set is empty.
#[utoipa::path(
    put,
    path = "/api/gacha/category",
    request_body = SetCategoryDto,
    responses(
        (status = 200, description = "State after the change", body = ApiResponse<GachaStateDto>),
        (status = 400, description = "Invalid request body"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "gacha"
)]
pub async fn set_category(
    State(service): State<Arc<GachaService>>,
    AppJson(dto): AppJson<SetCategoryDto>,
) -> Result<Json<ApiResponse<GachaStateDto>>> {
    let category = CategoryFilter::parse(Some(&dto.category));
    service.set_category(category).await?;

    let (snapshot, total) = service.state().await?;
    Ok(Json(ApiResponse::success(
        Some(GachaStateDto::new(snapshot, total)),
        None,
        None,
    )))
}

/// Start a reveal sequence
///
/// Does nothing when a sequence is already running or nothing is eligible.
#[utoipa::path(
    post,
    path = "/api/gacha/spin",
    responses(
        (status = 200, description = "Spin outcome", body = ApiResponse<SpinResponseDto>),
        (status = 500, description = "Store unavailable")
    ),
    tag = "gacha"
)]
pub async fn spin(
    State(service): State<Arc<GachaService>>,
) -> Result<Json<ApiResponse<SpinResponseDto>>> {
    let outcome = service.spin().await?;
    Ok(Json(ApiResponse::success(Some(outcome.into()), None, None)))
}

/// Cancel a running sequence
#[utoipa::path(
    post,
    path = "/api/gacha/cancel",
    responses(
        (status = 200, description = "Whether a sequence was cancelled", body = ApiResponse<CancelResponseDto>)
    ),
    tag = "gacha"
)]
pub async fn cancel(
    State(service): State<Arc<GachaService>>,
) -> Json<ApiResponse<CancelResponseDto>> {
    let cancelled = service.cancel();
    Json(ApiResponse::success(
        Some(CancelResponseDto { cancelled }),
        None,
        None,
    ))
}

fn to_sse_event(event: GachaEvent) -> Option<Event> {
    let name = event.name();
    match Event::default().event(name).json_data(GachaEventDto::from(event)) {
        Ok(e) => Some(e),
        Err(e) => {
            tracing::debug!("Failed to encode gacha event {}: {}", name, e);
            None
        }
    }
}

/// Stream gacha events
///
/// The first event (`state`) carries the current state. After that every
/// `started`, `tick`, `committed`, `cancelled` and `burst` event is forwarded
/// as it happens. Slow subscribers skip events they fell behind on.
#[utoipa::path(
    get,
    path = "/api/gacha/stream",
    responses(
        (status = 200, description = "Server-sent event stream", body = String, content_type = "text/event-stream"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "gacha"
)]
pub async fn stream(State(service): State<Arc<GachaService>>) -> Result<Response> {
    let receiver = service.subscribe_events();
    let (snapshot, total) = service.state().await?;

    let initial = Event::default()
        .event("state")
        .json_data(GachaStateDto::new(snapshot, total))
        .map_err(|e| AppError::Internal(format!("Failed to encode gacha state: {}", e)))?;

    let events = BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(event) => to_sse_event(event),
        Err(e) => {
            tracing::debug!("Gacha stream subscriber lagged: {}", e);
            None
        }
    });

    let stream = tokio_stream::once(initial)
        .chain(events)
        .map(Ok::<_, Infallible>);

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );

    Ok(sse.into_response())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};
    use tokio_stream::StreamExt;

    use crate::core::config::GachaConfig;
    use crate::modules::food_store::FoodStore;
    use crate::shared::test_helpers::{test_app, TestApp};

    fn fast_config() -> GachaConfig {
        GachaConfig {
            tick_interval: Duration::from_millis(5),
            max_ticks: 3,
            burst_offsets: vec![],
        }
    }

    async fn seeded_app() -> TestApp {
        seeded_app_with(fast_config()).await
    }

    async fn seeded_app_with(config: GachaConfig) -> TestApp {
        let app = test_app(config);
        let server = axum_test::TestServer::new(app.router.clone()).unwrap();
        for (name, category) in [
            ("Nasi Padang", "Makanan Berat"),
            ("Keripik", "Cemilan"),
            ("Es Teh", "Minuman"),
        ] {
            server
                .post("/items")
                .json(&json!({ "name": name, "category": category }))
                .await
                .assert_status(StatusCode::CREATED);
        }
        app
    }

    #[tokio::test]
    async fn test_initial_state_without_data() {
        let app = test_app(fast_config());
        let server = axum_test::TestServer::new(app.router).unwrap();

        let response = server.get("/api/gacha").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "idle");
        assert_eq!(body["data"]["totalCount"], 0);
        assert_eq!(
            body["data"]["displayName"],
            "Belum ada data makanan di database"
        );
    }

    #[tokio::test]
    async fn test_list_categories() {
        let app = test_app(fast_config());
        let server = axum_test::TestServer::new(app.router).unwrap();

        let body: Value = server.get("/api/gacha/categories").await.json();
        assert_eq!(body["data"]["all"], "ALL");
        assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_eligible_filters_by_category() {
        let app = seeded_app().await;
        let server = axum_test::TestServer::new(app.router).unwrap();

        let body: Value = server
            .get("/api/gacha/eligible")
            .add_query_param("category", "Cemilan")
            .await
            .json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["name"], "Keripik");

        let body: Value = server.get("/api/gacha/eligible").await.json();
        assert_eq!(body["meta"]["total"], 3);
    }

    #[tokio::test]
    async fn test_set_category_to_empty_selection() {
        let app = seeded_app().await;
        let server = axum_test::TestServer::new(app.router).unwrap();

        let body: Value = server
            .put("/api/gacha/category")
            .json(&json!({ "category": "Lainnya" }))
            .await
            .json();
        assert_eq!(body["data"]["category"], "Lainnya");
        assert_eq!(body["data"]["eligibleCount"], 0);
        assert_eq!(
            body["data"]["displayName"],
            "Tidak ada makanan untuk kategori ini"
        );

        let body: Value = server.post("/api/gacha/spin").await.json();
        assert_eq!(body["data"]["started"], false);
        assert_eq!(body["data"]["outcome"], "no_eligible_items");
    }

    #[tokio::test]
    async fn test_spin_commits_through_http() {
        let app = seeded_app().await;
        let server = axum_test::TestServer::new(app.router).unwrap();

        server
            .put("/api/gacha/category")
            .json(&json!({ "category": "Minuman" }))
            .await
            .assert_status_ok();

        let body: Value = server.post("/api/gacha/spin").await.json();
        assert_eq!(body["data"]["outcome"], "started");

        let body: Value = server.post("/api/gacha/spin").await.json();
        assert_eq!(body["data"]["outcome"], "already_running");

        tokio::time::sleep(Duration::from_millis(200)).await;

        let body: Value = server.get("/api/gacha").await.json();
        assert_eq!(body["data"]["status"], "idle");
        assert_eq!(body["data"]["current"]["name"], "Es Teh");
        assert_eq!(body["data"]["displayName"], "Es Teh");
    }

    #[tokio::test]
    async fn test_cancel_without_running_sequence() {
        let app = test_app(fast_config());
        let server = axum_test::TestServer::new(app.router).unwrap();

        let body: Value = server.post("/api/gacha/cancel").await.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["cancelled"], false);
    }

    #[tokio::test]
    async fn test_store_offline_fails_gacha_requests() {
        let app = seeded_app().await;
        app.store.set_available(false);
        app.catalog.invalidate().await;
        let server = axum_test::TestServer::new(app.router).unwrap();

        let response = server.post("/api/gacha/spin").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["success"], false);

        // store is still usable directly once back online
        app.store.set_available(true);
        assert_eq!(app.store.list_all().await.unwrap().len(), 3);
    }

    fn event_names(raw: &str) -> Vec<&str> {
        raw.lines()
            .filter_map(|line| line.strip_prefix("event:"))
            .map(str::trim)
            .collect()
    }

    #[tokio::test]
    async fn test_stream_sends_state_then_sequence_events() {
        let app = seeded_app_with(GachaConfig {
            tick_interval: Duration::from_millis(5),
            max_ticks: 3,
            burst_offsets: vec![
                Duration::ZERO,
                Duration::from_millis(10),
                Duration::from_millis(20),
            ],
        })
        .await;

        let response = super::stream(State(app.gacha.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        let mut body = response.into_body().into_data_stream();

        app.gacha.spin().await.unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        let mut raw = String::new();
        while event_names(&raw).iter().filter(|n| **n == "burst").count() < 3 {
            let chunk = tokio::time::timeout_at(deadline, body.next())
                .await
                .expect("stream stalled")
                .expect("stream ended")
                .unwrap();
            raw.push_str(std::str::from_utf8(&chunk).unwrap());
        }

        assert_eq!(
            event_names(&raw),
            vec![
                "state",
                "started",
                "tick",
                "tick",
                "tick",
                "committed",
                "burst",
                "burst",
                "burst"
            ]
        );

        let first_data = raw
            .lines()
            .find_map(|line| line.strip_prefix("data:"))
            .unwrap();
        let state: Value = serde_json::from_str(first_data.trim()).unwrap();
        assert_eq!(state["status"], "idle");
        assert_eq!(state["totalCount"], 3);

        let committed = raw
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| serde_json::from_str::<Value>(data.trim()).unwrap())
            .find(|event| event["type"] == "committed")
            .unwrap();
        assert!(committed["food"]["name"].is_string());
    }
}
