use std::str::FromStr;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use finance_server::db::DatabaseConnection;
use finance_server::{create_router, AppState, ServerConfig};

async fn test_app() -> Router {
    let db = DatabaseConnection::with_max_connections("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");
    create_router(AppState::new(db, &ServerConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn amount(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("amount serialized as string")).unwrap()
}

async fn create_building(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/v1/buildings", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn add_bill(app: &Router, building_id: &str, bill: Value) -> String {
    let uri = format!("/api/v1/buildings/{}/bills", building_id);
    let (status, body) = send(app, "POST", &uri, Some(bill)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Utilities of 2500 monthly, insurance of 6000 quarterly, two paying units
async fn seeded_building(app: &Router, name: &str) -> String {
    let id = create_building(app, name).await;
    add_bill(
        app,
        &id,
        json!({
            "category": "utilities",
            "totalAmount": "2500",
            "recurrence": "monthly",
            "startDate": "2024-01-01"
        }),
    )
    .await;
    add_bill(
        app,
        &id,
        json!({
            "category": "insurance",
            "totalAmount": "6000",
            "recurrence": "quarterly",
            "startDate": "2024-01-01"
        }),
    )
    .await;
    for (unit, fee) in [("101", "1800"), ("102", "1650")] {
        let uri = format!("/api/v1/buildings/{}/residences", id);
        let (status, _) = send(
            app,
            "POST",
            &uri,
            Some(json!({ "unitNumber": unit, "monthlyFee": fee })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    id
}

fn projection_uri(building_id: &str, query: &str) -> String {
    format!("/api/v1/buildings/{}/financial-projection?{}", building_id, query)
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_projection_monthly_totals() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;

    let (status, body) = send(&app, "GET", &projection_uri(&id, "startYear=2024&endYear=2024"), None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    let records = data["records"].as_array().unwrap();
    assert_eq!(records.len(), 12);
    assert_eq!(amount(&records[0]["totalExpenses"]), Decimal::from(8500));
    assert_eq!(amount(&records[1]["totalExpenses"]), Decimal::from(2500));
    assert_eq!(amount(&records[0]["totalIncome"]), Decimal::from(3450));
    assert_eq!(amount(&data["summary"]["totalExpenses"]), Decimal::from(54000));
    assert_eq!(amount(&data["summary"]["totalIncome"]), Decimal::from(41400));
    assert_eq!(data["metadata"]["cached"], false);
    assert_eq!(data["metadata"]["groupBy"], "monthly");
}

#[tokio::test]
async fn test_second_read_is_cached() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;
    let uri = projection_uri(&id, "startYear=2024&endYear=2025");

    let (_, first) = send(&app, "GET", &uri, None).await;
    let (_, second) = send(&app, "GET", &uri, None).await;

    assert_eq!(first["data"]["metadata"]["cached"], false);
    assert_eq!(second["data"]["metadata"]["cached"], true);
    assert_eq!(first["data"]["records"], second["data"]["records"]);
    assert_eq!(first["data"]["summary"], second["data"]["summary"]);

    let (_, forced) = send(&app, "GET", &format!("{}&forceRefresh=true", uri), None).await;
    assert_eq!(forced["data"]["metadata"]["cached"], false);
}

#[tokio::test]
async fn test_projection_rejects_bad_years() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;

    for query in [
        "startYear=2024",
        "startYear=2025&endYear=2024",
        "startYear=2024&endYear=2060",
        "startYear=2024&endYear=2024&groupBy=weekly",
    ] {
        let (status, _) = send(&app, "GET", &projection_uri(&id, query), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
    }
}

#[tokio::test]
async fn test_projection_unknown_building() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "GET",
        &projection_uri("missing", "startYear=2024&endYear=2024"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BUILDING_NOT_FOUND");
}

#[tokio::test]
async fn test_yearly_grouping() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;

    let (_, body) = send(
        &app,
        "GET",
        &projection_uri(&id, "startYear=2024&endYear=2025&groupBy=yearly"),
        None,
    )
    .await;
    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["year"], 2024);
    assert!(records[0].get("month").is_none());
    assert_eq!(amount(&records[0]["totalExpenses"]), Decimal::from(54000));
}

#[tokio::test]
async fn test_new_bill_invalidates_cache() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;
    let uri = projection_uri(&id, "startYear=2024&endYear=2024");
    send(&app, "GET", &uri, None).await;

    add_bill(
        &app,
        &id,
        json!({
            "category": "maintenance",
            "totalAmount": "1200",
            "recurrence": "custom",
            "customDates": ["2024-02-15"],
            "startDate": "2024-02-01"
        }),
    )
    .await;

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["metadata"]["cached"], false);
    assert_eq!(
        amount(&body["data"]["records"][1]["totalExpenses"]),
        Decimal::from(3700)
    );
}

#[tokio::test]
async fn test_moving_bill_invalidates_both_buildings() {
    let app = test_app().await;
    let from = seeded_building(&app, "Les Jardins").await;
    let to = seeded_building(&app, "Le Carré").await;
    let bill_id = add_bill(
        &app,
        &from,
        json!({
            "category": "snow removal",
            "totalAmount": "900",
            "recurrence": "yearly",
            "startDate": "2024-01-01"
        }),
    )
    .await;

    let from_uri = projection_uri(&from, "startYear=2024&endYear=2024");
    let to_uri = projection_uri(&to, "startYear=2024&endYear=2024");
    send(&app, "GET", &from_uri, None).await;
    send(&app, "GET", &to_uri, None).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/bills/{}", bill_id),
        Some(json!({ "buildingId": to })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, from_body) = send(&app, "GET", &from_uri, None).await;
    let (_, to_body) = send(&app, "GET", &to_uri, None).await;
    assert_eq!(from_body["data"]["metadata"]["cached"], false);
    assert_eq!(to_body["data"]["metadata"]["cached"], false);
    assert_eq!(amount(&from_body["data"]["summary"]["totalExpenses"]), Decimal::from(54000));
    assert_eq!(amount(&to_body["data"]["summary"]["totalExpenses"]), Decimal::from(54900));
}

#[tokio::test]
async fn test_manual_invalidation_and_refresh() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;
    let uri = projection_uri(&id, "startYear=2024&endYear=2024");
    send(&app, "GET", &uri, None).await;

    let cache_uri = format!("/api/v1/buildings/{}/financial-projection/cache", id);
    let (status, body) = send(&app, "DELETE", &cache_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);

    let refresh_uri = format!(
        "/api/v1/buildings/{}/financial-projection/refresh?startYear=2024&endYear=2024",
        id
    );
    let (status, body) = send(&app, "POST", &refresh_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metadata"]["cached"], false);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["metadata"]["cached"], true);
}

#[tokio::test]
async fn test_summary_reports_failures() {
    let app = test_app().await;
    let first = seeded_building(&app, "Les Jardins").await;
    let second = seeded_building(&app, "Le Carré").await;

    let uri = format!(
        "/api/v1/financial-projection/summary?buildingIds={},missing,{}&year=2024",
        first, second
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["succeededCount"], 2);
    assert_eq!(data["failedCount"], 1);
    assert_eq!(data["failed"][0]["buildingId"], "missing");
    assert_eq!(amount(&data["aggregate"]["totalExpenses"]), Decimal::from(108000));
}

#[tokio::test]
async fn test_summary_requires_buildings() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/financial-projection/summary?buildingIds=&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_stats_and_sweep() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;
    send(&app, "GET", &projection_uri(&id, "startYear=2024&endYear=2024"), None).await;
    send(&app, "GET", &projection_uri(&id, "startYear=2025&endYear=2025"), None).await;

    let (status, body) = send(&app, "GET", "/api/v1/financial-projection/cache/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalEntries"], 2);
    assert_eq!(body["data"]["expiredEntries"], 0);
    assert!(body["data"]["ttlSeconds"].as_u64().unwrap() > 0);

    let (status, body) = send(&app, "POST", "/api/v1/financial-projection/cache/sweep", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 0);
}

#[tokio::test]
async fn test_deleted_building_projection_is_not_found() {
    let app = test_app().await;
    let id = seeded_building(&app, "Les Jardins").await;
    let uri = projection_uri(&id, "startYear=2024&endYear=2024");
    send(&app, "GET", &uri, None).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/buildings/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_bill_rejected() {
    let app = test_app().await;
    let id = create_building(&app, "Les Jardins").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/buildings/{}/bills", id),
        Some(json!({
            "category": "utilities",
            "totalAmount": "100",
            "recurrence": "fortnightly",
            "startDate": "2024-01-01"
        })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/buildings/missing/bills",
        Some(json!({
            "category": "utilities",
            "totalAmount": "100",
            "recurrence": "monthly",
            "startDate": "2024-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_amount_rejected() {
    let app = test_app().await;
    let id = create_building(&app, "Les Jardins").await;

    for amount in ["79228162514264337593543950335", "1e28"] {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/buildings/{}/bills", id),
            Some(json!({
                "category": "utilities",
                "totalAmount": amount,
                "recurrence": "weekly",
                "startDate": "2024-01-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", amount);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
