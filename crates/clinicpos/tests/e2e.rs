// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the sales service.
//!
//! Each test builds an isolated TestHarness (temp SQLite ledger plus the real
//! router). Tests are independent and order-insensitive.

use std::sync::Arc;

use axum::http::StatusCode;
use clinicpos_gateway::{router, AppState};
use clinicpos_test_utils::{send, FailingStore, TestHarness};
use serde_json::{json, Value};

fn aspirin_sale() -> Value {
    json!({
        "cart": [{"item": "aspirin", "qty": 2}],
        "total": 9.5,
        "discount": 0,
        "name": "Jane",
        "op_number": "OP-1"
    })
}

fn ids(sales: &Value) -> Vec<i64> {
    sales
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

// ---- Record and list ----

#[tokio::test]
async fn checkout_round_trips_through_listing() {
    let harness = TestHarness::start().await.unwrap();

    let resp = harness.post_checkout(&aspirin_sale()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({"status": "success"}));

    let sales = harness.get("/sales").await.json();
    let newest = &sales[0];
    assert_eq!(newest["cart"], json!([{"item": "aspirin", "qty": 2}]));
    assert_eq!(newest["total"], json!(9.5));
    assert_eq!(newest["discount"], json!(0.0));
    assert_eq!(newest["name"], "Jane");
    assert_eq!(newest["op_number"], "OP-1");
    assert_eq!(newest["timestamp"].as_str().unwrap().len(), 19);
}

#[tokio::test]
async fn checkout_without_cart_writes_nothing() {
    let harness = TestHarness::start().await.unwrap();
    let mut body = aspirin_sale();
    body.as_object_mut().unwrap().remove("cart");

    let resp = harness.post_checkout(&body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["status"], "error");
    assert_eq!(harness.sale_count().await.unwrap(), 0);
}

#[tokio::test]
async fn each_empty_required_field_is_rejected() {
    let harness = TestHarness::start().await.unwrap();
    let blanks = [
        ("cart", json!([])),
        ("total", Value::Null),
        ("discount", Value::Null),
        ("name", json!("  ")),
        ("op_number", json!("")),
    ];
    for (field, blank) in blanks {
        let mut body = aspirin_sale();
        body[field] = blank;
        let resp = harness.post_checkout(&body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{field} accepted");
        assert!(resp.json()["message"].as_str().unwrap().contains(field));
    }
    assert_eq!(harness.sale_count().await.unwrap(), 0);
}

#[tokio::test]
async fn operator_fields_optional_when_configured() {
    let harness = TestHarness::builder()
        .require_operator(false)
        .build()
        .await
        .unwrap();
    let body = json!({"cart": [{"item": "gauze"}], "total": 3.0, "discount": 0.5});

    assert_eq!(harness.post_checkout(&body).await.status, StatusCode::OK);
    let sales = harness.get("/sales").await.json();
    assert!(sales[0]["name"].is_null());
    assert!(sales[0]["op_number"].is_null());
}

#[tokio::test]
async fn listing_is_newest_first() {
    let harness = TestHarness::start().await.unwrap();
    for _ in 0..3 {
        harness.post_checkout(&aspirin_sale()).await;
    }
    harness.insert_at("2020-01-01 00:00:00", 1.0).await.unwrap();

    let sales = harness.get("/sales").await.json();
    assert_eq!(ids(&sales), vec![4, 3, 2, 1]);
}

// ---- Filters ----

async fn seeded() -> TestHarness {
    let harness = TestHarness::start().await.unwrap();
    for ts in [
        "2023-01-15 09:00:00",
        "2024-01-15 08:00:00",
        "2024-01-15 23:59:59",
        "2024-01-16 00:00:00",
        "2024-03-02 12:00:00",
        "2023-03-09 12:00:00",
    ] {
        harness.insert_at(ts, 1.0).await.unwrap();
    }
    harness
}

#[tokio::test]
async fn date_filter_returns_only_that_day() {
    let harness = seeded().await;
    for query in [
        "date=2024-01-15",
        "date=2024-01-15&month=1",
        "date=2024-01-15&year=2024",
        "date=2024-01-15&month=01&year=2024",
    ] {
        let sales = harness.get(&format!("/sales?{query}")).await.json();
        assert_eq!(ids(&sales), vec![3, 2], "query {query}");
    }
    let sales = harness.get("/sales?date=2024-01-15&month=2").await.json();
    assert!(ids(&sales).is_empty());
}

#[tokio::test]
async fn month_matches_any_year_and_padding_is_optional() {
    let harness = seeded().await;
    let unpadded = harness.get("/sales?month=3").await.json();
    let padded = harness.get("/sales?month=03").await.json();
    assert_eq!(unpadded, padded);
    assert_eq!(ids(&padded), vec![6, 5]);
}

#[tokio::test]
async fn year_and_month_combine() {
    let harness = seeded().await;
    let sales = harness.get("/sales?year=2024&month=1").await.json();
    assert_eq!(ids(&sales), vec![4, 3, 2]);
}

#[tokio::test]
async fn empty_filter_values_are_ignored() {
    let harness = seeded().await;
    let sales = harness.get("/sales?date=&month=&year=").await.json();
    assert_eq!(sales.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn malformed_filters_are_rejected() {
    let harness = seeded().await;
    for query in ["month=13", "date=2024-02-30", "year=24", "date=15/01/2024"] {
        let resp = harness.get(&format!("/sales?{query}")).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(resp.json()["status"], "error");
    }
}

// ---- CSV export ----

#[tokio::test]
async fn csv_matches_json_listing() {
    let harness = seeded().await;
    harness.post_checkout(&aspirin_sale()).await;

    for query in ["", "?year=2024", "?month=3", "?date=2024-01-15"] {
        let sales = harness.get(&format!("/sales{query}")).await.json();
        let resp = harness.get(&format!("/export_csv{query}")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.header("content-type"), Some("text/csv; charset=utf-8"));
        assert_eq!(
            resp.header("content-disposition"),
            Some("attachment; filename=sales_report.csv")
        );

        let mut reader = csv::Reader::from_reader(resp.body.as_ref());
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            header,
            vec!["ID", "Name", "OP Number", "Cart", "Total", "Discount", "Timestamp"]
        );
        let csv_ids: Vec<i64> = reader
            .records()
            .map(|r| r.unwrap()[0].parse().unwrap())
            .collect();
        assert_eq!(csv_ids, ids(&sales), "query {query}");
    }
}

#[tokio::test]
async fn csv_cart_column_is_stored_text() {
    let harness = TestHarness::start().await.unwrap();
    harness.post_checkout(&aspirin_sale()).await;

    let resp = harness.get("/export_csv").await;
    let mut reader = csv::Reader::from_reader(resp.body.as_ref());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[3], r#"[{"item":"aspirin","qty":2}]"#);
    assert_eq!(&record[4], "9.5");
}

// ---- Failures and informational routes ----

#[tokio::test]
async fn storage_failures_surface_as_500() {
    let store = Arc::new(FailingStore::new("database disk image is malformed"));
    let app = router(AppState::new(store.clone(), true), true);

    let harness = TestHarness::start().await.unwrap();
    let checkout = axum::http::Request::builder()
        .method("POST")
        .uri("/checkout")
        .body(axum::body::Body::from(aspirin_sale().to_string()))
        .unwrap();
    let resp = send(app.clone(), checkout).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("malformed"));

    for uri in ["/sales", "/export_csv"] {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(send(app.clone(), req).await.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert_eq!(store.calls(), 3);

    // The healthy ledger is unaffected.
    assert_eq!(harness.get("/sales").await.status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_checkout_never_reaches_the_store() {
    let store = Arc::new(FailingStore::default());
    let app = router(AppState::new(store.clone(), true), false);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/checkout")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    assert_eq!(send(app, req).await.status, StatusCode::BAD_REQUEST);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn informational_routes() {
    let harness = TestHarness::start().await.unwrap();

    let home = harness.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.header("content-type").unwrap().starts_with("text/html"));
    assert!(home.text().contains("/export_csv"));

    let hint = harness.get("/checkout").await;
    assert_eq!(hint.status, StatusCode::OK);
    assert!(hint.text().contains("POST"));

    let health = harness.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let harness = TestHarness::start().await.unwrap();
    let req = axum::http::Request::builder()
        .uri("/sales")
        .header("origin", "http://till.local")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = harness.request(req).await;
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
}

// ---- Legacy ledgers ----

const LEGACY_LEDGER: &str = "
    CREATE TABLE sales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cart_json TEXT,
        total REAL,
        discount REAL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    INSERT INTO sales (id, cart_json, total, discount, timestamp)
        VALUES (1, '[{\"item\": \"gauze\"}]', 4.0, 0.0, '2023-11-02 09:00:00');
    INSERT INTO sales (id, cart_json, total, discount, timestamp)
        VALUES (5, '[{\"item\": \"aspirin\", \"qty\": 1}]', 2.5, 0.5, '2024-01-15 10:30:00');
";

#[tokio::test]
async fn legacy_ledger_is_adopted_intact() {
    let harness = TestHarness::builder()
        .seed_sql(LEGACY_LEDGER)
        .build()
        .await
        .unwrap();
    assert_eq!(harness.migration_report.adopted_rows, Some(2));

    let sales = harness.get("/sales").await.json();
    assert_eq!(ids(&sales), vec![5, 1]);
    assert_eq!(sales[0]["cart"], json!([{"item": "aspirin", "qty": 1}]));
    assert_eq!(sales[0]["timestamp"], "2024-01-15 10:30:00");
    assert!(sales[0]["name"].is_null());

    // New sales continue after the highest legacy id.
    harness.post_checkout(&aspirin_sale()).await;
    let sales = harness.get("/sales").await.json();
    assert_eq!(ids(&sales), vec![6, 5, 1]);

    let csv = harness.get("/export_csv").await.text();
    assert!(csv.lines().any(|l| l.starts_with("1,,,")));
}

#[tokio::test]
async fn reinitializing_an_adopted_ledger_is_a_no_op() {
    let harness = TestHarness::builder()
        .seed_sql(LEGACY_LEDGER)
        .build()
        .await
        .unwrap();

    let report = clinicpos_storage::Database::at_path(harness.db_path())
        .migrate()
        .await
        .unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(report.adopted_rows, None);
    assert_eq!(harness.sale_count().await.unwrap(), 2);
}

#[tokio::test]
async fn legacy_text_amounts_do_not_break_listings() {
    let seed = format!(
        "{LEGACY_LEDGER}
         INSERT INTO sales (id, cart_json, total, discount, timestamp)
             VALUES (7, '[{{\"item\": \"swab\"}}]', '', 0, '2024-02-01 09:00:00');"
    );
    let harness = TestHarness::builder().seed_sql(seed).build().await.unwrap();

    let resp = harness.get("/sales").await;
    assert_eq!(resp.status, StatusCode::OK);
    let sales = resp.json();
    assert_eq!(ids(&sales), vec![7, 5, 1]);
    assert_eq!(sales[0]["total"], json!(0.0));

    let csv = harness.get("/export_csv").await;
    assert_eq!(csv.status, StatusCode::OK);
    assert_eq!(csv.text().lines().count(), 4);
}

#[tokio::test]
async fn adoption_keeps_the_legacy_id_high_water_mark() {
    let seed = format!("{LEGACY_LEDGER}\nDELETE FROM sales WHERE id = 5;");
    let harness = TestHarness::builder().seed_sql(seed).build().await.unwrap();

    harness.post_checkout(&aspirin_sale()).await;
    let sales = harness.get("/sales").await.json();
    assert_eq!(ids(&sales), vec![6, 1]);
}
