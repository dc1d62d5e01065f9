use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use margarita_tour::api::{create_app, create_router};
use margarita_tour::config::{Config, StoreKind, SurrealConfig};
use margarita_tour::model::BarStats;
use margarita_tour::store::{MemoryStore, Store};

fn test_config() -> Config {
    Config {
        host: SocketAddr::from(([127, 0, 0, 1], 0)),
        bars: "3 Needs,Drink,Orlandos".to_string(),
        poll_interval: Duration::from_secs(5),
        log_directory: PathBuf::from("logs"),
        store_backend: StoreKind::Memory,
        surreal: SurrealConfig {
            endpoint: "mem://".to_string(),
            namespace: "margarita_tour".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        },
    }
}

fn server() -> TestServer {
    let config = test_config();
    let app = create_app(&config, Store::Memory(MemoryStore::default()))
        .expect("templates load from the crate root");
    TestServer::new(create_router(app)).expect("test server starts")
}

#[tokio::test]
async fn homepage_links_to_the_form_and_dashboard() {
    let server = server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Submit a rating"));
    assert!(body.contains("Live dashboard"));
}

#[tokio::test]
async fn submission_form_lists_the_lineup() {
    let server = server();

    let response = server.get("/submit").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"<option value="3 Needs">"#));
    assert!(body.contains(r#"<option value="Drink">"#));
    assert!(body.contains(r#"<option value="Orlandos">"#));
}

#[tokio::test]
async fn valid_submission_confirms_with_a_rounded_average() {
    let server = server();

    let response = server
        .post("/submit")
        .form(&[
            ("bar", "3 Needs"),
            ("margarita_rating", "7"),
            ("price_rating", "8"),
            ("atmosphere_rating", "8"),
            ("comments", "salt rim was perfect"),
        ])
        .await;

    response.assert_status_ok();
    let body = response.text();
    // 23 / 3 presented to 2 decimal places
    assert!(body.contains("7.67"), "confirmation must show the average: {body}");
    assert!(body.contains("salt rim was perfect"));
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let server = server();

    let response = server
        .post("/submit")
        .form(&[
            ("bar", "Drink"),
            ("margarita_rating", "11"),
            ("price_rating", "5"),
            ("atmosphere_rating", "5"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("between 1 and 10"));
}

#[tokio::test]
async fn missing_rating_is_rejected_by_name() {
    let server = server();

    let response = server
        .post("/submit")
        .form(&[
            ("bar", "Drink"),
            ("margarita_rating", "5"),
            ("atmosphere_rating", "5"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("price_rating"));
}

#[tokio::test]
async fn unknown_bar_is_rejected_and_the_table_stays_empty() {
    let server = server();

    let response = server
        .post("/submit")
        .form(&[
            ("bar", "Tiki Hut"),
            ("margarita_rating", "5"),
            ("price_rating", "5"),
            ("atmosphere_rating", "5"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Tiki Hut"));

    let snapshot = server.get("/api/ratings").await;
    snapshot.assert_status_ok();
    let rows: Vec<BarStats> = snapshot.json();
    assert!(rows.is_empty(), "a rejected submission must not create a row");
}

#[tokio::test]
async fn empty_table_serves_an_empty_snapshot() {
    let server = server();

    let response = server.get("/api/ratings").await;

    response.assert_status_ok();
    let rows: serde_json::Value = response.json();
    assert_eq!(rows, serde_json::json!([]));
}

#[tokio::test]
async fn snapshot_aggregates_and_sorts_by_bar() {
    let server = server();

    let submissions = [
        ("Orlandos", "10", "10", "10"),
        ("Drink", "7", "8", "9"),
        ("Orlandos", "2", "2", "2"),
    ];

    for (bar, margarita, price, atmosphere) in submissions {
        let response = server
            .post("/submit")
            .form(&[
                ("bar", bar),
                ("margarita_rating", margarita),
                ("price_rating", price),
                ("atmosphere_rating", atmosphere),
            ])
            .await;
        response.assert_status_ok();
    }

    let response = server.get("/api/ratings").await;
    response.assert_status_ok();
    let rows: Vec<BarStats> = response.json();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].bar, "Drink");
    assert_eq!(rows[0].rating_count, 1);
    assert_eq!(rows[0].average_rating, 8.0);
    assert_eq!(rows[1].bar, "Orlandos");
    assert_eq!(rows[1].rating_count, 2);
    assert_eq!(rows[1].average_rating, 6.0);
}

#[tokio::test]
async fn dashboard_embeds_the_poll_interval() {
    let server = server();

    let response = server.get("/dashboard").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("POLL_INTERVAL_MS = 5000"));
    assert!(body.contains("No Data Yet!"));
}
