//! Integration test: record-store flow over HTTP.
//!
//! Submits contacts to a file-backed database, classifies them by id, and
//! checks the rows survive reopening the database.

mod common;

use common::{browser, post_form, spawn, SHOPKEEPER};
use serde_json::Value;
use shopform_db::queries::contacts;
use shopform_server::store::{self, StoreState};
use shopform_types::ClassificationPolicy;

async fn json(response: reqwest::Response) -> Value {
    response.json().await.expect("json body")
}

#[tokio::test]
async fn submit_classify_and_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("shopform.db");

    let conn = shopform_db::open(&db_path).expect("open db");
    let base = spawn(store::router(StoreState::new(conn, ClassificationPolicy::Strict))).await;
    let client = browser();

    // Home page carries both forms.
    let home = client.get(format!("{base}/")).send().await.expect("home");
    assert_eq!(home.status(), 200);
    let page = home.text().await.expect("home text");
    assert!(page.contains("/submit_user_data/"));
    assert!(page.contains("/classify_users/"));

    // Two submissions with the same email get distinct ids.
    let first = json(post_form(&client, &format!("{base}/submit_user_data/"), &SHOPKEEPER).await).await;
    let second = json(post_form(&client, &format!("{base}/submit_user_data/"), &SHOPKEEPER).await).await;
    assert_eq!(first["message"], "User data submitted successfully!");
    let first_id = first["user_id"].as_i64().expect("first id");
    let second_id = second["user_id"].as_i64().expect("second id");
    assert_ne!(first_id, second_id);

    // Classify the second one; input is uppercased.
    let id_text = second_id.to_string();
    let response = post_form(
        &client,
        &format!("{base}/classify_users/"),
        &[("user_id", id_text.as_str()), ("classification", "c")],
    )
    .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        json(response).await["message"],
        "User classification updated successfully!"
    );

    let record = json(
        client
            .get(format!("{base}/users/{second_id}"))
            .send()
            .await
            .expect("get user"),
    )
    .await;
    assert_eq!(record["classification"], "C");
    assert_eq!(record["name"], "Ravi & Sons");

    // The record is on disk, untouched records stay unclassified.
    let conn = shopform_db::open(&db_path).expect("reopen db");
    assert_eq!(contacts::count(&conn).expect("count"), 2);
    assert_eq!(
        contacts::get(&conn, second_id).expect("second").classification.as_deref(),
        Some("C")
    );
    assert_eq!(contacts::get(&conn, first_id).expect("first").classification, None);
}

#[tokio::test]
async fn rejected_requests_leave_store_unchanged() {
    let conn = shopform_db::open_memory().expect("open db");
    let state = StoreState::new(conn, ClassificationPolicy::Strict);
    let base = spawn(store::router(state.clone())).await;
    let client = browser();

    // Missing locality.
    let response = post_form(&client, &format!("{base}/submit_user_data/"), &SHOPKEEPER[..4]).await;
    assert_eq!(response.status(), 400);
    assert_eq!(json(response).await["detail"], "field required: locality");

    // Unknown id.
    let response = post_form(
        &client,
        &format!("{base}/classify_users/"),
        &[("user_id", "77"), ("classification", "A")],
    )
    .await;
    assert_eq!(response.status(), 404);

    // Label outside A/B/C under the strict policy.
    let created = json(post_form(&client, &format!("{base}/submit_user_data/"), &SHOPKEEPER).await).await;
    let id_text = created["user_id"].as_i64().expect("id").to_string();
    let response = post_form(
        &client,
        &format!("{base}/classify_users/"),
        &[("user_id", id_text.as_str()), ("classification", "premium")],
    )
    .await;
    assert_eq!(response.status(), 400);

    let db = state.db.lock().await;
    assert_eq!(contacts::count(&db).expect("count"), 1);
    let listed = contacts::list(&db).expect("list");
    assert_eq!(listed[0].classification, None);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let conn = shopform_db::open_memory().expect("open db");
    let base = spawn(store::router(StoreState::new(conn, ClassificationPolicy::Lenient))).await;

    let body = json(browser().get(format!("{base}/healthz")).send().await.expect("healthz")).await;
    assert_eq!(body["status"], "ok");
}
