//! Record-store server: intake and classification over SQLite.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Serialize;
use shopform_db::queries::contacts;
use shopform_types::{ClassificationPolicy, ContactRecord};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::AppError;
use crate::forms::{ClassifyForm, IntakeForm};
use crate::{html, now_secs};

/// Shared state of the store server.
#[derive(Clone)]
pub struct StoreState {
    /// Database connection.
    pub db: Arc<Mutex<rusqlite::Connection>>,
    /// How classification input is checked.
    pub policy: ClassificationPolicy,
}

impl StoreState {
    pub fn new(conn: rusqlite::Connection, policy: ClassificationPolicy) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            policy,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Build the store server's router.
pub fn router(state: StoreState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/submit_user_data/", post(submit_user_data))
        .route("/classify_users/", post(classify_users))
        .route("/users/", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/healthz", get(crate::healthz))
        .with_state(state)
}

pub async fn home() -> Html<String> {
    Html(html::store_home())
}

/// Insert one contact and return its generated id.
pub async fn submit_user_data(
    State(state): State<StoreState>,
    Form(form): Form<IntakeForm>,
) -> Result<Json<SubmitResponse>, AppError> {
    let details = form.into_details()?;
    let user_id = {
        let db = state.db.lock().await;
        contacts::insert(&db, &details, now_secs())?
    };
    info!(user_id, "Contact submitted");
    Ok(Json(SubmitResponse {
        message: "User data submitted successfully!",
        user_id,
    }))
}

/// Set the classification of an existing contact.
pub async fn classify_users(
    State(state): State<StoreState>,
    Form(form): Form<ClassifyForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = form.user_id()?;
    let classification = state
        .policy
        .normalize(form.classification.as_deref().unwrap_or_default())?;
    {
        let db = state.db.lock().await;
        contacts::set_classification(&db, user_id, &classification, now_secs())?;
    }
    info!(user_id, %classification, "Contact classified");
    Ok(Json(MessageResponse {
        message: "User classification updated successfully!",
    }))
}

pub async fn list_users(
    State(state): State<StoreState>,
) -> Result<Json<Vec<ContactRecord>>, AppError> {
    let db = state.db.lock().await;
    Ok(Json(contacts::list(&db)?))
}

pub async fn get_user(
    State(state): State<StoreState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactRecord>, AppError> {
    let db = state.db.lock().await;
    Ok(Json(contacts::get(&db, id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn test_state(policy: ClassificationPolicy) -> StoreState {
        StoreState::new(shopform_db::open_memory().expect("open db"), policy)
    }

    fn intake() -> IntakeForm {
        IntakeForm {
            name: Some("Ravi".into()),
            mobile_number: Some("9876543210".into()),
            whatsapp_number: Some("9876543211".into()),
            email: Some("ravi@example.com".into()),
            locality: Some("Koramangala".into()),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body bytes");
        serde_json::from_slice(&bytes).expect("response body json")
    }

    async fn submit(state: &StoreState, form: IntakeForm) -> axum::response::Response {
        submit_user_data(State(state.clone()), Form(form))
            .await
            .into_response()
    }

    async fn classify(state: &StoreState, user_id: &str, value: &str) -> axum::response::Response {
        classify_users(
            State(state.clone()),
            Form(ClassifyForm {
                user_id: Some(user_id.into()),
                classification: Some(value.into()),
            }),
        )
        .await
        .into_response()
    }

    async fn stored(state: &StoreState, id: i64) -> ContactRecord {
        let db = state.db.lock().await;
        contacts::get(&db, id).expect("stored record")
    }

    #[tokio::test]
    async fn test_submit_creates_row() {
        let state = test_state(ClassificationPolicy::Strict);
        let response = submit(&state, intake()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "User data submitted successfully!");
        let id = body["user_id"].as_i64().expect("user_id");

        let record = stored(&state, id).await;
        assert_eq!(record.details.name, "Ravi");
        assert_eq!(record.details.email, "ravi@example.com");
        assert_eq!(record.classification, None);
    }

    #[tokio::test]
    async fn test_submit_stores_values_as_sent() {
        let state = test_state(ClassificationPolicy::Strict);
        let form = IntakeForm {
            name: Some("  Ravi Stores ".into()),
            locality: Some("HSR Layout\t".into()),
            ..intake()
        };
        let body = json_body(submit(&state, form).await).await;
        let id = body["user_id"].as_i64().expect("user_id");

        let record = stored(&state, id).await;
        assert_eq!(record.details.name, "  Ravi Stores ");
        assert_eq!(record.details.locality, "HSR Layout\t");
    }

    #[tokio::test]
    async fn test_submit_missing_field_is_400_without_row() {
        let state = test_state(ClassificationPolicy::Strict);
        let form = IntakeForm {
            locality: None,
            ..intake()
        };
        let response = submit(&state, form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "field required: locality");

        let db = state.db.lock().await;
        assert_eq!(contacts::count(&db).expect("count"), 0);
    }

    #[tokio::test]
    async fn test_submit_same_email_returns_distinct_ids() {
        let state = test_state(ClassificationPolicy::Strict);
        let first = json_body(submit(&state, intake()).await).await["user_id"].clone();
        let second = json_body(submit(&state, intake()).await).await["user_id"].clone();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_classify_uppercases() {
        let state = test_state(ClassificationPolicy::Strict);
        let id = json_body(submit(&state, intake()).await).await["user_id"]
            .as_i64()
            .expect("user_id");

        let response = classify(&state, &id.to_string(), "b").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "User classification updated successfully!"
        );
        assert_eq!(stored(&state, id).await.classification.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_unknown_label() {
        let state = test_state(ClassificationPolicy::Strict);
        let id = json_body(submit(&state, intake()).await).await["user_id"]
            .as_i64()
            .expect("user_id");

        let response = classify(&state, &id.to_string(), "z").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stored(&state, id).await.classification, None);
    }

    #[tokio::test]
    async fn test_lenient_policy_stores_uppercased_verbatim() {
        let state = test_state(ClassificationPolicy::Lenient);
        let id = json_body(submit(&state, intake()).await).await["user_id"]
            .as_i64()
            .expect("user_id");

        let response = classify(&state, &id.to_string(), "z").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stored(&state, id).await.classification.as_deref(), Some("Z"));
    }

    #[tokio::test]
    async fn test_classify_unknown_id_is_404() {
        let state = test_state(ClassificationPolicy::Strict);
        let response = classify(&state, "404", "A").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["detail"], "user 404 not found");
    }

    #[tokio::test]
    async fn test_classify_non_integer_id_is_400() {
        let state = test_state(ClassificationPolicy::Strict);
        let response = classify(&state, "abc", "A").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_last_classification_wins() {
        let state = test_state(ClassificationPolicy::Strict);
        let id = json_body(submit(&state, intake()).await).await["user_id"]
            .as_i64()
            .expect("user_id");

        classify(&state, &id.to_string(), "A").await;
        classify(&state, &id.to_string(), "C").await;
        assert_eq!(stored(&state, id).await.classification.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_list_and_get_users() {
        let state = test_state(ClassificationPolicy::Strict);
        submit(&state, intake()).await;
        submit(&state, intake()).await;

        let list = list_users(State(state.clone())).await.into_response();
        assert_eq!(list.status(), StatusCode::OK);
        let body = json_body(list).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let missing = get_user(State(state.clone()), Path(99)).await.into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let found = get_user(State(state), Path(1)).await.into_response();
        assert_eq!(json_body(found).await["name"], "Ravi");
    }

    #[tokio::test]
    async fn test_home_page() {
        let Html(page) = home().await;
        assert!(page.contains("/submit_user_data/"));
    }
}
