//! Spreadsheet server: collect, classify, then append one row.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::{DateTime, TimeDelta, Utc};
use shopform_sheets::RowSink;
use shopform_types::{ClassificationPolicy, ContactDetails};
use tracing::{info, warn};

use crate::config::{SheetConfig, StateMode};
use crate::drafts::{new_token, Admission, DraftStore, SubmissionLedger};
use crate::error::{AppError, HtmlError};
use crate::forms::{non_blank, FinalForm, IntakeForm};
use crate::html;

/// Asia/Kolkata is UTC+05:30 with no daylight saving.
const KOLKATA_OFFSET_MINUTES: i64 = 5 * 60 + 30;
const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Shared state of the sheet server.
#[derive(Clone)]
pub struct SheetState {
    pub sink: Arc<dyn RowSink>,
    pub drafts: Arc<DraftStore>,
    pub ledger: Arc<SubmissionLedger>,
    pub policy: ClassificationPolicy,
    pub state_mode: StateMode,
    pub dedupe: bool,
}

impl SheetState {
    pub fn new(sink: Arc<dyn RowSink>, config: &SheetConfig) -> Self {
        let ttl = Duration::from_secs(config.draft_ttl_secs);
        Self {
            sink,
            drafts: Arc::new(DraftStore::new(ttl)),
            ledger: Arc::new(SubmissionLedger::new(ttl)),
            policy: config.classification_policy,
            state_mode: config.state_mode,
            dedupe: config.dedupe_submissions,
        }
    }
}

/// Build the sheet server's router.
pub fn router(state: SheetState) -> Router {
    Router::new()
        .route("/", get(home).post(submit))
        .route("/classify", post(classify))
        .route("/healthz", get(crate::healthz))
        .with_state(state)
}

/// Format an instant as Asia/Kolkata wall-clock time.
pub fn format_kolkata(at: DateTime<Utc>) -> String {
    (at.naive_utc() + TimeDelta::minutes(KOLKATA_OFFSET_MINUTES))
        .format(TIME_FORMAT)
        .to_string()
}

pub async fn home() -> Html<String> {
    Html(html::sheet_home(&format_kolkata(Utc::now())))
}

/// Render the classification page. Nothing is appended here.
pub async fn classify(
    State(state): State<SheetState>,
    Form(form): Form<IntakeForm>,
) -> Result<Html<String>, HtmlError> {
    let details = form.into_details()?;
    let page = match state.state_mode {
        StateMode::Server => {
            let token = state.drafts.insert(details.clone()).await;
            html::classify_page(&details.name, &[("draft_token", token.as_str())])
        }
        StateMode::Client => {
            let request_id = new_token();
            let mut hidden: Vec<(&str, &str)> = details.fields().to_vec();
            hidden.push(("request_id", request_id.as_str()));
            html::classify_page(&details.name, &hidden)
        }
    };
    Ok(Html(page))
}

/// Append the finished submission and send the browser home.
///
/// The claim-append-settle sequence runs on its own task so a dropped
/// connection cannot leave a submission claimed but never settled.
pub async fn submit(
    State(state): State<SheetState>,
    Form(form): Form<FinalForm>,
) -> Result<Redirect, HtmlError> {
    let classification = state
        .policy
        .normalize(form.classification.as_deref().unwrap_or_default())?;

    tokio::spawn(async move {
        match state.state_mode {
            StateMode::Server => submit_draft(&state, &form, &classification).await,
            StateMode::Client => submit_replayed(&state, &form, &classification).await,
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("submit task: {e}")))?
}

fn duplicate() -> Redirect {
    info!("Duplicate submission ignored");
    Redirect::to("/")
}

async fn submit_draft(
    state: &SheetState,
    form: &FinalForm,
    classification: &str,
) -> Result<Redirect, HtmlError> {
    let token = non_blank(&form.draft_token).ok_or(AppError::DraftExpired)?;

    if !state.dedupe {
        let details = state.drafts.get(token).await.ok_or(AppError::DraftExpired)?;
        append(state, &details, classification).await?;
        return Ok(Redirect::to("/"));
    }

    // The ledger claim comes first; only its owner touches the draft.
    match state.ledger.begin(token).await {
        Admission::Started => {}
        Admission::Done => return Ok(duplicate()),
        Admission::InFlight => return Err(AppError::InFlight.into()),
    }
    let Some(details) = state.drafts.take(token).await else {
        state.ledger.forget(token).await;
        return Err(AppError::DraftExpired.into());
    };

    if let Err(err) = append(state, &details, classification).await {
        state.drafts.restore(token, details).await;
        state.ledger.forget(token).await;
        return Err(err);
    }
    state.ledger.finish(token).await;
    Ok(Redirect::to("/"))
}

async fn submit_replayed(
    state: &SheetState,
    form: &FinalForm,
    classification: &str,
) -> Result<Redirect, HtmlError> {
    let details = form.intake().into_details()?;
    let request_id = non_blank(&form.request_id).filter(|_| state.dedupe);

    if let Some(id) = request_id {
        match state.ledger.begin(id).await {
            Admission::Started => {}
            Admission::Done => return Ok(duplicate()),
            Admission::InFlight => return Err(AppError::InFlight.into()),
        }
    }

    let result = append(state, &details, classification).await;
    if let Some(id) = request_id {
        if result.is_ok() {
            state.ledger.finish(id).await;
        } else {
            state.ledger.forget(id).await;
        }
    }
    result.map(|()| Redirect::to("/"))
}

async fn append(
    state: &SheetState,
    details: &ContactDetails,
    classification: &str,
) -> Result<(), HtmlError> {
    match state.sink.append_row(details.to_row(classification)).await {
        Ok(()) => {
            info!(%classification, "Submission appended to spreadsheet");
            Ok(())
        }
        Err(err) => {
            warn!("Append failed, submission kept for retry");
            Err(err.into())
        }
    }
}
