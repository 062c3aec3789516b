//! shopform-sheet: two-page intake that appends rows to a spreadsheet.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use shopform_server::config::{ServerConfig, Variant};
use shopform_server::sheet::{self, SheetState};
use shopform_server::telemetry;
use shopform_sheets::auth::{ServiceAccountKey, ServiceAccountTokens};
use shopform_sheets::client::{SheetsClient, SheetsEndpoints, SpreadsheetRef};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config and start logging
    let config = ServerConfig::load()?;
    telemetry::init(&config.logging.level)?;

    info!("shopform sheet server starting");

    // 2. Credentials
    let key = ServiceAccountKey::from_file(Path::new(&config.sheet.credentials_path))?;
    info!(client_email = %key.client_email, "Loaded service account");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.sheet.request_timeout_secs))
        .build()?;
    let tokens = ServiceAccountTokens::new(key, http.clone())?;

    // 3. Spreadsheet client. The target is resolved on first append.
    let target = if config.sheet.spreadsheet_id.trim().is_empty() {
        SpreadsheetRef::Name(config.sheet.spreadsheet_name.clone())
    } else {
        SpreadsheetRef::Id(config.sheet.spreadsheet_id.trim().to_string())
    };
    let client = SheetsClient::new(http, tokens, SheetsEndpoints::default(), target);

    // 4. Serve
    let state = SheetState::new(Arc::new(client), &config.sheet);
    let addr = config.bind_addr(Variant::Sheet)?;
    shopform_server::serve(sheet::router(state), addr).await
}
