//! Google Sheets / Drive REST client.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::auth::TokenSource;
use crate::{Result, RowSink, SheetsError};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// API base URLs. Overridable so tests can point at a local stub.
#[derive(Debug, Clone)]
pub struct SheetsEndpoints {
    pub sheets_base: String,
    pub drive_base: String,
}

impl Default for SheetsEndpoints {
    fn default() -> Self {
        Self {
            sheets_base: "https://sheets.googleapis.com/v4".to_string(),
            drive_base: "https://www.googleapis.com/drive/v3".to_string(),
        }
    }
}

/// How the target spreadsheet is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    Id(String),
    /// Resolved through a Drive search on first use.
    Name(String),
}

#[derive(Debug, Clone)]
struct ResolvedTarget {
    spreadsheet_id: String,
    worksheet: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

/// Appends rows to the first worksheet of one spreadsheet.
pub struct SheetsClient<T> {
    http: reqwest::Client,
    tokens: T,
    endpoints: SheetsEndpoints,
    target: SpreadsheetRef,
    resolved: OnceCell<ResolvedTarget>,
}

impl<T: TokenSource> SheetsClient<T> {
    pub fn new(
        http: reqwest::Client,
        tokens: T,
        endpoints: SheetsEndpoints,
        target: SpreadsheetRef,
    ) -> Self {
        Self {
            http,
            tokens,
            endpoints,
            target,
            resolved: OnceCell::new(),
        }
    }

    /// Find a spreadsheet id by its exact title.
    pub async fn resolve_spreadsheet(&self, name: &str) -> Result<String> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let url = format!(
            "{}/files?q={}&fields=files(id,name)&pageSize=1",
            self.endpoints.drive_base,
            urlencoding::encode(&query)
        );
        let list: FileList = self.get_json(&url).await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    /// Title of the worksheet with the lowest index.
    pub async fn first_worksheet_title(&self, spreadsheet_id: &str) -> Result<String> {
        let url = format!(
            "{}/spreadsheets/{}?fields=sheets.properties",
            self.endpoints.sheets_base,
            urlencoding::encode(spreadsheet_id)
        );
        let meta: SpreadsheetMeta = self.get_json(&url).await?;
        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .min_by_key(|p| p.index)
            .map(|p| p.title)
            .ok_or_else(|| SheetsError::NoWorksheet(spreadsheet_id.to_string()))
    }

    /// Append one row after the last row of `worksheet`.
    pub async fn append(&self, spreadsheet_id: &str, worksheet: &str, row: &[String]) -> Result<()> {
        let range = format!("'{}'", worksheet.replace('\'', "''"));
        let url = format!(
            "{}/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.endpoints.sheets_base,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(&range)
        );
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn target(&self) -> Result<&ResolvedTarget> {
        self.resolved
            .get_or_try_init(|| async {
                let spreadsheet_id = match &self.target {
                    SpreadsheetRef::Id(id) => id.clone(),
                    SpreadsheetRef::Name(name) => self.resolve_spreadsheet(name).await?,
                };
                let worksheet = self.first_worksheet_title(&spreadsheet_id).await?;
                tracing::info!(%spreadsheet_id, %worksheet, "Resolved spreadsheet target");
                Ok::<_, SheetsError>(ResolvedTarget {
                    spreadsheet_id,
                    worksheet,
                })
            })
            .await
    }

    async fn get_json<R: serde::de::DeserializeOwned>(&self, url: &str) -> Result<R> {
        let token = self.tokens.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<R>().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl<T: TokenSource> RowSink for SheetsClient<T> {
    async fn append_row(&self, row: Vec<String>) -> Result<()> {
        let target = self.target().await?;
        self.append(&target.spreadsheet_id, &target.worksheet, &row)
            .await?;
        tracing::info!(spreadsheet_id = %target.spreadsheet_id, "Appended row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = SheetsEndpoints::default();
        assert!(endpoints.sheets_base.starts_with("https://sheets.googleapis.com"));
        assert!(endpoints.drive_base.ends_with("/drive/v3"));
    }

    #[test]
    fn test_sheet_metadata_parses_without_index() {
        let meta: SpreadsheetMeta = serde_json::from_str(
            r#"{"sheets":[{"properties":{"title":"Sheet1","sheetId":0}}]}"#,
        )
        .expect("parse");
        assert_eq!(meta.sheets[0].properties.index, 0);
        assert_eq!(meta.sheets[0].properties.title, "Sheet1");
    }
}
