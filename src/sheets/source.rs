use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::SheetConfig;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Raw cell grid: the first row is the header row.
pub type Grid = Vec<Vec<String>>;

/// Where the mirrored spreadsheet comes from.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_grid(&self) -> anyhow::Result<Grid>;
}

/// Google Sheets v4 `values.get` over a fixed range.
pub struct GoogleSheets {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

impl GoogleSheets {
    pub fn new(cfg: &SheetConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs.max(1)))
            .build()
            .context("build sheets http client")?;
        Ok(Self {
            client,
            url: format!("{}/{}/values/{}", SHEETS_API, cfg.sheet_id, cfg.range),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl SheetSource for GoogleSheets {
    async fn fetch_grid(&self) -> anyhow::Result<Grid> {
        let body: ValueRange = self
            .client
            .get(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .context("sheets request")?
            .error_for_status()
            .context("sheets response status")?
            .json()
            .await
            .context("decode sheets response")?;
        Ok(grid_from_values(body.values.unwrap_or_default()))
    }
}

fn grid_from_values(values: Vec<Vec<Value>>) -> Grid {
    values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Stand-in used when no sheet credentials are configured.
pub struct EmptySheet;

#[async_trait]
impl SheetSource for EmptySheet {
    async fn fetch_grid(&self) -> anyhow::Result<Grid> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Replays queued results; repeats the last one once the queue runs dry.
    pub struct ScriptedSource {
        script: Mutex<VecDeque<Result<Grid, String>>>,
        last: Mutex<Result<Grid, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn new(script: Vec<Result<Grid, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(Ok(Vec::new())),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SheetSource for ScriptedSource {
        async fn fetch_grid(&self) -> anyhow::Result<Grid> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let result = match next {
                Some(r) => {
                    *self.last.lock().unwrap() = r.clone();
                    r
                }
                None => self.last.lock().unwrap().clone(),
            };
            result.map_err(|e| anyhow::anyhow!(e))
        }
    }

    pub fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }
}
