use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use super::mirror::{has_changed, SheetMirror, Snapshot};
use crate::config::PushMode;

pub const SHEET_DATA_EVENT: &str = "sheetData";

/// Message pushed to live-channel clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetEvent {
    pub event: &'static str,
    pub data: Snapshot,
}

impl SheetEvent {
    pub fn sheet_data(data: Snapshot) -> Self {
        Self {
            event: SHEET_DATA_EVENT,
            data,
        }
    }
}

/// Spawns one polling loop per live-channel connection.
#[derive(Clone)]
pub struct SheetFeed {
    mirror: Arc<SheetMirror>,
    period: Duration,
    mode: PushMode,
}

/// Owns a connection's polling task; dropping it stops the task.
pub struct FeedHandle {
    task: JoinHandle<()>,
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl SheetFeed {
    pub fn new(mirror: Arc<SheetMirror>, period: Duration, mode: PushMode) -> Self {
        Self {
            mirror,
            period,
            mode,
        }
    }

    pub fn mirror(&self) -> &Arc<SheetMirror> {
        &self.mirror
    }

    pub fn spawn(&self, tx: mpsc::Sender<SheetEvent>) -> FeedHandle {
        let feed = self.clone();
        FeedHandle {
            task: tokio::spawn(async move { feed.run(tx).await }),
        }
    }

    /// Pushes the initial snapshot, then one push per tick (or per change in
    /// `OnChange` mode). Returns once the receiver is gone.
    pub async fn run(self, tx: mpsc::Sender<SheetEvent>) {
        let mut last = self.mirror.fetch_snapshot().await;
        if tx.send(SheetEvent::sheet_data(last.clone())).await.is_err() {
            return;
        }

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tx.closed() => return,
            }

            let next = self.mirror.fetch_snapshot().await;
            let changed = has_changed(&last, &next);
            if changed {
                debug!(rows = next.len(), "sheet data changed");
                last = next;
            }

            let push = changed || self.mode == PushMode::Always;
            if push && tx.send(SheetEvent::sheet_data(last.clone())).await.is_err() {
                return;
            }
        }
    }
}
