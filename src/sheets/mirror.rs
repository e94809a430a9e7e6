use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::source::{Grid, SheetSource};

/// One sheet row keyed by header, in header order.
pub type SheetRow = Map<String, Value>;

/// A full copy of the sheet at one point in time.
pub type Snapshot = Vec<SheetRow>;

/// Keeps the last successfully fetched snapshot of the external sheet.
///
/// Reads never fail: when the provider errors, callers get the cached
/// snapshot (empty before the first success).
pub struct SheetMirror {
    source: Arc<dyn SheetSource>,
    cache: RwLock<Snapshot>,
}

impl SheetMirror {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(Vec::new()),
        }
    }

    pub async fn fetch_snapshot(&self) -> Snapshot {
        match self.source.fetch_grid().await {
            Ok(grid) => {
                let snapshot = normalize(grid);
                debug!(rows = snapshot.len(), "sheet fetched");
                *self.cache.write().await = snapshot.clone();
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "sheet fetch failed; serving cached snapshot");
                self.cache.read().await.clone()
            }
        }
    }

    #[cfg(test)]
    pub async fn cached(&self) -> Snapshot {
        self.cache.read().await.clone()
    }
}

/// Turns a raw grid into rows keyed by the first row's headers.
///
/// Short rows are padded with `""`; cells past the last header are dropped.
/// A repeated header keeps its first position and takes the later value.
pub fn normalize(grid: Grid) -> Snapshot {
    let mut rows = grid.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };
    rows.map(|row| {
        let mut cells = row.into_iter();
        let mut obj = Map::with_capacity(headers.len());
        for header in &headers {
            let value = cells.next().unwrap_or_default();
            obj.insert(header.clone(), Value::String(value));
        }
        obj
    })
    .collect()
}

/// True unless both snapshots are identical row by row, key order included.
pub fn has_changed(prev: &Snapshot, next: &Snapshot) -> bool {
    prev.len() != next.len()
        || prev
            .iter()
            .zip(next)
            .any(|(a, b)| a.len() != b.len() || a.iter().ne(b.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::source::scripted::{grid, ScriptedSource};
    use serde_json::json;

    fn row(v: Value) -> SheetRow {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn first_row_becomes_headers() {
        let snap = normalize(grid(&[&["Name", "Qty"], &["bolt", "12"], &["nut", "40"]]));
        assert_eq!(
            snap,
            vec![
                row(json!({"Name": "bolt", "Qty": "12"})),
                row(json!({"Name": "nut", "Qty": "40"})),
            ]
        );
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let snap = normalize(grid(&[&["A", "B", "C"], &["1"], &["1", "2", "3", "4"]]));
        assert_eq!(snap[0], row(json!({"A": "1", "B": "", "C": ""})));
        assert_eq!(snap[1], row(json!({"A": "1", "B": "2", "C": "3"})));
    }

    #[test]
    fn header_order_is_preserved() {
        let snap = normalize(grid(&[&["z", "a", "m"], &["1", "2", "3"]]));
        let keys: Vec<&str> = snap[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn repeated_header_takes_later_value() {
        let snap = normalize(grid(&[&["k", "x", "k"], &["first", "mid", "last"]]));
        let keys: Vec<&str> = snap[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["k", "x"]);
        assert_eq!(snap[0]["k"], "last");
    }

    #[test]
    fn empty_or_header_only_grid_is_empty_snapshot() {
        assert!(normalize(Vec::new()).is_empty());
        assert!(normalize(grid(&[&["A", "B"]])).is_empty());
    }

    #[test]
    fn has_changed_detects_value_and_order_differences() {
        let s = normalize(grid(&[&["A", "B"], &["1", "2"], &["3", "4"]]));
        assert!(!has_changed(&s, &s.clone()));
        assert!(!has_changed(&Vec::new(), &Vec::new()));

        let value_diff = normalize(grid(&[&["A", "B"], &["1", "2"], &["3", "5"]]));
        assert!(has_changed(&s, &value_diff));

        let reordered = normalize(grid(&[&["A", "B"], &["3", "4"], &["1", "2"]]));
        assert!(has_changed(&s, &reordered));

        let fewer = normalize(grid(&[&["A", "B"], &["1", "2"]]));
        assert!(has_changed(&s, &fewer));

        let key_order = normalize(grid(&[&["B", "A"], &["2", "1"], &["4", "3"]]));
        assert!(has_changed(&s, &key_order));
    }

    #[tokio::test]
    async fn failure_serves_last_good_snapshot() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(grid(&[&["A"], &["1"]])),
            Err("provider down".into()),
        ]));
        let mirror = SheetMirror::new(source.clone());

        let first = mirror.fetch_snapshot().await;
        let second = mirror.fetch_snapshot().await;
        assert_eq!(first, second);
        assert_eq!(second[0]["A"], "1");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failure_before_any_success_is_empty() {
        let mirror = SheetMirror::new(Arc::new(ScriptedSource::new(vec![Err("nope".into())])));
        assert!(mirror.fetch_snapshot().await.is_empty());
        assert!(mirror.cached().await.is_empty());
    }

    #[tokio::test]
    async fn success_replaces_cache_wholesale() {
        let mirror = SheetMirror::new(Arc::new(ScriptedSource::new(vec![
            Ok(grid(&[&["A"], &["1"], &["2"]])),
            Ok(grid(&[&["B"], &["9"]])),
        ])));
        mirror.fetch_snapshot().await;
        mirror.fetch_snapshot().await;
        assert_eq!(mirror.cached().await, vec![row(json!({"B": "9"}))]);
    }
}
