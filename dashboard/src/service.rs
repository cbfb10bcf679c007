use crate::device::ReadingSource;
use crate::errors::{Error, Result};
use crate::export::render_csv;
use crate::history::HistoryBuffer;
use crate::metrics::HISTORY_EVICTIONS_TOTAL;
use crate::model::{OfflineReading, Reading};
use crate::stats::{self, Statistics};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Outcome of a device poll
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentReading {
    /// Read succeeded and was recorded in history
    Online(Reading),
    /// Device unreachable or payload unreadable; nothing was recorded
    Offline(OfflineReading),
}

/// Owns the history buffer and the device it is filled from.
///
/// The device is polled without holding the history lock, so readers are
/// never blocked by an in-flight fetch. Stamping and append-with-eviction
/// happen under one write guard.
pub struct TelemetryService<S> {
    source: S,
    history: RwLock<HistoryBuffer>,
}

impl<S: ReadingSource> TelemetryService<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            history: RwLock::new(HistoryBuffer::new(capacity)),
        }
    }

    pub async fn get_current_reading(&self) -> CurrentReading {
        let payload = match self.source.fetch_reading().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Error fetching device data: {}", e);
                return CurrentReading::Offline(OfflineReading::new(e.device_message()));
            }
        };

        let mut history = self.history.write().await;
        let reading = Reading::stamp(payload, Utc::now());
        if history.push(reading.clone()).is_some() {
            HISTORY_EVICTIONS_TOTAL.inc();
        }
        debug!("Recorded reading at {}, history length {}", reading.timestamp, history.len());

        CurrentReading::Online(reading)
    }

    pub async fn get_history(&self, limit: usize) -> Vec<Reading> {
        self.history.read().await.latest(limit)
    }

    pub async fn get_statistics(&self) -> Statistics {
        let history = self.history.read().await;
        stats::compute(history.iter())
    }

    pub async fn clear_history(&self) {
        let mut history = self.history.write().await;
        let dropped = history.len();
        history.clear();
        info!("History cleared ({} readings dropped)", dropped);
    }

    pub async fn export_csv(&self) -> Result<String> {
        let history = self.history.read().await;
        if history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        Ok(render_csv(history.iter()))
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}
