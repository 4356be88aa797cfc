//! Refresh controllers: drive a technical worker's refresh cycle
//!
//! `TimeFrameRefresher` is the cron-driven implementation: it refreshes once
//! when started, then on every candle close of its time frame, and reports
//! each completed cycle as a `RefreshNotice`.

use crate::error::ConfigError;
use crate::evaluators::EvaluatorWorker;
use crate::models::{ExchangeId, TimeFrame};
use crate::signals::matrix::EvaluationMatrix;
use cron::Schedule;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// Drives one technical worker on one (exchange, time frame)
pub trait RefreshController: Send + Sync {
    fn time_frame(&self) -> TimeFrame;

    /// Completed refresh cycles; never decreases
    fn refreshed_count(&self) -> u64;

    fn worker(&self) -> Arc<dyn EvaluatorWorker>;

    /// Copy the worker's note into the matrix. Inactive workers leave their
    /// entry untouched (stale) until they are reactivated.
    fn refresh_matrix(&self, matrix: &EvaluationMatrix) {
        let worker = self.worker();
        if worker.is_active() {
            matrix.set_key(worker.matrix_key(), worker.eval_note());
        }
    }
}

/// A refresh cycle finished on some controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshNotice {
    pub exchange: ExchangeId,
    pub time_frame: TimeFrame,
    pub refreshed_count: u64,
}

pub struct TimeFrameRefresher {
    exchange: ExchangeId,
    time_frame: TimeFrame,
    worker: Arc<dyn EvaluatorWorker>,
    refreshed: AtomicU64,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl TimeFrameRefresher {
    /// Create a refresher for a time-frame bound worker
    pub fn new(
        exchange: ExchangeId,
        worker: Arc<dyn EvaluatorWorker>,
    ) -> Result<Self, ConfigError> {
        let time_frame = worker.time_frame().ok_or_else(|| ConfigError::InvalidValue {
            path: format!("evaluator.{}", worker.name()),
            reason: "refreshed workers must be bound to a time frame".to_string(),
        })?;

        let cron_expr = time_frame.cron_expression();
        let schedule = Schedule::from_str(cron_expr).map_err(|e| ConfigError::InvalidValue {
            path: format!("time_frame.{}", time_frame),
            reason: format!("invalid cron expression '{}': {}", cron_expr, e),
        })?;

        info!(
            exchange = %exchange,
            worker = %worker.name(),
            time_frame = %time_frame,
            cron = %cron_expr,
            "TimeFrameRefresher: created for {} on {} (cron: {})",
            worker.name(),
            time_frame,
            cron_expr
        );

        Ok(Self {
            exchange,
            time_frame,
            worker,
            refreshed: AtomicU64::new(0),
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    /// Run one cycle now: recompute the worker and count it
    pub fn refresh_once(&self) -> RefreshNotice {
        self.worker.force_refresh();
        let refreshed_count = self.refreshed.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            exchange = %self.exchange,
            worker = %self.worker.name(),
            time_frame = %self.time_frame,
            refreshed_count = refreshed_count,
            "TimeFrameRefresher: cycle {} done for {}",
            refreshed_count,
            self.worker.name()
        );
        RefreshNotice {
            exchange: self.exchange.clone(),
            time_frame: self.time_frame,
            refreshed_count,
        }
    }

    /// Start the refresh loop, reporting cycles on `notices`
    pub async fn start(self: &Arc<Self>, notices: mpsc::UnboundedSender<RefreshNotice>) {
        let refresher = Arc::clone(self);

        let handle = tokio::spawn(async move {
            if notices.send(refresher.refresh_once()).is_err() {
                warn!("TimeFrameRefresher: notice channel closed, stopping");
                return;
            }

            loop {
                let mut upcoming = refresher.schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(refresher.time_frame.duration()).await;
                }

                if notices.send(refresher.refresh_once()).is_err() {
                    warn!(
                        exchange = %refresher.exchange,
                        time_frame = %refresher.time_frame,
                        "TimeFrameRefresher: notice channel closed, stopping"
                    );
                    break;
                }
            }
        });

        let mut h = self.handle.write().await;
        if let Some(previous) = h.replace(handle) {
            previous.abort();
        }
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!(
                exchange = %self.exchange,
                time_frame = %self.time_frame,
                "TimeFrameRefresher: stopped"
            );
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}

impl RefreshController for TimeFrameRefresher {
    fn time_frame(&self) -> TimeFrame {
        self.time_frame
    }

    fn refreshed_count(&self) -> u64 {
        self.refreshed.load(Ordering::SeqCst)
    }

    fn worker(&self) -> Arc<dyn EvaluatorWorker> {
        Arc::clone(&self.worker)
    }
}
