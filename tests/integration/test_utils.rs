//! Shared fixtures for coordinator tests

#![allow(dead_code)]

use evalgrid::config::Config;
use evalgrid::core::RefreshController;
use evalgrid::evaluators::{EvaluatorWorker, FnWorker};
use evalgrid::models::{EvalNote, EvaluatorCategory, TimeFrame};
use evalgrid::trading::{Decider, QueuedDecider, StaticTradingMode, TradingMode, TradingModeRegistry};
use evalgrid::Coordinator;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const TEST_MODE: &str = "test_mode";
pub const TEST_SYMBOL: &str = "BTC/USDT";

/// Note a test worker reports on its next refresh
pub type NoteCell = Arc<Mutex<EvalNote>>;

pub fn test_config(strategies: Value) -> Config {
    Config::new(json!({
        "trader": { "mode": TEST_MODE },
        "evaluator": { "strategies": strategies }
    }))
    .unwrap()
}

pub fn test_registry(decider: Arc<QueuedDecider>) -> TradingModeRegistry {
    TradingModeRegistry::new().register(TEST_MODE, move |_config, _symbol, _exchange| {
        let deciders: Vec<Arc<dyn Decider>> = vec![decider.clone()];
        let mode: Arc<dyn TradingMode> = Arc::new(StaticTradingMode::new(TEST_MODE, deciders));
        Ok(mode)
    })
}

/// Coordinator plus the decider its trading mode signals
pub fn test_coordinator(strategies: Value) -> (Coordinator, Arc<QueuedDecider>) {
    let decider = Arc::new(QueuedDecider::new("test-decider"));
    let coordinator = Coordinator::new(
        TEST_SYMBOL,
        test_config(strategies),
        &test_registry(decider.clone()),
    )
    .expect("coordinator creation");
    (coordinator, decider)
}

/// Worker whose note is whatever the returned cell holds at refresh time
pub fn value_worker(
    name: &str,
    category: EvaluatorCategory,
    time_frame: Option<TimeFrame>,
    note: f64,
) -> (Arc<FnWorker>, NoteCell) {
    let cell: NoteCell = Arc::new(Mutex::new(EvalNote::new(note)));
    let source = cell.clone();
    let mut worker = FnWorker::new(name, category, move || *source.lock());
    if let Some(tf) = time_frame {
        worker = worker.with_time_frame(tf);
    }
    (Arc::new(worker), cell)
}

/// Refresh controller driven by hand from the test body
pub struct ManualController {
    time_frame: TimeFrame,
    worker: Arc<dyn EvaluatorWorker>,
    refreshed: AtomicU64,
}

impl ManualController {
    pub fn new(worker: Arc<dyn EvaluatorWorker>) -> Arc<Self> {
        let time_frame = worker.time_frame().expect("technical worker with a time frame");
        Arc::new(Self {
            time_frame,
            worker,
            refreshed: AtomicU64::new(0),
        })
    }

    /// Recompute the worker and count one completed cycle
    pub fn complete_cycle(&self) {
        self.worker.force_refresh();
        self.refreshed.fetch_add(1, Ordering::SeqCst);
    }
}

impl RefreshController for ManualController {
    fn time_frame(&self) -> TimeFrame {
        self.time_frame
    }

    fn refreshed_count(&self) -> u64 {
        self.refreshed.load(Ordering::SeqCst)
    }

    fn worker(&self) -> Arc<dyn EvaluatorWorker> {
        self.worker.clone()
    }
}

/// Technical worker on `time_frame` behind a manual controller
pub fn technical_controller(
    name: &str,
    time_frame: TimeFrame,
    note: f64,
) -> (Arc<ManualController>, Arc<FnWorker>, NoteCell) {
    let (worker, cell) = value_worker(name, EvaluatorCategory::Technical, Some(time_frame), note);
    let controller = ManualController::new(worker.clone());
    (controller, worker, cell)
}
