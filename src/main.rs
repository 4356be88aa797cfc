//! Evalgrid demo runner
//!
//! Wires a coordinator for one symbol on one exchange, drives synthetic
//! technical workers with time-frame refreshers and logs every decision
//! request until Ctrl-C.

use dotenvy::dotenv;
use evalgrid::config::{get_config_path, get_environment, Config};
use evalgrid::core::{CoordinatorRuntime, TimeFrameRefresher};
use evalgrid::evaluators::{EvaluatorWorker, FnWorker};
use evalgrid::logging;
use evalgrid::metrics::Metrics;
use evalgrid::models::{EvalNote, EvaluatorCategory, ExchangeId, TimeFrame};
use evalgrid::signals::normalize_rsi;
use evalgrid::trading::{
    Decider, QueuedDecider, StaticTradingMode, Trader, TraderSimulator, TradingMode,
    TradingModeRegistry,
};
use evalgrid::Coordinator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

const DEMO_SYMBOL: &str = "BTC/USDT";
const DEMO_EXCHANGE: &str = "binance";

const DEMO_CONFIG: &str = r#"{
    "trader": { "mode": "daily" },
    "simulator": { "enabled": true, "risk": 0.5 },
    "evaluator": {
        "strategies": [
            {
                "name": "trend_follower",
                "required_categories": ["technical"],
                "required_evaluators": ["rsi", "ema_cross"],
                "aggregation": { "method": "weighted_average", "weights": { "rsi": 2.0 } }
            },
            {
                "name": "scalper",
                "required_categories": ["technical", "real_time"],
                "aggregation": { "method": "unanimous" }
            }
        ]
    }
}"#;

/// Synthetic RSI oscillating with wall-clock time
fn synthetic_rsi(period_seconds: i64, phase: f64) -> f64 {
    let t = chrono::Utc::now().timestamp() as f64 / period_seconds as f64;
    50.0 + 35.0 * (t * std::f64::consts::TAU + phase).sin()
}

fn demo_worker(name: &str, time_frame: TimeFrame, phase: f64) -> Arc<dyn EvaluatorWorker> {
    let period = (time_frame.minutes() * 60 * 24) as i64;
    Arc::new(
        FnWorker::new(name, EvaluatorCategory::Technical, move || {
            EvalNote::new(normalize_rsi(synthetic_rsi(period, phase)))
        })
        .with_time_frame(time_frame),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    info!("Starting Evalgrid");
    info!(environment = %get_environment(), "Environment");

    let config = match get_config_path() {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from {}", path.display());
            Config::from_path(&path)?
        }
        None => {
            warn!("EVALGRID_CONFIG not set, using the built-in demo configuration");
            DEMO_CONFIG.parse::<Config>()?
        }
    };

    let decider = Arc::new(QueuedDecider::new("daily-decider"));
    let mode_decider = decider.clone();
    let registry = TradingModeRegistry::new().register("daily", move |_config, symbol, exchange| {
        info!(symbol = %symbol, exchange = %exchange, "Building daily trading mode");
        let deciders: Vec<Arc<dyn Decider>> = vec![mode_decider.clone()];
        let mode: Arc<dyn TradingMode> = Arc::new(StaticTradingMode::new("daily", deciders));
        Ok(mode)
    });

    let metrics = Arc::new(Metrics::new()?);
    let coordinator = Arc::new(
        Coordinator::new(DEMO_SYMBOL, config.clone(), &registry)?.with_metrics(metrics.clone()),
    );

    let exchange = ExchangeId::new(DEMO_EXCHANGE);
    let simulator: Arc<dyn Trader> = Arc::new(TraderSimulator::new(&config, exchange.clone())?);
    coordinator.set_trader_simulators(HashMap::from([(exchange.clone(), simulator)]));

    let runtime = CoordinatorRuntime::new(coordinator.clone());
    runtime.start().await?;

    let workers = [
        demo_worker("rsi", TimeFrame::OneMinute, 0.0),
        demo_worker("ema_cross", TimeFrame::FiveMinutes, 1.3),
    ];
    for worker in workers {
        let refresher = Arc::new(TimeFrameRefresher::new(exchange.clone(), worker)?);
        runtime.attach(refresher).await?;
    }

    let matrix = coordinator.matrix(&exchange)?;
    let decision_loop = {
        let decider = decider.clone();
        let coordinator = coordinator.clone();
        let exchange = exchange.clone();
        tokio::spawn(async move {
            loop {
                let batch = decider.next_batch().await;
                let strategies = coordinator.strategies(&exchange, true).unwrap_or_default();
                for strategy in strategies {
                    let note = matrix.get(EvaluatorCategory::Strategy, &strategy);
                    info!(
                        exchange = %exchange,
                        strategy = %strategy,
                        note = %note,
                        batch = batch,
                        "Decider: {} -> {}",
                        strategy,
                        note
                    );
                }
            }
        })
    };

    info!("Evalgrid running, press Ctrl-C to stop");
    signal::ctrl_c().await?;

    info!("Shutdown signal received");
    decision_loop.abort();
    runtime.stop().await;

    info!(
        decisions = decider.total_enqueued(),
        "Final metrics:\n{}",
        metrics.export()?
    );
    Ok(())
}
