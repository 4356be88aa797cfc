//! Prometheus metrics for the coordination engine

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub strategy_evaluations_total: IntCounter,
    pub strategy_evaluation_duration_seconds: Histogram,
    pub finalize_dispatch_total: IntCounter,
    pub refresh_notices_total: IntCounterVec,
    pub active_workers: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("evalgrid".to_string()), None)?;

        let strategy_evaluations_total = IntCounter::new(
            "strategy_evaluations_total",
            "Strategy evaluation logic runs",
        )?;
        let strategy_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "strategy_evaluation_duration_seconds",
                "Duration of one strategy re-evaluation pass",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        let finalize_dispatch_total = IntCounter::new(
            "finalize_dispatch_total",
            "Finalize calls that signalled deciders",
        )?;
        let refresh_notices_total = IntCounterVec::new(
            Opts::new("refresh_notices_total", "Completed refresh cycles"),
            &["exchange", "time_frame"],
        )?;
        let active_workers = IntGauge::new(
            "active_workers",
            "Workers active after the last activation change",
        )?;

        registry.register(Box::new(strategy_evaluations_total.clone()))?;
        registry.register(Box::new(strategy_evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(finalize_dispatch_total.clone()))?;
        registry.register(Box::new(refresh_notices_total.clone()))?;
        registry.register(Box::new(active_workers.clone()))?;

        Ok(Self {
            registry,
            strategy_evaluations_total,
            strategy_evaluation_duration_seconds,
            finalize_dispatch_total,
            refresh_notices_total,
            active_workers,
        })
    }

    /// Text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
