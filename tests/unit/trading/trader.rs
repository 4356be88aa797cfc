//! Unit tests for the simulated trader

use evalgrid::config::Config;
use evalgrid::error::ConfigError;
use evalgrid::models::ExchangeId;
use evalgrid::trading::{Trader, TraderSimulator};
use serde_json::json;

#[test]
fn test_simulator_from_config() {
    let config = Config::new(json!({ "simulator": { "enabled": true, "risk": 0.3 } })).unwrap();
    let trader = TraderSimulator::new(&config, ExchangeId::new("binance")).unwrap();
    assert!(trader.is_simulated());
    assert!(trader.is_enabled());
    assert_eq!(trader.risk(), 0.3);
    assert_eq!(trader.exchange().as_str(), "binance");
}

#[test]
fn test_simulator_rejects_bad_risk() {
    let config = Config::new(json!({ "simulator": { "enabled": false, "risk": 1.5 } })).unwrap();
    assert!(matches!(
        TraderSimulator::new(&config, ExchangeId::new("binance")),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        TraderSimulator::new(&Config::default(), ExchangeId::new("binance")),
        Err(ConfigError::MissingSection(_))
    ));
}
