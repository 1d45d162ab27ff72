//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use crate::config::*;
    use crate::error::DashboardError;
    use crate::market::registry;
    use std::time::Duration;

    // ============= Defaults =============

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.tick_interval_ms, 1500);
        assert_eq!(config.commentary_delay_ms, 1000);
        assert_eq!(config.toast_ttl_secs, 5);
        assert_eq!(config.news_feed_cap, 50);
        assert!(config.symbols.is_none());
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();

        assert_eq!(config.history_candles, 60);
        assert_eq!(config.candle_cap, 100);
        assert_eq!(config.candle_period_secs, 60);
        assert_eq!(config.news_cap, 20);
        assert_eq!(config.min_price, 0.01);
        assert_eq!(config.news_gate, 0.95);
        assert_eq!(config.candle_period(), chrono::Duration::seconds(60));
    }

    #[test]
    fn test_sector_volatility() {
        let config = SimulationConfig::default();

        assert_eq!(config.sector_volatility("Technology"), 0.002);
        assert_eq!(config.sector_volatility("Healthcare"), 0.001);
        assert_eq!(config.sector_volatility(""), 0.001);
    }

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    // ============= YAML =============

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
symbols: [AAPL, NVDA]
seed: 42
tick_interval_ms: 500
simulation:
  news_gate: 0.5
  volatility:
    default: 0.003
    sector_overrides:
      Healthcare: 0.004
llm:
  model: "gpt-4o-mini"
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.symbols.as_deref(), Some(&["AAPL".to_string(), "NVDA".to_string()][..]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.commentary_delay(), Duration::from_secs(1));
        assert_eq!(config.simulation.news_gate, 0.5);
        assert_eq!(config.simulation.candle_cap, 100);
        assert_eq!(config.simulation.sector_volatility("Healthcare"), 0.004);
        // Overrides replace the default table
        assert_eq!(config.simulation.sector_volatility("Technology"), 0.003);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.tick_interval_ms, 1500);
    }

    #[test]
    fn test_yaml_with_bom() {
        let yaml = "\u{feff}toast_ttl_secs: 9\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.toast_ttl(), chrono::Duration::seconds(9));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = AppConfig::from_yaml("tick_interval_ms: [").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AppConfig::load_from("/nonexistent/liquid/config.yaml").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigIo { .. }));
    }

    // ============= Validation =============

    #[test]
    fn test_validate_rejects_zero_interval() {
        let err = AppConfig::from_yaml("tick_interval_ms: 0").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_history_over_cap() {
        let yaml = "simulation:\n  history_candles: 120\n  candle_cap: 100\n";
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_min_price() {
        let mut config = AppConfig::default();
        config.simulation.min_price = 0.0;
        assert!(config.validate().is_err());
        config.simulation.min_price = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_caps() {
        let mut config = AppConfig::default();
        config.news_feed_cap = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.event_bus_capacity = 0;
        assert!(config.validate().is_err());
    }

    // ============= Symbol selection =============

    #[test]
    fn test_select_all_symbols() {
        let all = registry::select(None).unwrap();
        assert_eq!(all.len(), registry::NASDAQ_50.len());
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].symbol, "AAPL");
    }

    #[test]
    fn test_select_keeps_registry_order() {
        let wanted = vec!["NVDA".to_string(), "AAPL".to_string()];
        let picked = registry::select(Some(wanted.as_slice())).unwrap();
        let symbols: Vec<_> = picked.iter().map(|i| i.symbol).collect();
        assert_eq!(symbols, vec!["AAPL", "NVDA"]);
    }

    #[test]
    fn test_select_unknown_symbol() {
        let wanted = vec!["AAPL".to_string(), "DOGE".to_string()];
        let err = registry::select(Some(wanted.as_slice())).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownSymbol { symbol } if symbol == "DOGE"));
    }
}
