//! Serializable backtest configuration and its validation.
//!
//! A [`BacktestConfig`] is plain data, loadable from TOML. It becomes usable
//! only through [`BacktestConfig::validate`], which checks every field and
//! resolves the strategy variant once, producing a [`ValidatedConfig`].

use std::path::{Path, PathBuf};

use barlab_core::engine::{CostModel, ExitRules, SimulationConfig};
use barlab_core::strategy::{Strategy, StrategyError, StrategyParams, StrategyType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A rejected configuration. Each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("start_date ({start}) must be before end_date ({end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("initial_capital must be a positive number, got {0}")]
    InvalidCapital(f64),

    #[error("position_size must be in (0, 1], got {0}")]
    InvalidPositionSize(f64),

    #[error("commission must be in [0, 1), got {0}")]
    InvalidCommission(f64),

    #[error("slippage must be in [0, 1), got {0}")]
    InvalidSlippage(f64),

    #[error("stop_loss must be in (0, 1), got {0}")]
    InvalidStopLoss(f64),

    #[error("take_profit must be a positive number, got {0}")]
    InvalidTakeProfit(f64),

    #[error("unknown strategy_type '{0}'")]
    UnknownStrategy(String),

    #[error("strategy parameters: {0}")]
    Strategy(#[from] StrategyError),
}

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_position_size() -> f64 {
    1.0
}

fn default_commission() -> f64 {
    0.001
}

fn default_slippage() -> f64 {
    0.001
}

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestConfig {
    /// One of the registered strategy identifiers (see `barlab strategies`).
    pub strategy_type: String,
    pub ticker: String,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    /// Fraction of cash committed per entry.
    #[serde(default = "default_position_size")]
    pub position_size: f64,
    /// Fraction of notional, per side.
    #[serde(default = "default_commission")]
    pub commission: f64,
    /// Fraction of price, per side.
    #[serde(default = "default_slippage")]
    pub slippage: f64,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub params: StrategyParams,
}

impl BacktestConfig {
    /// A config with the default capital, sizing and costs.
    pub fn new(
        strategy_type: impl Into<String>,
        ticker: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            strategy_type: strategy_type.into(),
            ticker: ticker.into(),
            start_date,
            end_date,
            initial_capital: default_initial_capital(),
            position_size: default_position_size(),
            commission: default_commission(),
            slippage: default_slippage(),
            stop_loss: None,
            take_profit: None,
            params: StrategyParams::default(),
        }
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check every field and resolve the strategy.
    pub fn validate(&self) -> Result<ValidatedConfig, ValidationError> {
        let ticker = self.ticker.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }
        if self.start_date >= self.end_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(ValidationError::InvalidCapital(self.initial_capital));
        }
        if !(self.position_size > 0.0 && self.position_size <= 1.0) {
            return Err(ValidationError::InvalidPositionSize(self.position_size));
        }
        if !is_cost_fraction(self.commission) {
            return Err(ValidationError::InvalidCommission(self.commission));
        }
        if !is_cost_fraction(self.slippage) {
            return Err(ValidationError::InvalidSlippage(self.slippage));
        }
        if let Some(sl) = self.stop_loss {
            if !(sl > 0.0 && sl < 1.0) {
                return Err(ValidationError::InvalidStopLoss(sl));
            }
        }
        if let Some(tp) = self.take_profit {
            if !(tp.is_finite() && tp > 0.0) {
                return Err(ValidationError::InvalidTakeProfit(tp));
            }
        }

        let kind: StrategyType = self
            .strategy_type
            .parse()
            .map_err(|_| ValidationError::UnknownStrategy(self.strategy_type.clone()))?;
        let strategy = Strategy::new(kind, &self.params)?;

        let simulation = SimulationConfig::new(self.initial_capital)
            .with_position_size(self.position_size)
            .with_costs(CostModel::new(self.slippage, self.commission))
            .with_exits(ExitRules {
                stop_loss: self.stop_loss,
                take_profit: self.take_profit,
            });

        Ok(ValidatedConfig {
            config: BacktestConfig {
                ticker,
                ..self.clone()
            },
            strategy,
            simulation,
        })
    }
}

fn is_cost_fraction(value: f64) -> bool {
    (0.0..1.0).contains(&value)
}

/// A config that passed validation, with its strategy resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: BacktestConfig,
    strategy: Strategy,
    simulation: SimulationConfig,
}

impl ValidatedConfig {
    /// The source config, with the ticker normalized (trimmed, upper-case).
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn ticker(&self) -> &str {
        &self.config.ticker
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    /// Same costs and capital, full position, no protective exits.
    pub fn benchmark_simulation(&self) -> SimulationConfig {
        SimulationConfig::new(self.simulation.initial_capital).with_costs(self.simulation.costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base() -> BacktestConfig {
        BacktestConfig::new("ma_cross", "spy", date(2023, 1, 1), date(2023, 12, 31))
    }

    #[test]
    fn parse_minimal_toml_uses_defaults() {
        let toml = r#"
            strategy_type = "rsi_reversal"
            ticker = "AAPL"
            start_date = "2023-01-01"
            end_date = "2023-12-31"
        "#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        assert_eq!(config.initial_capital, 100_000.0);
        assert_eq!(config.position_size, 1.0);
        assert_eq!(config.commission, 0.001);
        assert_eq!(config.slippage, 0.001);
        assert_eq!(config.stop_loss, None);
        assert_eq!(config.params, StrategyParams::default());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
            strategy_type = "ma_cross"
            ticker = "QQQ"
            start_date = "2020-01-01"
            end_date = "2024-01-01"
            initial_capital = 50000.0
            position_size = 0.5
            commission = 0.0
            slippage = 0.0005
            stop_loss = 0.08
            take_profit = 0.2

            [params]
            fast_period = 20
            slow_period = 100
        "#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        assert_eq!(config.stop_loss, Some(0.08));
        assert_eq!(config.params.fast_period, 20);
        assert_eq!(config.params.slow_period, 100);
        assert_eq!(config.params.rsi_period, 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let toml = r#"
            strategy_type = "ma_cross"
            ticker = "QQQ"
            start_date = "2020-01-01"
            end_date = "2024-01-01"
            leverage = 3
        "#;
        assert!(matches!(
            BacktestConfig::from_toml(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BacktestConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn validate_normalizes_ticker_and_resolves_strategy() {
        let validated = base().validate().unwrap();
        assert_eq!(validated.ticker(), "SPY");
        assert_eq!(validated.strategy().kind(), StrategyType::MaCross);
        assert_eq!(validated.simulation().costs.commission, 0.001);
    }

    #[test]
    fn validation_errors_name_the_field() {
        let cases: Vec<(BacktestConfig, ValidationError)> = vec![
            (
                BacktestConfig {
                    ticker: "  ".into(),
                    ..base()
                },
                ValidationError::EmptyTicker,
            ),
            (
                BacktestConfig {
                    end_date: date(2023, 1, 1),
                    ..base()
                },
                ValidationError::InvalidDateRange {
                    start: date(2023, 1, 1),
                    end: date(2023, 1, 1),
                },
            ),
            (
                BacktestConfig {
                    initial_capital: 0.0,
                    ..base()
                },
                ValidationError::InvalidCapital(0.0),
            ),
            (
                BacktestConfig {
                    position_size: 1.5,
                    ..base()
                },
                ValidationError::InvalidPositionSize(1.5),
            ),
            (
                BacktestConfig {
                    commission: -0.01,
                    ..base()
                },
                ValidationError::InvalidCommission(-0.01),
            ),
            (
                BacktestConfig {
                    slippage: 1.0,
                    ..base()
                },
                ValidationError::InvalidSlippage(1.0),
            ),
            (
                BacktestConfig {
                    stop_loss: Some(1.0),
                    ..base()
                },
                ValidationError::InvalidStopLoss(1.0),
            ),
            (
                BacktestConfig {
                    take_profit: Some(0.0),
                    ..base()
                },
                ValidationError::InvalidTakeProfit(0.0),
            ),
            (
                BacktestConfig {
                    strategy_type: "magic".into(),
                    ..base()
                },
                ValidationError::UnknownStrategy("magic".into()),
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate().unwrap_err(), expected);
        }
    }

    #[test]
    fn position_size_zero_rejected_one_accepted() {
        let zero = BacktestConfig {
            position_size: 0.0,
            ..base()
        };
        assert!(zero.validate().is_err());
        let one = BacktestConfig {
            position_size: 1.0,
            ..base()
        };
        assert!(one.validate().is_ok());
    }

    #[test]
    fn nan_capital_rejected() {
        let config = BacktestConfig {
            initial_capital: f64::NAN,
            ..base()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCapital(_))
        ));
    }

    #[test]
    fn bad_strategy_params_surface() {
        let mut config = base();
        config.params.fast_period = 300;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::Strategy(_)));
        assert!(err.to_string().contains("fast_period"));
    }

    #[test]
    fn benchmark_simulation_drops_sizing_and_exits() {
        let config = BacktestConfig {
            position_size: 0.3,
            stop_loss: Some(0.1),
            ..base()
        };
        let validated = config.validate().unwrap();
        let bench = validated.benchmark_simulation();
        assert_eq!(bench.position_size, 1.0);
        assert_eq!(bench.exits, ExitRules::none());
        assert_eq!(bench.costs, validated.simulation().costs);
    }
}
