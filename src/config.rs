//! Game configuration.
//!
//! Configuration text is written in the plan language itself, restricted to
//! a flat list of assignments:
//!
//! ```text
//! m = 20
//! n = 15
//! init_budget = 10000
//! max_dep = 1000000
//! interest_pct = 5
//! ```
//!
//! Later assignments may refer to earlier keys. Unknown keys are accepted
//! and ignored; missing keys take their defaults.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::game::Direction;
use crate::plan::{eval, parse, Environment, Stmt};

/// Largest accepted number of rows or columns.
pub const MAX_DIMENSION: i64 = 1_000;

/// Settings for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Board rows (`m`).
    pub rows: i32,
    /// Board columns (`n`).
    pub cols: i32,
    /// Minutes for the initial plan (`init_plan_min`).
    pub init_plan_min: i64,
    /// Seconds for the initial plan (`init_plan_sec`), below 60.
    pub init_plan_sec: i64,
    /// Starting budget of each player (`init_budget`).
    pub init_budget: i64,
    /// Starting deposit of each city center (`init_center_dep`).
    pub init_center_dep: i64,
    /// Minutes for a plan revision (`plan_rev_min`).
    pub plan_rev_min: i64,
    /// Seconds for a plan revision (`plan_rev_sec`), below 60.
    pub plan_rev_sec: i64,
    /// Budget cost of revising a plan (`rev_cost`).
    pub rev_cost: i64,
    /// Deposit cap of every region (`max_dep`).
    pub max_dep: i64,
    /// Interest coefficient (`interest_pct`).
    pub interest_pct: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 15,
            init_plan_min: 5,
            init_plan_sec: 0,
            init_budget: 10_000,
            init_center_dep: 100,
            plan_rev_min: 30,
            plan_rev_sec: 0,
            rev_cost: 100,
            max_dep: 1_000_000,
            interest_pct: 0,
        }
    }
}

impl Config {
    /// Parse and validate configuration text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text does not parse, contains
    /// anything but assignments, or sets a value out of range.
    pub fn load(src: &str) -> Result<Self, ConfigError> {
        let plan = parse(src)?;
        let mut values = ConfigValues::default();

        for (idx, stmt) in plan.statements.iter().enumerate() {
            let Stmt::Assign { name, value, line } = stmt else {
                return Err(ConfigError::NotAnAssignment { position: idx + 1 });
            };
            if value.uses_info() {
                return Err(ConfigError::BoardQuery {
                    key: name.clone(),
                    line: *line,
                });
            }
            let evaluated = eval(value, &mut values);
            values.0.insert(name.clone(), evaluated);
        }

        let defaults = Self::default();
        let config = Self {
            rows: dimension(&values, "m", defaults.rows)?,
            cols: dimension(&values, "n", defaults.cols)?,
            init_plan_min: values.get("init_plan_min", defaults.init_plan_min),
            init_plan_sec: values.get("init_plan_sec", defaults.init_plan_sec),
            init_budget: values.get("init_budget", defaults.init_budget),
            init_center_dep: values.get("init_center_dep", defaults.init_center_dep),
            plan_rev_min: values.get("plan_rev_min", defaults.plan_rev_min),
            plan_rev_sec: values.get("plan_rev_sec", defaults.plan_rev_sec),
            rev_cost: values.get("rev_cost", defaults.rev_cost),
            max_dep: values.get("max_dep", defaults.max_dep),
            interest_pct: values.get("interest_pct", defaults.interest_pct),
        };
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("init_plan_sec", self.init_plan_sec),
            ("plan_rev_sec", self.plan_rev_sec),
        ] {
            if value >= 60 {
                return Err(ConfigError::SecondsOutOfRange { key, value });
            }
        }

        let non_negative = [
            ("init_plan_min", self.init_plan_min),
            ("init_plan_sec", self.init_plan_sec),
            ("plan_rev_min", self.plan_rev_min),
            ("plan_rev_sec", self.plan_rev_sec),
            ("init_budget", self.init_budget),
            ("rev_cost", self.rev_cost),
            ("interest_pct", self.interest_pct),
        ];
        for (key, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }

        if self.max_dep < 1 {
            return Err(ConfigError::OutOfRange {
                key: "max_dep",
                value: self.max_dep,
            });
        }
        if !(1..=self.max_dep).contains(&self.init_center_dep) {
            return Err(ConfigError::OutOfRange {
                key: "init_center_dep",
                value: self.init_center_dep,
            });
        }
        for (key, value) in [("m", self.rows), ("n", self.cols)] {
            if !(1..=MAX_DIMENSION).contains(&i64::from(value)) {
                return Err(ConfigError::OutOfRange {
                    key,
                    value: i64::from(value),
                });
            }
        }
        Ok(())
    }

    /// Time allowed for the initial plan.
    #[must_use]
    pub fn initial_plan_time(&self) -> Duration {
        minutes_seconds(self.init_plan_min, self.init_plan_sec)
    }

    /// Time allowed for a plan revision.
    #[must_use]
    pub fn revision_plan_time(&self) -> Duration {
        minutes_seconds(self.plan_rev_min, self.plan_rev_sec)
    }

    /// Interest rate, in percent, for a region holding `deposit` at `turn`.
    ///
    /// The rate grows with the logarithm of both the deposit and the turn
    /// number, so it is 0 on the first turn and for empty regions.
    #[must_use]
    pub fn interest_rate(&self, turn: i64, deposit: i64) -> f64 {
        if deposit <= 0 || turn <= 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let (pct, deposit, turn) = (self.interest_pct as f64, deposit as f64, turn as f64);
        pct * deposit.log10() * turn.ln()
    }
}

fn minutes_seconds(minutes: i64, seconds: i64) -> Duration {
    let total = minutes.saturating_mul(60).saturating_add(seconds);
    Duration::from_secs(u64::try_from(total).unwrap_or(0))
}

fn dimension(values: &ConfigValues, key: &'static str, default: i32) -> Result<i32, ConfigError> {
    let value = values.get(key, i64::from(default));
    i32::try_from(value).map_err(|_| ConfigError::OutOfRange { key, value })
}

/// Values assigned so far; also the evaluation environment for later ones.
#[derive(Debug, Default)]
struct ConfigValues(HashMap<String, i64>);

impl ConfigValues {
    fn get(&self, key: &str, default: i64) -> i64 {
        self.0.get(key).copied().unwrap_or(default)
    }
}

impl Environment for ConfigValues {
    fn lookup(&mut self, name: &str) -> i64 {
        self.get(name, 0)
    }

    fn opponent(&mut self) -> i64 {
        0
    }

    fn nearby(&mut self, _direction: Direction) -> i64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let config = Config::load("x = 1").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 15);
        assert_eq!(config.initial_plan_time(), Duration::from_secs(300));
        assert_eq!(config.revision_plan_time(), Duration::from_secs(1800));
    }

    #[test]
    fn test_load_all_keys() {
        let src = "
            m = 4
            n = 4
            init_plan_min = 5
            init_plan_sec = 30
            init_budget = 10000
            init_center_dep = 100
            plan_rev_min = 30
            plan_rev_sec = 0
            rev_cost = 100
            max_dep = 1000000
            interest_pct = 5
        ";
        let config = Config::load(src).unwrap();
        assert_eq!(config.rows, 4);
        assert_eq!(config.cols, 4);
        assert_eq!(config.interest_pct, 5);
        assert_eq!(config.initial_plan_time(), Duration::from_secs(330));
    }

    #[test]
    fn test_expressions_and_earlier_keys() {
        let config = Config::load("m = 2 * 5  n = m + 1  max_dep = 10 ^ 6").unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 11);
        assert_eq!(config.max_dep, 1_000_000);
    }

    #[test]
    fn test_seconds_must_be_below_sixty() {
        assert_eq!(
            Config::load("init_plan_sec = 60"),
            Err(ConfigError::SecondsOutOfRange {
                key: "init_plan_sec",
                value: 60
            })
        );
        assert!(matches!(
            Config::load("plan_rev_sec = 75"),
            Err(ConfigError::SecondsOutOfRange { .. })
        ));
        assert!(Config::load("plan_rev_sec = 59").is_ok());
    }

    #[test]
    fn test_only_assignments() {
        assert_eq!(
            Config::load("m = 4 done"),
            Err(ConfigError::NotAnAssignment { position: 2 })
        );
    }

    #[test]
    fn test_board_queries_rejected() {
        assert!(matches!(
            Config::load("m = opponent"),
            Err(ConfigError::BoardQuery { .. })
        ));
    }

    #[test]
    fn test_syntax_error_propagates() {
        assert!(matches!(Config::load("m 4"), Err(ConfigError::Syntax(_))));
        assert!(matches!(Config::load(""), Err(ConfigError::Syntax(_))));
    }

    #[test]
    fn test_range_checks() {
        assert!(matches!(Config::load("m = 0"), Err(ConfigError::OutOfRange { key: "m", .. })));
        assert!(matches!(
            Config::load("init_center_dep = 0"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Config::load("max_dep = 50 init_center_dep = 100"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Config::load("n = 99999999999"),
            Err(ConfigError::OutOfRange { key: "n", .. })
        ));
    }

    #[test]
    fn test_interest_rate() {
        let config = Config {
            interest_pct: 5,
            ..Config::default()
        };
        assert!(config.interest_rate(1, 100).abs() < 1e-12);
        assert!(config.interest_rate(5, 0).abs() < 1e-12);
        let expected = 5.0 * 2.0 * 3f64.ln();
        assert!((config.interest_rate(3, 100) - expected).abs() < 1e-9);
        assert!(Config::default().interest_rate(10, 1000).abs() < 1e-12);
    }
}
