//! Runtime tunables for the controller.
//!
//! Every value has a compile-time default and can be overridden through an
//! environment variable. Numeric values that fail to parse fall back to the
//! default.

use std::path::PathBuf;
use std::time::Duration;

use gantry::GantryConfig;

/// Default stepper steps needed to cross one square.
const DEFAULT_STEPS_PER_SQUARE: u32 = gantry::DEFAULT_STEPS_PER_SQUARE;

/// Default steps per axis before alternating on a diagonal leg.
const DEFAULT_DIAGONAL_CHUNK: u32 = gantry::DEFAULT_DIAGONAL_CHUNK;

/// Default wait after powering the driver board (in milliseconds).
const DEFAULT_POWER_UP_MS: u64 = 1000;

/// Default wait after the last pulse of a leg (in milliseconds).
const DEFAULT_SETTLE_MS: u64 = 500;

/// Default half period of a step pulse (in microseconds).
const DEFAULT_PULSE_US: u64 = 800;

/// Default time the capture lamp stays lit (in milliseconds).
const DEFAULT_ALERT_MS: u64 = 5000;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get the directory for rolling log files.
///
/// Priority:
/// 1. `WIZCHESS_LOG_DIR` env variable if set
/// 2. `None`: logs go to stderr only
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var_os("WIZCHESS_LOG_DIR").map(PathBuf::from)
}

/// Get the steps per square (`WIZCHESS_STEPS_PER_SQUARE`, default 200).
pub fn get_steps_per_square() -> u32 {
    env_or("WIZCHESS_STEPS_PER_SQUARE", DEFAULT_STEPS_PER_SQUARE)
}

/// Get the diagonal chunk size (`WIZCHESS_DIAGONAL_CHUNK`, default 5).
pub fn get_diagonal_chunk() -> u32 {
    env_or("WIZCHESS_DIAGONAL_CHUNK", DEFAULT_DIAGONAL_CHUNK)
}

/// Get the power-up wait in milliseconds (`WIZCHESS_POWER_UP_MS`, default 1000).
pub fn get_power_up_ms() -> u64 {
    env_or("WIZCHESS_POWER_UP_MS", DEFAULT_POWER_UP_MS)
}

/// Get the settle wait in milliseconds (`WIZCHESS_SETTLE_MS`, default 500).
pub fn get_settle_ms() -> u64 {
    env_or("WIZCHESS_SETTLE_MS", DEFAULT_SETTLE_MS)
}

/// Get the step pulse half period in microseconds (`WIZCHESS_PULSE_US`, default 800).
pub fn get_pulse_us() -> u64 {
    env_or("WIZCHESS_PULSE_US", DEFAULT_PULSE_US)
}

/// Get the capture lamp duration in milliseconds (`WIZCHESS_ALERT_MS`, default 5000).
pub fn get_alert_ms() -> u64 {
    env_or("WIZCHESS_ALERT_MS", DEFAULT_ALERT_MS)
}

/// Assemble the gantry parameters from the environment.
pub fn gantry_config() -> GantryConfig {
    GantryConfig {
        steps_per_square: get_steps_per_square(),
        diagonal_chunk: get_diagonal_chunk(),
        power_up: Duration::from_millis(get_power_up_ms()),
        settle: Duration::from_millis(get_settle_ms()),
        alert: Duration::from_millis(get_alert_ms()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_dir() {
        let dir = get_log_dir();
        match std::env::var_os("WIZCHESS_LOG_DIR") {
            Some(val) => assert_eq!(dir, Some(PathBuf::from(val))),
            None => assert_eq!(dir, None),
        }
    }

    #[test]
    fn test_get_steps_per_square_default() {
        if std::env::var("WIZCHESS_STEPS_PER_SQUARE").is_err() {
            assert_eq!(get_steps_per_square(), 200);
        }
    }

    #[test]
    fn test_timing_defaults() {
        if std::env::var("WIZCHESS_POWER_UP_MS").is_err() {
            assert_eq!(get_power_up_ms(), DEFAULT_POWER_UP_MS);
        }
        if std::env::var("WIZCHESS_SETTLE_MS").is_err() {
            assert_eq!(get_settle_ms(), DEFAULT_SETTLE_MS);
        }
        if std::env::var("WIZCHESS_PULSE_US").is_err() {
            assert_eq!(get_pulse_us(), DEFAULT_PULSE_US);
        }
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("WIZCHESS_TEST_GARBAGE_CHUNK", "five");
        assert_eq!(env_or("WIZCHESS_TEST_GARBAGE_CHUNK", 5u32), 5);
        std::env::set_var("WIZCHESS_TEST_GARBAGE_CHUNK", " 7 ");
        assert_eq!(env_or("WIZCHESS_TEST_GARBAGE_CHUNK", 5u32), 7);
        std::env::remove_var("WIZCHESS_TEST_GARBAGE_CHUNK");
        assert_eq!(env_or("WIZCHESS_TEST_GARBAGE_CHUNK", 5u32), 5);
    }

    #[test]
    fn test_gantry_config_matches_getters() {
        let config = gantry_config();
        assert_eq!(config.steps_per_square, get_steps_per_square());
        assert_eq!(config.diagonal_chunk, get_diagonal_chunk());
        assert_eq!(config.settle, Duration::from_millis(get_settle_ms()));
    }
}
