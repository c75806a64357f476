//! Validation utilities for configuration values
//!
//! Shared by component constructors and the CLI value parsers so both reject
//! the same inputs with the same messages.

use std::time::Duration;

/// Smallest number of messages a producer may be asked to generate
pub const MIN_MESSAGE_COUNT: usize = 2;

/// Smallest display period and mean sender wait, in seconds
pub const MIN_PERIOD_SECS: f64 = 1.0;

/// Largest period, mean wait or run duration accepted, in seconds (one year)
pub const MAX_SECONDS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Validate the producer's target message count
pub fn validate_message_count(count: usize) -> Result<usize, String> {
    if count < MIN_MESSAGE_COUNT {
        return Err(format!(
            "producer must generate at least {} messages, got {}",
            MIN_MESSAGE_COUNT, count
        ));
    }
    Ok(count)
}

/// Validate a queue capacity
pub fn validate_capacity(capacity: usize) -> Result<usize, String> {
    if capacity == 0 {
        return Err("queue capacity must be greater than 0".to_string());
    }
    Ok(capacity)
}

/// Validate a probability in the closed range [0, 1]
pub fn validate_probability(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("{} must be within [0, 1], got {}", name, value));
    }
    Ok(value)
}

/// Validate a duration in seconds against a lower bound and [`MAX_SECONDS`]
pub fn validate_min_seconds(name: &str, value: f64, min: f64) -> Result<f64, String> {
    if !value.is_finite() || value < min {
        return Err(format!(
            "{} must be at least {:.1} seconds, got {}",
            name, min, value
        ));
    }
    if value > MAX_SECONDS {
        return Err(format!(
            "{} must be at most {} seconds, got {}",
            name, MAX_SECONDS, value
        ));
    }
    Ok(value)
}

/// Validate a run duration: positive, finite and at most [`MAX_SECONDS`]
pub fn validate_run_duration(value: f64) -> Result<f64, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("duration must be a positive number of seconds, got {}", value));
    }
    if value > MAX_SECONDS {
        return Err(format!(
            "duration must be at most {} seconds, got {}",
            MAX_SECONDS, value
        ));
    }
    Ok(value)
}

/// Convert validated seconds into a `Duration` without panicking on overflow
pub fn seconds_to_duration(name: &str, value: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| format!("{} of {} seconds is not representable: {}", name, value, e))
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Parse a `FAILURE_RATE:MEAN_WAIT` sender specification
pub fn parse_sender_spec(value: &str) -> Result<(f64, f64), String> {
    let (rate, wait) = value
        .split_once(':')
        .ok_or_else(|| format!("'{}' is not in FAILURE_RATE:MEAN_WAIT form", value))?;

    let rate: f64 = rate
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid failure rate", rate.trim()))?;
    let wait: f64 = wait
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid mean wait", wait.trim()))?;

    Ok((
        validate_probability("failure rate", rate)?,
        validate_min_seconds("mean wait", wait, MIN_PERIOD_SECS)?,
    ))
}
