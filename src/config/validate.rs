// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, JobsConfig, RawConfigFile};
use crate::errors::{Result, ShellError};
use crate::shell::DEFAULT_GRACE_PERIOD;

/// Upper bound on the grace period; shutdown must finish in bounded time.
pub const MAX_GRACE_PERIOD: Duration = Duration::from_secs(60);

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ShellError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let grace_period = match raw.jobs.grace_period.as_deref() {
            Some(s) => parse_grace_period(s)?,
            None => DEFAULT_GRACE_PERIOD,
        };
        Ok(ConfigFile::new_unchecked(raw.shell, JobsConfig { grace_period }))
    }
}

/// Parse and bound-check a grace period string.
pub fn parse_grace_period(s: &str) -> Result<Duration> {
    let grace = parse_duration(s)
        .map_err(|e| ShellError::Config(format!("[jobs].grace_period: {e}")))?;

    if grace.is_zero() {
        return Err(ShellError::Config(
            "[jobs].grace_period must be greater than zero".to_string(),
        ));
    }
    if grace > MAX_GRACE_PERIOD {
        return Err(ShellError::Config(format!(
            "[jobs].grace_period must be at most {}s (got {s})",
            MAX_GRACE_PERIOD.as_secs()
        )));
    }
    Ok(grace)
}

/// Parse a simple duration string like `"3s"`, `"250ms"` or `"1m"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s or m",
            unit
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RawJobsSection;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
        assert!(parse_duration("3").is_err());
        assert!(parse_duration("3h").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("ms").is_err());
    }

    #[test]
    fn grace_period_must_be_bounded_and_positive() {
        assert!(matches!(parse_grace_period("0s"), Err(ShellError::Config(_))));
        assert!(matches!(parse_grace_period("2m"), Err(ShellError::Config(_))));
        assert_eq!(parse_grace_period("60s").unwrap(), MAX_GRACE_PERIOD);
    }

    #[test]
    fn missing_grace_period_uses_default() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.jobs.grace_period, DEFAULT_GRACE_PERIOD);
        assert!(cfg.shell.report_timing);

        let raw = RawConfigFile {
            jobs: RawJobsSection {
                grace_period: Some("150ms".into()),
            },
            ..RawConfigFile::default()
        };
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(cfg.jobs.grace_period, Duration::from_millis(150));
    }
}
