//! Serde helper for duration strings such as "500ms", "5s" or "1m".

use serde::{self, Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    s.map_or(Ok(Duration::ZERO), |s| {
        parse_duration(&s).map_err(serde::de::Error::custom)
    })
}

pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Duration::ZERO);
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (amount, unit) = s.split_at(split);

    let amount: f64 = amount
        .parse()
        .map_err(|_| format!("invalid duration number: {}", amount))?;

    let seconds = match unit.trim() {
        "ms" => amount / 1000.0,
        "" | "s" => amount,
        "m" => amount * 60.0,
        "h" => amount * 3600.0,
        other => return Err(format!("unknown duration unit: {}", other)),
    };

    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration {}: {}", s, e))
}
