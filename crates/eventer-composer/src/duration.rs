//! Minimal duration-string parser for the `step` argument of `get_timestamp`.
//!
//! Accepts the same shorthand as the built-ins table: a decimal number
//! immediately followed by one of `ms`, `s`, `m`, `h`, `d`. No compound
//! durations (`1h30m`) are accepted — the spec's examples are all single-unit.

use crate::errors::ComposerError;

pub fn parse_duration_secs(raw: &str) -> Result<f64, ComposerError> {
    let raw = raw.trim();
    let split_at = raw
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .ok_or_else(|| ComposerError::BadDuration(format!("no unit in duration {raw:?}")))?;
    let (number, unit) = raw.split_at(split_at);
    let qty: f64 = number
        .parse()
        .map_err(|_| ComposerError::BadDuration(format!("bad numeric duration {raw:?}")))?;
    let unit_secs = match unit {
        "ms" => 0.001,
        "s" => 1.0,
        "m" => 60.0,
        "h" => 3600.0,
        "d" => 86_400.0,
        other => {
            return Err(ComposerError::BadDuration(format!(
                "unknown duration unit {other:?}"
            )))
        }
    };
    Ok(qty * unit_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration_secs("1h").unwrap(), 3600.0);
        assert_eq!(parse_duration_secs("1s").unwrap(), 1.0);
        assert_eq!(parse_duration_secs("500ms").unwrap(), 0.5);
        assert_eq!(parse_duration_secs("2d").unwrap(), 172_800.0);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(parse_duration_secs("1y").is_err());
    }
}
