//! Kubernetes-style resource quantities
//!
//! CPU is tracked in millicores and memory in bytes. Snapshot files may give
//! either a plain number or a quantity string such as `"500m"`, `"2"`,
//! `"512Mi"` or `"16Gi"`.
//!
//! The two forms use different units for CPU: a bare number is always
//! millicores (`cpu_millis = 500`), while a string without a suffix is
//! cores (`cpu_millis = "0.5"`). Numbers must therefore be whole; a
//! fractional number such as `0.5` is rejected instead of being rounded.

use crate::{TopsisError, TopsisResult};
use serde::{Deserialize, Deserializer};

const MEMORY_SUFFIXES: [(&str, f64); 9] = [
    ("Ki", 1024.0),
    ("Mi", 1024.0 * 1024.0),
    ("Gi", 1024.0 * 1024.0 * 1024.0),
    ("Ti", 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("k", 1e3),
    ("K", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
];

fn parse_mantissa(raw: &str, mantissa: &str) -> TopsisResult<f64> {
    let value: f64 = mantissa
        .trim()
        .parse()
        .map_err(|_| TopsisError::Quantity(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(TopsisError::Quantity(raw.to_string()));
    }
    Ok(value)
}

fn to_units(raw: &str, value: f64) -> TopsisResult<u64> {
    let rounded = value.round();
    if rounded > u64::MAX as f64 {
        return Err(TopsisError::Quantity(raw.to_string()));
    }
    Ok(rounded as u64)
}

/// Parse a CPU quantity into millicores
///
/// `"250m"` is 250 millicores, `"2"` and `"0.5"` are cores.
pub fn parse_cpu_millis(raw: &str) -> TopsisResult<u64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(TopsisError::Quantity(raw.to_string()));
    }
    match s.strip_suffix('m') {
        Some(millis) => to_units(raw, parse_mantissa(raw, millis)?),
        None => to_units(raw, parse_mantissa(raw, s)? * 1000.0),
    }
}

/// Parse a memory quantity into bytes
///
/// Binary (`Ki`, `Mi`, `Gi`, `Ti`) and decimal (`k`, `M`, `G`, `T`)
/// suffixes are accepted; no suffix means bytes.
pub fn parse_memory_bytes(raw: &str) -> TopsisResult<u64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(TopsisError::Quantity(raw.to_string()));
    }
    for (suffix, multiplier) in MEMORY_SUFFIXES {
        if let Some(mantissa) = s.strip_suffix(suffix) {
            return to_units(raw, parse_mantissa(raw, mantissa)? * multiplier);
        }
    }
    to_units(raw, parse_mantissa(raw, s)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(u64),
    Float(f64),
    Text(String),
}

impl RawQuantity {
    fn resolve(self, parse: fn(&str) -> TopsisResult<u64>) -> TopsisResult<u64> {
        match self {
            RawQuantity::Int(v) => Ok(v),
            RawQuantity::Float(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => {
                to_units(&v.to_string(), v)
            }
            RawQuantity::Float(v) => Err(TopsisError::Quantity(format!(
                "{} (numbers are whole base units, use a quantity string for fractions)",
                v
            ))),
            RawQuantity::Text(s) => parse(&s),
        }
    }
}

/// Serde helper: millicores from a number or a CPU quantity string
pub fn deserialize_cpu<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawQuantity::deserialize(deserializer)?
        .resolve(parse_cpu_millis)
        .map_err(serde::de::Error::custom)
}

/// Serde helper: bytes from a number or a memory quantity string
pub fn deserialize_memory<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawQuantity::deserialize(deserializer)?
        .resolve(parse_memory_bytes)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu() {
        assert_eq!(parse_cpu_millis("500m").unwrap(), 500);
        assert_eq!(parse_cpu_millis("2").unwrap(), 2000);
        assert_eq!(parse_cpu_millis("0.25").unwrap(), 250);
        assert_eq!(parse_cpu_millis("1.555").unwrap(), 1555);
        assert_eq!(parse_cpu_millis(" 32 ").unwrap(), 32000);
    }

    #[test]
    fn test_parse_cpu_invalid() {
        assert!(parse_cpu_millis("").is_err());
        assert!(parse_cpu_millis("m").is_err());
        assert!(parse_cpu_millis("-1").is_err());
        assert!(parse_cpu_millis("two").is_err());
        assert!(parse_cpu_millis("NaN").is_err());
    }

    #[test]
    fn test_parse_memory() {
        assert_eq!(parse_memory_bytes("1024").unwrap(), 1024);
        assert_eq!(parse_memory_bytes("512Mi").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_memory_bytes("16Gi").unwrap(), 16 * 1024 * 1024 * 1024);
        assert_eq!(parse_memory_bytes("1.5Gi").unwrap(), 3 * 512 * 1024 * 1024);
        assert_eq!(parse_memory_bytes("2G").unwrap(), 2_000_000_000);
        assert_eq!(parse_memory_bytes("4k").unwrap(), 4000);
    }

    #[test]
    fn test_parse_memory_invalid() {
        assert!(parse_memory_bytes("Gi").is_err());
        assert!(parse_memory_bytes("12Xi").is_err());
        assert!(parse_memory_bytes("-3Mi").is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        #[derive(Deserialize)]
        struct Quantities {
            #[serde(deserialize_with = "deserialize_cpu")]
            cpu: u64,
            #[serde(deserialize_with = "deserialize_memory")]
            memory: u64,
        }

        let p: Quantities = serde_json::from_str(r#"{"cpu": 1500, "memory": "1Ki"}"#).unwrap();
        assert_eq!(p.cpu, 1500);
        assert_eq!(p.memory, 1024);

        let p: Quantities = serde_json::from_str(r#"{"cpu": "1.5", "memory": 2048}"#).unwrap();
        assert_eq!(p.cpu, 1500);
        assert_eq!(p.memory, 2048);

        assert!(serde_json::from_str::<Quantities>(r#"{"cpu": "lots", "memory": 1}"#).is_err());
    }

    #[test]
    fn test_fractional_number_is_rejected() {
        #[derive(Debug, Deserialize)]
        struct Cpu {
            #[serde(deserialize_with = "deserialize_cpu")]
            cpu: u64,
        }

        let whole: Cpu = serde_json::from_str(r#"{"cpu": 1500.0}"#).unwrap();
        assert_eq!(whole.cpu, 1500);

        let err = serde_json::from_str::<Cpu>(r#"{"cpu": 0.5}"#).unwrap_err();
        assert!(err.to_string().contains("quantity string"), "{}", err);
        assert!(serde_json::from_str::<Cpu>(r#"{"cpu": -2.0}"#).is_err());

        let cores: Cpu = serde_json::from_str(r#"{"cpu": "0.5"}"#).unwrap();
        assert_eq!(cores.cpu, 500);
    }
}
