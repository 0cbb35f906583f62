use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// A byte quantity scaled into the largest unit keeping the value below 1024.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled {
    pub value: f64,
    pub unit: &'static str,
}

/// Picks the largest unit such that the scaled value is < 1024. No rounding
/// here; display rounding happens in `fmt_number`. Negative input is returned
/// unscaled as bytes.
pub fn scale_bytes(bytes: f64) -> Scaled {
    if bytes < 1024.0 {
        return Scaled { value: bytes, unit: "B" };
    }
    let kb = bytes / 1024.0;
    if kb < 1024.0 {
        return Scaled { value: kb, unit: "KB" };
    }
    let mb = kb / 1024.0;
    if mb < 1024.0 {
        return Scaled { value: mb, unit: "MB" };
    }
    let gb = mb / 1024.0;
    if gb < 1024.0 {
        return Scaled { value: gb, unit: "GB" };
    }
    Scaled { value: gb / 1024.0, unit: "TB" }
}

/// Display formatting for stat values: at most two fraction digits, trailing
/// zeros trimmed, thousands separated with commas.
pub fn fmt_number(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let mut int_part = abs.trunc() as u64;
    let mut frac = ((abs - abs.trunc()) * 100.0).round() as u64;
    if frac >= 100 {
        int_part += 1;
        frac = 0;
    }

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac > 0 {
        if frac % 10 == 0 {
            out.push_str(&format!(".{}", frac / 10));
        } else {
            out.push_str(&format!(".{:02}", frac));
        }
    }
    out
}

/// Formats a query bound the way the backend expects: seconds precision, no
/// fractional part, no trailing `Z`.
pub fn query_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_backend_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Full timestamp for table rows; falls back to the raw string when the
/// backend sends something unparseable.
pub fn fmt_timestamp(raw: &str) -> String {
    match parse_backend_time(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Short hour:minute label for chart x-axes.
pub fn fmt_bucket(raw: &str) -> String {
    match parse_backend_time(raw) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Pod labels arrive as a serialized JSON object. Anything that is not an
/// object of scalars degrades to an empty map rather than an error.
pub fn parse_labels(raw: &str) -> BTreeMap<String, String> {
    let parsed: BTreeMap<String, serde_json::Value> = match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(_) => return BTreeMap::new(),
    };
    parsed
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn scale_bytes_boundaries() {
        assert_eq!(scale_bytes(0.0), Scaled { value: 0.0, unit: "B" });
        assert_eq!(scale_bytes(1023.0), Scaled { value: 1023.0, unit: "B" });
        assert_eq!(scale_bytes(1024.0), Scaled { value: 1.0, unit: "KB" });
        assert_eq!(scale_bytes(1024.0 * 1024.0), Scaled { value: 1.0, unit: "MB" });
        assert_eq!(
            scale_bytes(1024.0 * 1024.0 * 1024.0),
            Scaled { value: 1.0, unit: "GB" }
        );
        assert_eq!(
            scale_bytes(1024.0 * 1024.0 * 1024.0 * 1024.0),
            Scaled { value: 1.0, unit: "TB" }
        );
    }

    #[test]
    fn scale_bytes_escalates_monotonically() {
        let units = ["B", "KB", "MB", "GB", "TB"];
        for (i, unit) in units.iter().enumerate() {
            let just_below = 1024f64.powi(i as i32 + 1) - 1.0;
            let at_boundary = 1024f64.powi(i as i32 + 1);
            assert_eq!(scale_bytes(just_below).unit, *unit);
            if i + 1 < units.len() {
                assert_eq!(scale_bytes(at_boundary).unit, units[i + 1]);
            }
        }
    }

    #[test]
    fn scale_bytes_half_gig() {
        let s = scale_bytes(536_870_912.0);
        assert_eq!(s, Scaled { value: 512.0, unit: "MB" });
    }

    #[test]
    fn scale_bytes_negative_stays_bytes() {
        assert_eq!(scale_bytes(-5.0).unit, "B");
    }

    #[test]
    fn fmt_number_rounds_and_groups() {
        assert_eq!(fmt_number(120.0), "120");
        assert_eq!(fmt_number(512.0), "512");
        assert_eq!(fmt_number(1234567.0), "1,234,567");
        assert_eq!(fmt_number(3.14159), "3.14");
        assert_eq!(fmt_number(2.5), "2.5");
        assert_eq!(fmt_number(0.999), "1");
        assert_eq!(fmt_number(-1200.25), "-1,200.25");
    }

    #[test]
    fn query_time_strips_millis_and_zone() {
        let t = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(query_time(t), "2025-01-02T03:04:05");
    }

    #[test]
    fn timestamps_accept_naive_and_rfc3339() {
        assert_eq!(fmt_timestamp("2025-01-02T03:04:05"), "2025-01-02 03:04:05");
        assert_eq!(fmt_timestamp("2025-01-02T03:04:05.123Z"), "2025-01-02 03:04:05");
        assert_eq!(fmt_bucket("2025-01-02T03:04:05"), "03:04");
        // unparseable input passes through
        assert_eq!(fmt_timestamp("not-a-time"), "not-a-time");
    }

    #[test]
    fn parse_labels_is_defensive() {
        let labels = parse_labels(r#"{"app":"web","tier":"frontend"}"#);
        assert_eq!(labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(labels.len(), 2);

        assert!(parse_labels("").is_empty());
        assert!(parse_labels("not json").is_empty());
        assert!(parse_labels("[1,2,3]").is_empty());

        // non-string scalar values are stringified
        let labels = parse_labels(r#"{"replicas": 3}"#);
        assert_eq!(labels.get("replicas").map(String::as_str), Some("3"));
    }
}
