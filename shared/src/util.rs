//! Small helpers shared by the domain core and the server

/// Current UTC time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Snowflake-style i64 identifier for menu items.
///
/// 41 bits of milliseconds since 2024-01-01 UTC followed by a 12-bit
/// sequence. Ids are strictly increasing within a process and stay below
/// 2^53 for JavaScript clients.
pub fn snowflake_id() -> i64 {
    use std::sync::atomic::{AtomicI64, Ordering};
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static LAST_ID: AtomicI64 = AtomicI64::new(0);

    let candidate = ((now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF) << 12;
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Slug used as a menu category id: `"Veg Starters"` -> `"veg-starters"`
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Trim an optional free-text field, mapping blank input to `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_are_unique_and_js_safe() {
        let ids: Vec<i64> = (0..1000).map(|_| snowflake_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| *id > 0 && *id < (1_i64 << 53)));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Veg Starters"), "veg-starters");
        assert_eq!(slugify("  Indian  Non-Veg Curries "), "indian-non-veg-curries");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  4 ")), Some("4".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
