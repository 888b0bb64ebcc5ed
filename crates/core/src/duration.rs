//! ISO-8601 duration parsing for YouTube `contentDetails.duration` values
//! such as `PT1H2M3S` or `P1DT30M`.

use std::sync::LazyLock;

use regex::Regex;

const ISO8601_DURATION_PATTERN: &str =
    r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$";

static ISO8601_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ISO8601_DURATION_PATTERN).expect("valid regex"));

const SECONDS_PER_UNIT: [i64; 5] = [7 * 86_400, 86_400, 3_600, 60, 1];

/// Convert an ISO-8601 duration to whole seconds.
///
/// Returns `None` for strings that are not durations. Live streams report
/// `P0D`, which parses to zero.
pub fn iso8601_to_seconds(duration: &str) -> Option<i64> {
    let caps = ISO8601_DURATION_RE.captures(duration.trim())?;

    let mut total: i64 = 0;
    for (idx, multiplier) in SECONDS_PER_UNIT.iter().enumerate() {
        if let Some(m) = caps.get(idx + 1) {
            let value: i64 = m.as_str().parse().ok()?;
            total = total.checked_add(value.checked_mul(*multiplier)?)?;
        }
    }
    Some(total)
}
