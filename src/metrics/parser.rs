use std::sync::OnceLock;

use regex::Regex;

use super::Sample;

/// Matches hashcat's per-device speed line, e.g.
///
/// ```text
/// Speed.#1.........:  1234.5 MH/s (54.32ms) @ Accel:1024 Loops:1024 Thr:1 Vec:8
/// ```
///
/// Group 1 is the rate token (`1234.5 MH/s`), group 2 the latency token
/// (`54.32ms`). `.` does not cross line boundaries. Digits are ASCII only,
/// the same set `numeric` keeps.
const SPEED_PATTERN: &str = r"Speed\.#[0-9]+.*?([0-9.]+ [kMGT]?H/s)\s+\(([0-9.]+ms)\)";

fn speed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SPEED_PATTERN).expect("speed pattern compiles"))
}

/// Outcome of scanning one hashcat output dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedReading {
    Matched(Sample),
    /// No speed line, or one of its numbers did not parse.
    Unmatched,
}

/// Pull the first hash rate / latency pair out of `output`.
///
/// Every character that is not an ASCII digit or `.` is stripped from both
/// captured tokens before parsing. The unit prefix goes with it, so
/// `123.45 kH/s` reads as `123.45`, not `123450`. Callers downstream scale
/// the raw figure themselves and rely on it staying unconverted.
pub fn parse_speed(output: &str) -> SpeedReading {
    let Some(caps) = speed_regex().captures(output) else {
        return SpeedReading::Unmatched;
    };

    match (numeric(&caps[1]), numeric(&caps[2])) {
        (Some(hash_rate), Some(latency_ms)) => SpeedReading::Matched(Sample::new(hash_rate, latency_ms)),
        _ => SpeedReading::Unmatched,
    }
}

fn numeric(token: &str) -> Option<f64> {
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}
