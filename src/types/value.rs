use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value as Json;

/// Loose equality across JSON values: numbers compare across the int/float
/// divide, strings that are both RFC 3339 dates compare as instants, lists
/// compare element-wise.
#[must_use]
pub(crate) fn loose_eq(a: &Json, b: &Json) -> bool {
    match (a, b) {
        (Json::Number(_), Json::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        (Json::String(x), Json::String(y)) => {
            if x == y {
                return true;
            }
            match (parse_date(x), parse_date(y)) {
                (Some(dx), Some(dy)) => dx == dy,
                _ => false,
            }
        }
        (Json::Array(xs), Json::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loose_eq(x, y))
        }
        _ => a == b,
    }
}

/// Three-way comparison after canonicalization.
///
/// Numbers compare through f64; strings that both parse as RFC 3339 dates
/// compare as instants, other strings lexicographically. Everything else is
/// incomparable and returns `None`.
#[must_use]
pub(crate) fn compare(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => {
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            x.partial_cmp(&y)
        }
        (Json::String(x), Json::String(y)) => match (parse_date(x), parse_date(y)) {
            (Some(dx), Some(dy)) => Some(dx.cmp(&dy)),
            _ => Some(x.cmp(y)),
        },
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` matches
/// exactly one. Case-sensitive; callers lowercase both sides for `ilike`.
#[must_use]
pub(crate) fn like_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let mut pi = 0;
    let mut ti = 0;
    // Backtracking anchors for the most recent `%`.
    let mut star_pi = usize::MAX;
    let mut star_ti = 0;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '_' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '%' {
            star_pi = pi;
            star_ti = ti;
            pi += 1;
        } else if star_pi != usize::MAX {
            pi = star_pi + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '%' {
        pi += 1;
    }
    pi == p.len()
}
