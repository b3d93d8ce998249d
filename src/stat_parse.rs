/// Parses a stat cell into a decimal.
///
/// Blank and placeholder cells ("", "-", "NA", "N/A", "none") are absent, not
/// zero. A trailing `%` always divides by 100. With `is_percentage`, a bare
/// number beyond ±1.0 is read as a percentage too ("48" means 0.48).
pub fn parse_stat(raw: &str, is_percentage: bool) -> Option<f64> {
    let s = raw.trim();
    if is_placeholder(s) {
        return None;
    }

    if let Some(num) = s.strip_suffix('%') {
        let value = parse_number(num)?;
        return Some(value / 100.0);
    }

    let value = parse_number(s)?;
    if is_percentage && value.abs() > 1.0 {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

fn is_placeholder(s: &str) -> bool {
    s.is_empty()
        || s == "-"
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("n/a")
        || s.eq_ignore_ascii_case("none")
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::warn!("could not parse stat value '{raw}'");
            None
        }
    }
}
