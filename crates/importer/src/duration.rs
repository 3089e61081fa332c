use watchcash_core::{WatchCashError, WatchCashResult};

/// `PT1H2M3S` → `1:02:03`, `PT3M32S` → `3:32`, `PT45S` → `0:45`.
/// Days and weeks fold into hours.
pub fn format_iso8601_duration(iso: &str) -> WatchCashResult<String> {
    let total = parse_seconds(iso)?;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    Ok(if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    })
}

fn parse_seconds(iso: &str) -> WatchCashResult<u64> {
    let bad = || WatchCashError::Parse(format!("invalid ISO-8601 duration {iso:?}"));

    let rest = iso.strip_prefix('P').ok_or_else(bad)?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) if !t.is_empty() => (d, Some(t)),
        Some(_) => return Err(bad()),
        None => (rest, None),
    };
    if date_part.is_empty() && time_part.is_none() {
        return Err(bad());
    }

    let mut total = 0u64;
    for (value, unit) in components(date_part).ok_or_else(bad)? {
        let scale = match unit {
            'W' => 7 * 86_400,
            'D' => 86_400,
            _ => return Err(bad()),
        };
        total = accumulate(total, value, scale).ok_or_else(bad)?;
    }
    if let Some(time) = time_part {
        for (value, unit) in components(time).ok_or_else(bad)? {
            let scale = match unit {
                'H' => 3600,
                'M' => 60,
                'S' => 1,
                _ => return Err(bad()),
            };
            total = accumulate(total, value, scale).ok_or_else(bad)?;
        }
    }
    Ok(total)
}

/// `None` on overflow.
fn accumulate(total: u64, value: u64, scale: u64) -> Option<u64> {
    value.checked_mul(scale)?.checked_add(total)
}

/// `1H2M` → `[(1, 'H'), (2, 'M')]`.
fn components(s: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }
    digits.is_empty().then_some(out)
}
