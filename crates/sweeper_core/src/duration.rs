/// Parses a human-readable duration into total milliseconds.
///
/// Accepts `H:MM:SS`, `MM:SS`, or a bare integer-seconds token. Anything
/// else, including strings with more than two `:` separators, yields `None`.
/// Absence of a parseable value is a first-class result here, distinct from
/// a zero duration.
pub fn parse_duration_ms(text: Option<&str>) -> Option<u64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    let mut fields = Vec::with_capacity(3);
    for part in text.split(':') {
        fields.push(part.trim().parse::<u64>().ok()?);
    }

    let seconds = match fields[..] {
        [s] => s,
        [m, s] => m.checked_mul(60)?.checked_add(s)?,
        [h, m, s] => h
            .checked_mul(3600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(s)?,
        // `H:MM:SS:FF` and longer are rejected outright, never truncated.
        _ => return None,
    };
    seconds.checked_mul(1000)
}
