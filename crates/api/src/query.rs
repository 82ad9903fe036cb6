/// Number of questions served when the caller does not ask for a specific amount.
pub const DEFAULT_COUNT: usize = 5;

/// Looks up the first value of `key` in a URL query string. Both `+` and percent escapes are
/// decoded. A key without `=` yields an empty value; undecodable values count as absent.
pub fn param(query: &str, key: &str) -> Option<String> {
    for chunk in query.split('&') {
        let (name, value) = chunk.split_once('=').unwrap_or((chunk, ""));
        if name != key {
            continue;
        }

        let value = value.replace('+', " ");
        return urlencoding::decode(&value).ok().map(|decoded| decoded.into_owned());
    }

    None
}

/// A trimmed, non-empty parameter.
pub fn required(query: &str, key: &str) -> Option<String> {
    let value = param(query, key)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Reads the integer at the start of `text`: leading whitespace, an optional sign, then as many
/// ASCII digits as follow. Trailing garbage is ignored and overflow saturates.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .bytes()
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add(i64::from(digit - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

/// The requested number of questions. Values without a leading number, and zero, fall back to
/// [`DEFAULT_COUNT`]; the result is clamped into `1..=max`.
pub fn count(query: &str, max: usize) -> usize {
    let requested = param(query, "n")
        .as_deref()
        .and_then(leading_integer)
        .filter(|&n| n != 0)
        .unwrap_or(DEFAULT_COUNT as i64);
    let max = i64::try_from(max).unwrap_or(i64::MAX);
    // Clamped into `1..=max`, which always fits
    requested.clamp(1, max) as usize
}
