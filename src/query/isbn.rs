//! ISBN validation and normalization for search queries.

/// Attempts to interpret a search query as a single ISBN.
///
/// Accepts `ISBN:`/`ISBN-10:`/`ISBN-13:` prefixes and hyphen- or
/// space-separated groups. Returns the normalized digit string (10 or 13
/// characters) when the checksum holds, `None` otherwise.
///
/// # Examples
///
/// ```
/// use foliocite_core::query::parse_isbn;
///
/// assert_eq!(
///     parse_isbn("978-0-14-032872-1").as_deref(),
///     Some("9780140328721")
/// );
/// assert_eq!(parse_isbn("978-0-14-032872-2"), None); // bad check digit
/// ```
#[must_use]
pub fn parse_isbn(input: &str) -> Option<String> {
    let normalized = normalize_isbn(input)?;

    let valid = match normalized.len() {
        10 => is_valid_isbn10(&normalized),
        13 => is_valid_isbn13(&normalized),
        _ => false,
    };

    valid.then_some(normalized)
}

/// Strips ISBN prefixes and separators, uppercasing a final `x` check digit.
/// Returns `None` when any remaining character is not a digit (or final X).
fn normalize_isbn(input: &str) -> Option<String> {
    let mut rest = input.trim();

    for prefix in &["ISBN-13:", "ISBN-10:", "ISBN:", "ISBN"] {
        let head = rest.get(..prefix.len());
        if head.is_some_and(|h| h.eq_ignore_ascii_case(prefix)) {
            rest = rest[prefix.len()..].trim_start();
            break;
        }
    }

    let mut normalized = String::with_capacity(13);
    for c in rest.chars() {
        match c {
            '0'..='9' => normalized.push(c),
            'x' | 'X' => normalized.push('X'),
            '-' | ' ' => {}
            _ => return None,
        }
    }

    // X is only legal as the final ISBN-10 check digit
    if normalized.is_empty()
        || normalized[..normalized.len() - 1].contains('X')
        || (normalized.ends_with('X') && normalized.len() != 10)
    {
        return None;
    }

    Some(normalized)
}

/// ISBN-10 checksum: sum of digit * (10 - position) must be 0 mod 11,
/// with `X` standing for 10 in the check position.
fn is_valid_isbn10(digits: &str) -> bool {
    let mut sum: u32 = 0;
    for (i, c) in digits.chars().enumerate() {
        let value = match c {
            '0'..='9' => u32::from(c as u8 - b'0'),
            'X' => 10,
            _ => return false,
        };
        sum += value * (10 - u32::try_from(i).unwrap_or(10));
    }
    sum % 11 == 0
}

/// ISBN-13 checksum: digits weighted alternately 1 and 3 must sum to 0 mod 10.
fn is_valid_isbn13(digits: &str) -> bool {
    let mut sum: u32 = 0;
    for (i, c) in digits.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return false;
        };
        sum += value * if i % 2 == 0 { 1 } else { 3 };
    }
    sum % 10 == 0
}
