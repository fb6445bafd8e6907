use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("malformed token '{0}'")]
    Malformed(String),
}

/// Advance `pos` until `pred` matches or the range is exhausted.
pub fn advance_until<F>(chars: &[char], mut pos: usize, pred: F) -> usize
where
    F: Fn(char) -> bool,
{
    while pos < chars.len() && !pred(chars[pos]) {
        pos += 1;
    }
    pos
}

/// Walk backward from `pos` (one past the last scanned character) while
/// `pred` fails, returning one past the first match. An empty range
/// returns `start`.
pub fn recede_until<F>(chars: &[char], mut pos: usize, start: usize, pred: F) -> usize
where
    F: Fn(char) -> bool,
{
    while pos > start {
        if pred(chars[pos - 1]) {
            return pos;
        }
        pos -= 1;
    }
    start
}

/// Extract the token between the cursor and the first character matching
/// `pred`, trimming surrounding spaces, and parse it into `out`.
///
/// Returns the position of the delimiter that ended the scan. An empty
/// trimmed span leaves `out` untouched so the caller's default survives;
/// a span that fails to parse is a hard error carrying the raw text.
pub fn read_token<T, F>(chars: &[char], pos: usize, pred: F, out: &mut T) -> Result<usize, ScanError>
where
    T: FromStr,
    F: Fn(char) -> bool,
{
    let token_start = advance_until(chars, pos, |c| c != ' ');
    let token_end_after_spaces = advance_until(chars, token_start, &pred);
    if token_start != token_end_after_spaces {
        let token_end = recede_until(chars, token_end_after_spaces, token_start, |c| c != ' ');
        let text: String = chars[token_start..token_end].iter().collect();
        match text.parse() {
            Ok(value) => *out = value,
            Err(_) => return Err(ScanError::Malformed(text)),
        }
    }
    Ok(token_end_after_spaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn advance_stops_at_first_match() {
        let input = chars("abc#def");
        assert_eq!(advance_until(&input, 0, |c| c == '#'), 3);
    }

    #[test]
    fn advance_without_match_reaches_end() {
        let input = chars("abcdef");
        assert_eq!(advance_until(&input, 2, |c| c == '#'), input.len());
    }

    #[test]
    fn recede_trims_trailing_spaces() {
        let input = chars("abc   ");
        assert_eq!(recede_until(&input, input.len(), 0, |c| c != ' '), 3);
    }

    #[test]
    fn recede_on_empty_range_returns_start() {
        let input = chars("abc");
        assert_eq!(recede_until(&input, 2, 2, |c| c != ' '), 2);
    }

    #[test]
    fn read_token_trims_and_parses_string() {
        let input = chars("  Fire Drake  #3");
        let mut token = String::new();
        let pos = read_token(&input, 0, |c| c == '#', &mut token).unwrap();
        assert_eq!(token, "Fire Drake");
        assert_eq!(input[pos], '#');
    }

    #[test]
    fn read_token_parses_number() {
        let input = chars(" 42 ;");
        let mut value: u32 = 0;
        read_token(&input, 0, |c| c == ';', &mut value).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn read_token_empty_span_keeps_default() {
        let input = chars("   #rest");
        let mut value: u32 = 7;
        let pos = read_token(&input, 0, |c| c == '#', &mut value).unwrap();
        assert_eq!(value, 7);
        assert_eq!(input[pos], '#');
    }

    #[test]
    fn read_token_reports_malformed_number() {
        let input = chars("12x4;");
        let mut value: u32 = 0;
        let err = read_token(&input, 0, |c| c == ';', &mut value).unwrap_err();
        assert!(matches!(err, ScanError::Malformed(text) if text == "12x4"));
    }
}
