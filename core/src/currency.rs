use crate::*;

/// Converts between whole currency amounts and their on-screen text.
pub trait CurrencyFormat {
    fn format(&self, amount: u64) -> String;

    fn parse(&self, text: &str) -> Result<u64>;
}

/// `$1,234` style amounts, with `$2k` shorthand accepted when parsing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dollars;

impl CurrencyFormat for Dollars {
    fn format(&self, amount: u64) -> String {
        let digits = amount.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(digit);
        }
        out
    }

    fn parse(&self, text: &str) -> Result<u64> {
        let malformed = || GameError::MalformedAmount(text.into());
        let body = text.trim();
        let body = body.strip_prefix('$').unwrap_or(body).trim();
        let body: String = body.chars().filter(|&c| c != ',').collect();

        match body.strip_suffix('k') {
            Some(thousands) => parse_thousands(thousands.trim()).ok_or_else(malformed),
            None => parse_digits(&body).ok_or_else(malformed),
        }
    }
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// `N` or `N.fff` times one thousand, exact for up to three decimals.
fn parse_thousands(s: &str) -> Option<u64> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    if fraction.len() > 3 || (whole.is_empty() && fraction.is_empty()) {
        return None;
    }
    let whole = if whole.is_empty() { 0 } else { parse_digits(whole)? };
    let fraction = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<3}");
        parse_digits(&padded)?
    };
    whole.checked_mul(1000)?.checked_add(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(Dollars.format(0), "$0");
        assert_eq!(Dollars.format(150), "$150");
        assert_eq!(Dollars.format(2000), "$2,000");
        assert_eq!(Dollars.format(1_234_567), "$1,234,567");
    }

    #[test]
    fn parses_plain_and_thousand_suffixed_amounts() {
        assert_eq!(Dollars.parse("$2k"), Ok(2000));
        assert_eq!(Dollars.parse("$150"), Ok(150));
        assert_eq!(Dollars.parse(" $1.5k "), Ok(1500));
        assert_eq!(Dollars.parse("$2,000"), Ok(2000));
        assert_eq!(Dollars.parse("40"), Ok(40));
    }

    #[test]
    fn parse_inverts_format() {
        for amount in [0, 5, 999, 1000, 150_000, 9_876_543] {
            assert_eq!(Dollars.parse(&Dollars.format(amount)), Ok(amount));
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "$", "$k", "abc", "$-5", "$1.2345k", "$1.5", "$2m"] {
            assert_eq!(
                Dollars.parse(text),
                Err(GameError::MalformedAmount(text.into())),
                "{text:?}"
            );
        }
    }
}
