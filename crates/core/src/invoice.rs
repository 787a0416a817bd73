use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

fn separator_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[-\s]+").expect("invalid regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Winning number must be exactly 3 digits, got '{0}'")]
pub struct InputFormatError(pub String);

/// The three trailing digits drawn for the current period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WinningDigits(String);

impl WinningDigits {
    /// Accepts exactly three ASCII digits. Only a trailing line terminator
    /// is ignored; any other whitespace is rejected.
    pub fn parse(input: &str) -> Result<Self, InputFormatError> {
        let trimmed = input.trim_end_matches(['\r', '\n']);
        if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(WinningDigits(trimmed.to_string()))
        } else {
            Err(InputFormatError(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WinningDigits {
    type Err = InputFormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WinningDigits {
    type Error = InputFormatError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WinningDigits> for String {
    fn from(d: WinningDigits) -> Self {
        d.0
    }
}

impl fmt::Display for WinningDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate invoice number with every space/hyphen separator removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    pub fn normalize(raw: &str) -> Self {
        InvoiceNumber(separator_re().replace_all(raw, "").into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last three characters, or the whole number when it is shorter.
    pub fn suffix(&self) -> &str {
        match self.0.char_indices().rev().nth(2) {
            Some((idx, _)) => &self.0[idx..],
            None => &self.0,
        }
    }

    pub fn wins(&self, digits: &WinningDigits) -> bool {
        self.suffix() == digits.as_str()
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub number: InvoiceNumber,
    pub is_winner: bool,
}

impl MatchResult {
    pub fn evaluate(number: InvoiceNumber, digits: &WinningDigits) -> Self {
        let is_winner = number.wins(digits);
        Self { number, is_winner }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_winner { "[WINNER]" } else { "[no win]" };
        write!(f, "{} {label}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> WinningDigits {
        WinningDigits::parse(s).unwrap()
    }

    #[test]
    fn winning_digits_accepts_three_ascii_digits() {
        assert_eq!(digits("678").as_str(), "678");
        assert_eq!(digits("007\n").as_str(), "007");
        assert_eq!(digits("007\r\n").as_str(), "007");
    }

    #[test]
    fn winning_digits_rejects_bad_input() {
        for bad in ["", "12", "1234", "12a", "abc", "1 2", "١٢٣", " 678", "678 ", "\t678"] {
            let err = WinningDigits::parse(bad).unwrap_err();
            assert_eq!(err.0, bad);
        }
    }

    #[test]
    fn winning_digits_from_str() {
        let d: WinningDigits = "999".parse().unwrap();
        assert_eq!(d.to_string(), "999");
        assert!("99".parse::<WinningDigits>().is_err());
    }

    #[test]
    fn normalize_without_separators_is_unchanged() {
        let n = InvoiceNumber::normalize("AB12345678");
        assert_eq!(n.as_str(), "AB12345678");
        assert_eq!(n.suffix(), "678");
    }

    #[test]
    fn normalize_strips_every_separator_run() {
        let n = InvoiceNumber::normalize("AB - 12 345678");
        assert_eq!(n.as_str(), "AB12345678");
        let n = InvoiceNumber::normalize("XY\n--\t12345678");
        assert_eq!(n.as_str(), "XY12345678");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = InvoiceNumber::normalize("QR- -87654321");
        let twice = InvoiceNumber::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn verdict_compares_trailing_three_characters() {
        let n = InvoiceNumber::normalize("XY-12345678");
        assert!(n.wins(&digits("678")));
        assert!(!n.wins(&digits("999")));
        assert!(!n.wins(&digits("567")));
    }

    #[test]
    fn short_number_compares_whole_string() {
        let n = InvoiceNumber::normalize("78");
        assert_eq!(n.suffix(), "78");
        assert!(!n.wins(&digits("078")));
    }

    #[test]
    fn match_result_display_labels() {
        let win = MatchResult::evaluate(InvoiceNumber::normalize("XY12345678"), &digits("678"));
        let lose = MatchResult::evaluate(InvoiceNumber::normalize("XY12345678"), &digits("999"));
        assert!(win.is_winner);
        assert!(!lose.is_winner);
        assert_eq!(win.to_string(), "XY12345678 [WINNER]");
        assert_eq!(lose.to_string(), "XY12345678 [no win]");
    }
}
