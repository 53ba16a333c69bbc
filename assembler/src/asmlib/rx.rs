//! The regular expressions used to pick source lines apart.  They
//! are compiled on first use.
use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;

/// Runs of whitespace, which are deleted wherever they occur.
pub(crate) static WHITESPACE: Pattern = Pattern::new("whitespace", r"\s+");

/// The operand of an address instruction written as a decimal number.
pub(crate) static NUMERAL: Pattern = Pattern::new("decimal numeral", r"^[0-9]+$");

pub(crate) struct Pattern {
    what: &'static str,
    source: &'static str,
    compiled: OnceLock<Regex>,
}

impl Pattern {
    const fn new(what: &'static str, source: &'static str) -> Pattern {
        Pattern {
            what,
            source,
            compiled: OnceLock::new(),
        }
    }
}

impl Deref for Pattern {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        self.compiled
            .get_or_init(|| match Regex::new(self.source) {
                Ok(r) => r,
                Err(e) => panic!(
                    "the built-in {} pattern '{}' does not compile: {e}",
                    self.what, self.source
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numerals() {
        assert!(NUMERAL.is_match("0"));
        assert!(NUMERAL.is_match("32767"));
        assert!(NUMERAL.is_match("007"));
        assert!(!NUMERAL.is_match(""));
        assert!(!NUMERAL.is_match("-3"));
        assert!(!NUMERAL.is_match("1x"));
        assert!(!NUMERAL.is_match("x1"));
    }

    #[test]
    fn whitespace() {
        assert_eq!(WHITESPACE.replace_all(" D = M\t;\r JGT ", ""), "D=M;JGT");
        assert!(!WHITESPACE.is_match("AMD=D|M"));
    }
}
