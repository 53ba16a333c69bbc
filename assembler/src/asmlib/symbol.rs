use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};

/// The name of a label, variable or predefined symbol.  Symbol names
/// are case-sensitive.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolName {
    pub(crate) canonical: String,
}

impl SymbolName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.canonical.as_str()
    }

    /// Returns true if the name could be introduced by a program (as
    /// a label or variable); such names consist only of letters.
    #[must_use]
    pub fn is_user_definable(name: &str) -> bool {
        !name.is_empty() && name.chars().all(char::is_alphabetic)
    }
}

impl From<String> for SymbolName {
    fn from(s: String) -> SymbolName {
        SymbolName { canonical: s }
    }
}

impl From<&str> for SymbolName {
    fn from(s: &str) -> SymbolName {
        SymbolName::from(s.to_string())
    }
}

impl Borrow<str> for SymbolName {
    fn borrow(&self) -> &str {
        self.canonical.as_str()
    }
}

impl Display for SymbolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.canonical, f)
    }
}

impl Debug for SymbolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolName {{ canonical: \"{}\" }}", self.canonical)
    }
}

#[test]
fn user_definable_names() {
    assert!(SymbolName::is_user_definable("LOOP"));
    assert!(SymbolName::is_user_definable("counter"));
    assert!(!SymbolName::is_user_definable("R0"));
    assert!(!SymbolName::is_user_definable("OUTPUT_D"));
    assert!(!SymbolName::is_user_definable("-3"));
    assert!(!SymbolName::is_user_definable(""));
}
