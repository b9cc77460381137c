//! Compiled text patterns shared by the rule set.
//!
//! The `regex` crate has no look-around, so a pattern is a conjunction of
//! regexes that must all match.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Named conjunction of regular expressions.
pub struct Pattern {
    name: &'static str,
    all_of: Vec<Regex>,
}

impl Pattern {
    /// Compile a pattern from regex sources; every source must match.
    ///
    /// # Errors
    /// Returns the first [`regex::Error`] raised while compiling.
    pub fn new(name: &'static str, sources: &[&str]) -> Result<Self, regex::Error> {
        let all_of = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, all_of })
    }

    fn compile_static(name: &'static str, sources: &[&str]) -> Self {
        Self::new(name, sources)
            .unwrap_or_else(|error| panic!("{name} pattern must compile: {error}"))
    }

    /// Stable identifier used in logs and equality.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `text` satisfies every regex of the pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.all_of.iter().all(|regex| regex.is_match(text))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.name).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Pattern {}

/// `local@domain` addresses: at most 254 characters, a local part of at most
/// 64 characters and dot-separated domain labels.
pub fn email() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Pattern::compile_static(
            "email",
            &[
                r"^.{1,254}$",
                r"^[^@]{1,64}@",
                concat!(
                    r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*",
                    r"@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
                    r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
                ),
            ],
        )
    })
}

/// At least eight characters with a lowercase letter, an uppercase letter
/// and a digit.
pub fn password_strength() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Pattern::compile_static("password_strength", &[r"[a-z]", r"[A-Z]", r"[0-9]", r"^.{8,}$"])
    })
}

/// Côte d'Ivoire numbers: `+225`, an optional space, then 8 to 10 digits.
pub fn ivorian_phone() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::compile_static("ivorian_phone", &[r"^\+225\s?[0-9]{8,10}$"]))
}

/// Absolute `http` or `https` links.
pub fn http_url() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::compile_static("http_url", &[r"^https?://.+$"]))
}
