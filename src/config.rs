use core::str::FromStr;

use crate::{
    error::Error,
    util::alphabet::{Class, ClassKind},
};

/// A conversion that may be applied to a synthesized expression.
///
/// Conversions that replace literals with classes or fold case generalize
/// the expression: it then matches more than just the examples, though it
/// still matches every one of them. The remaining conversions never change
/// the set of matched strings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Conversion {
    /// Replace ASCII digits with `\d`.
    Digit,
    /// Replace non-digits with `\D`.
    NoDigit,
    /// Replace whitespace with `\s`.
    Space,
    /// Replace non-whitespace with `\S`.
    NoSpace,
    /// Replace word characters with `\w`.
    Word,
    /// Replace non-word characters with `\W`.
    NoWord,
    /// Collapse consecutive repetitions of a substring into `(?:...){n}`.
    Repetition,
    /// Match letters regardless of case, emitting a `(?i)` flag.
    CaseInsensitivity,
    /// Write groups as capturing groups `(...)` instead of `(?:...)`.
    CapturingGroup,
}

impl Conversion {
    /// Every conversion, in the order in which their names are listed.
    pub const ALL: [Conversion; 9] = [
        Conversion::Digit,
        Conversion::NoDigit,
        Conversion::Space,
        Conversion::NoSpace,
        Conversion::Word,
        Conversion::NoWord,
        Conversion::Repetition,
        Conversion::CaseInsensitivity,
        Conversion::CapturingGroup,
    ];

    /// Return the name of this conversion, e.g., `noDigit`.
    pub fn name(&self) -> &'static str {
        match *self {
            Conversion::Digit => "digit",
            Conversion::NoDigit => "noDigit",
            Conversion::Space => "space",
            Conversion::NoSpace => "noSpace",
            Conversion::Word => "word",
            Conversion::NoWord => "noWord",
            Conversion::Repetition => "repetition",
            Conversion::CaseInsensitivity => "caseInsensitivity",
            Conversion::CapturingGroup => "capturingGroup",
        }
    }

    /// If this conversion replaces literals with a class, then return that
    /// class.
    pub fn class(&self) -> Option<Class> {
        let (kind, negated) = match *self {
            Conversion::Digit => (ClassKind::Digit, false),
            Conversion::NoDigit => (ClassKind::Digit, true),
            Conversion::Space => (ClassKind::Space, false),
            Conversion::NoSpace => (ClassKind::Space, true),
            Conversion::Word => (ClassKind::Word, false),
            Conversion::NoWord => (ClassKind::Word, true),
            _ => return None,
        };
        Some(Class::new(kind, negated))
    }

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }
}

impl FromStr for Conversion {
    type Err = Error;

    fn from_str(name: &str) -> Result<Conversion, Error> {
        Conversion::ALL.iter().copied().find(|c| c.name() == name).ok_or_else(
            || {
                Error::invalid_configuration(
                    "conversionOf",
                    format!("unrecognized conversion '{}'", name),
                )
            },
        )
    }
}

impl core::fmt::Display for Conversion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of conversions.
///
/// A set has no order. Conversions are always applied in a fixed order,
/// regardless of the order in which they were requested.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Conversions(u16);

impl Conversions {
    /// The empty set.
    pub fn empty() -> Conversions {
        Conversions(0)
    }

    /// Returns true if the given conversion is in this set.
    pub fn contains(&self, conversion: Conversion) -> bool {
        self.0 & conversion.bit() != 0
    }

    /// Add a conversion to this set.
    pub fn insert(&mut self, conversion: Conversion) {
        self.0 |= conversion.bit();
    }

    /// Returns true if this set contains no conversions.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Return an iterator over the conversions in this set, in the order of
    /// `Conversion::ALL`.
    pub fn iter(&self) -> impl Iterator<Item = Conversion> + '_ {
        Conversion::ALL.iter().copied().filter(move |&c| self.contains(c))
    }

    /// Return the classes to convert literals to, from highest to lowest
    /// priority. A literal matched by more than one of them becomes the
    /// first.
    pub(crate) fn classes(&self) -> Vec<Class> {
        self.iter().filter_map(|c| c.class()).collect()
    }
}

impl core::iter::FromIterator<Conversion> for Conversions {
    fn from_iter<I: IntoIterator<Item = Conversion>>(it: I) -> Conversions {
        let mut set = Conversions::empty();
        for c in it {
            set.insert(c);
        }
        set
    }
}

impl core::fmt::Debug for Conversions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The configuration used for synthesizing a regular expression.
///
/// Every option is unset by default, in which case its default value is
/// used. Options set here override the defaults, and configurations can be
/// layered with [`Config::overwrite`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    conversions: Option<Conversions>,
    minimum_repetitions: Option<u32>,
    minimum_substring_length: Option<u32>,
    escape_non_ascii: Option<bool>,
    surrogate_pairs: Option<bool>,
    syntax_highlighting: Option<bool>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the conversions to apply. This replaces any previously set
    /// conversions.
    ///
    /// By default, no conversions are applied and the synthesized expression
    /// matches exactly the examples.
    pub fn conversions(mut self, conversions: Conversions) -> Config {
        self.conversions = Some(conversions);
        self
    }

    /// Set the conversions to apply by name, e.g., `["digit", "repetition"]`.
    ///
    /// An unrecognized name results in an error. Duplicate names are
    /// ignored.
    pub fn conversion_of<I, S>(self, names: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = names
            .into_iter()
            .map(|name| name.as_ref().parse::<Conversion>())
            .collect::<Result<Conversions, Error>>()?;
        Ok(self.conversions(set))
    }

    /// The number of times a substring must repeat beyond its first
    /// occurrence for the repetition conversion to collapse it.
    ///
    /// This defaults to `1`, which collapses any substring that occurs at
    /// least twice in a row. Zero is invalid.
    pub fn minimum_repetitions(mut self, count: u32) -> Config {
        self.minimum_repetitions = Some(count);
        self
    }

    /// The minimum length, in code points, of a substring that the
    /// repetition conversion may collapse.
    ///
    /// This defaults to `1`. Zero is invalid.
    pub fn minimum_substring_length(mut self, len: u32) -> Config {
        self.minimum_substring_length = Some(len);
        self
    }

    /// Whether to write every non-ASCII code point as a `\u{...}` escape.
    ///
    /// This is disabled by default.
    pub fn escape_non_ascii(mut self, yes: bool) -> Config {
        self.escape_non_ascii = Some(yes);
        self
    }

    /// Whether to write code points outside the basic multilingual plane as
    /// a pair of escaped UTF-16 surrogates instead of as one escape.
    ///
    /// Surrogates are only meaningful as escapes, so this has no effect
    /// unless `escape_non_ascii` is enabled too. This is disabled by default.
    pub fn surrogate_pairs(mut self, yes: bool) -> Config {
        self.surrogate_pairs = Some(yes);
        self
    }

    /// Whether to decorate the expression with ANSI color codes for display
    /// on a terminal. A decorated expression is no longer a valid pattern.
    ///
    /// This is disabled by default.
    pub fn syntax_highlighting(mut self, yes: bool) -> Config {
        self.syntax_highlighting = Some(yes);
        self
    }

    /// Returns the conversions to apply.
    pub fn get_conversions(&self) -> Conversions {
        self.conversions.unwrap_or_default()
    }

    /// Returns true if the given conversion is enabled.
    pub fn is_converted(&self, conversion: Conversion) -> bool {
        self.get_conversions().contains(conversion)
    }

    /// Returns the minimum number of additional repetitions.
    pub fn get_minimum_repetitions(&self) -> u32 {
        self.minimum_repetitions.unwrap_or(1)
    }

    /// Returns the minimum length of a repeated substring.
    pub fn get_minimum_substring_length(&self) -> u32 {
        self.minimum_substring_length.unwrap_or(1)
    }

    /// Returns whether non-ASCII code points are escaped.
    pub fn get_escape_non_ascii(&self) -> bool {
        self.escape_non_ascii.unwrap_or(false)
    }

    /// Returns whether supplementary code points are written as surrogate
    /// pairs.
    pub fn get_surrogate_pairs(&self) -> bool {
        self.surrogate_pairs.unwrap_or(false)
    }

    /// Returns whether output is decorated with ANSI color codes.
    pub fn get_syntax_highlighting(&self) -> bool {
        self.syntax_highlighting.unwrap_or(false)
    }

    /// Check that every option holds a value in its domain.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.get_minimum_repetitions() == 0 {
            return Err(Error::invalid_configuration(
                "minimumRepetitions",
                "must be at least 1",
            ));
        }
        if self.get_minimum_substring_length() == 0 {
            return Err(Error::invalid_configuration(
                "minimumSubstringLength",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            conversions: o.conversions.or(self.conversions),
            minimum_repetitions: o
                .minimum_repetitions
                .or(self.minimum_repetitions),
            minimum_substring_length: o
                .minimum_substring_length
                .or(self.minimum_substring_length),
            escape_non_ascii: o.escape_non_ascii.or(self.escape_non_ascii),
            surrogate_pairs: o.surrogate_pairs.or(self.surrogate_pairs),
            syntax_highlighting: o
                .syntax_highlighting
                .or(self.syntax_highlighting),
        }
    }
}
