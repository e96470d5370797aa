/// An error that occurred while synthesizing a regular expression.
///
/// The details of an error are private. Its `Display` impl gives a message
/// naming the offending input or option, and the `is_*` methods report
/// which category it falls in.
///
/// Every `char` can be written out under every escaping mode, so once the
/// examples and options are accepted, synthesis cannot fail.
///
/// Synthesis is deterministic, so an error reproduces on every invocation with
/// the same examples and configuration. Callers wanting a different outcome
/// must change one of the two.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

/// Every way synthesis can fail. Private, so variants may be added freely.
#[derive(Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    /// No example strings remained after normalization.
    EmptyInput,
    /// A configuration option was given a value outside of its domain, such
    /// as a minimum repetition count of zero.
    InvalidConfiguration {
        /// The name of the option, as it is spelled by callers.
        option: &'static str,
        /// A description of why the value is rejected.
        reason: String,
    },
}

impl Error {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn empty_input() -> Error {
        Error { kind: ErrorKind::EmptyInput }
    }

    pub(crate) fn invalid_configuration(
        option: &'static str,
        reason: impl Into<String>,
    ) -> Error {
        let reason = reason.into();
        Error { kind: ErrorKind::InvalidConfiguration { option, reason } }
    }

    /// Returns true if this error was caused by an empty set of examples.
    pub fn is_empty_input(&self) -> bool {
        matches!(*self.kind(), ErrorKind::EmptyInput)
    }

    /// Returns true if this error was caused by an out-of-range
    /// configuration value.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(*self.kind(), ErrorKind::InvalidConfiguration { .. })
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            ErrorKind::EmptyInput => {
                write!(f, "no example strings were given to synthesize from")
            }
            ErrorKind::InvalidConfiguration { option, ref reason } => {
                write!(f, "invalid value for option '{}': {}", option, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert!(Error::empty_input().is_empty_input());
        assert!(Error::invalid_configuration("minimumRepetitions", "zero")
            .is_invalid_configuration());
        assert!(!Error::empty_input().is_invalid_configuration());
    }

    #[test]
    fn messages() {
        let err = Error::invalid_configuration(
            "minimumSubstringLength",
            "must be greater than zero",
        );
        assert_eq!(
            "invalid value for option 'minimumSubstringLength': \
             must be greater than zero",
            err.to_string(),
        );
        let err = Error::empty_input();
        assert_eq!(
            "no example strings were given to synthesize from",
            err.to_string(),
        );
    }
}
