use crate::{
    config::Config,
    dfa::DFA,
    error::Error,
    format::Formatter,
    input::ExampleSet,
    passes::{self, Converted},
    synth,
    trie::Trie,
};

/// A builder for synthesizing a regular expression from example strings.
///
/// Synthesis runs the following stages, in order:
///
/// 1. The examples are deduplicated and decoded into code points.
/// 2. A trie of the examples is built and converted into a DFA.
/// 3. The DFA is minimized.
/// 4. The minimal DFA is converted into an expression by state elimination.
///    This expression matches exactly the examples.
/// 5. The configured conversions are applied.
/// 6. The expression is written out with anchors at both ends.
///
/// Every stage is deterministic, so building twice from the same examples
/// and configuration yields the same expression, and the order of the
/// examples does not matter.
///
/// # Example
///
/// ```
/// use regex_synth::{Builder, Config};
///
/// let re = Builder::new()
///     .configure(Config::new().conversion_of(&["digit", "word"])?)
///     .build(&["a", "b", "123", "XYZ", "456"])?;
/// assert_eq!(r"^(?:\d\d\d|\w(?:\w\w)?)$", re);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Apply the given configuration. Options set in `config` override the
    /// ones previously set on this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Synthesize a regular expression from the given examples.
    ///
    /// This returns an error if no examples are given or if the
    /// configuration holds an invalid value.
    pub fn build<I, S>(&self, examples: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let converted = self.build_ast(examples)?;
        let regex = Formatter::new(&self.config)
            .format(&converted.ast, converted.case_insensitive);
        debug!("synthesized {:?}", regex);
        Ok(regex)
    }

    /// Synthesize an expression from the given examples without writing it
    /// out.
    ///
    /// This runs every stage of [`Builder::build`] except the last one.
    pub fn build_ast<I, S>(&self, examples: I) -> Result<Converted, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.validate()?;
        let examples = ExampleSet::new(examples)?;
        let mut dfa = DFA::from_trie(&Trie::from_examples(&examples));
        dfa.minimize();
        let ast = synth::synthesize(&dfa);
        Ok(passes::apply(ast, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(examples: &[&str], config: Config) -> Result<String, Error> {
        Builder::new().configure(config).build(examples)
    }

    #[test]
    fn oibits() {
        fn assert_oibits<T: Send + Sync + Clone>() {}
        assert_oibits::<Builder>();
        assert_oibits::<Config>();
        assert_oibits::<Error>();
    }

    #[test]
    fn configure_layers() {
        let mut builder = Builder::new();
        builder.configure(Config::new().escape_non_ascii(true));
        builder.configure(Config::new().conversion_of(&["digit"]).unwrap());
        assert_eq!(r"^\d\u{e9}$", builder.build(&["1é"]).unwrap());
    }

    #[test]
    fn validation_precedes_input_checks() {
        let config = Config::new().minimum_repetitions(0);
        let err = build(&[], config).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn empty_input() {
        let err = build(&[], Config::new()).unwrap_err();
        assert!(err.is_empty_input());
    }

    #[test]
    fn ast_keeps_case_flag() {
        let config = Config::new().conversion_of(&["caseInsensitivity"]).unwrap();
        let converted =
            Builder::new().configure(config).build_ast(&["A", "a"]).unwrap();
        assert!(converted.case_insensitive);
        assert_eq!(crate::ast::Ast::Literal('a'), converted.ast);
    }
}
