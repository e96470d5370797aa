use regex_synth::{build_regex, Builder, Config};
use synth_test::{SynthTest, Synthesized, TestRunner};

use crate::{suite, Result};

/// Runs the test suite through the convenience routine.
#[test]
fn build_regex_default() -> Result<()> {
    TestRunner::new()?.test_iter(suite()?.iter(), synthesizer).assert();
    Ok(())
}

/// Runs the test suite through a builder configured in two layers. The
/// first layer only sets default values, so every test must behave as if
/// configured once.
#[test]
fn builder_layered() -> Result<()> {
    let layered = |test: &SynthTest| -> Result<Synthesized> {
        let mut builder = Builder::new();
        builder.configure(
            Config::new()
                .minimum_repetitions(1)
                .minimum_substring_length(1)
                .escape_non_ascii(false),
        );
        builder.configure(config(test)?);
        let regex = builder.build(test.examples())?;
        synthesized(test, regex)
    };
    TestRunner::new()?.test_iter(suite()?.iter(), layered).assert();
    Ok(())
}

fn synthesizer(test: &SynthTest) -> Result<Synthesized> {
    let regex = build_regex(test.examples(), &config(test)?)?;
    synthesized(test, regex)
}

/// Translate the options of a test into a configuration.
///
/// Boolean options are only set when a test enables them, so that a
/// configuration layered on top of another one leaves the lower layer's
/// value in place.
fn config(test: &SynthTest) -> Result<Config> {
    let mut config = Config::new().conversion_of(test.conversions())?;
    if let Some(n) = test.minimum_repetitions() {
        config = config.minimum_repetitions(n);
    }
    if let Some(n) = test.minimum_substring_length() {
        config = config.minimum_substring_length(n);
    }
    if test.escape_non_ascii() {
        config = config.escape_non_ascii(true);
    }
    if test.surrogate_pairs() {
        config = config.surrogate_pairs(true);
    }
    if test.syntax_highlighting() {
        config = config.syntax_highlighting(true);
    }
    Ok(config)
}

/// Attach a matcher to the regex, unless it isn't a valid pattern for the
/// regex crate: highlighted output contains escape codes and surrogate
/// halves are not code points.
fn synthesized(test: &SynthTest, regex: String) -> Result<Synthesized> {
    if test.syntax_highlighting() || test.surrogate_pairs() {
        return Ok(Synthesized::new(regex));
    }
    let re = regex::Regex::new(&regex)?;
    Ok(Synthesized::with_matcher(regex, move |haystack| re.is_match(haystack)))
}
