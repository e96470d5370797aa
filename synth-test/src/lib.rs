use std::borrow::Borrow;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const ENV_SYNTH_TEST: &str = "SYNTH_TEST";
const ENV_SYNTH_TEST_VERBOSE: &str = "SYNTH_TEST_VERBOSE";

/// A collection of synthesis tests.
#[derive(Clone, Debug, Deserialize)]
pub struct SynthTests {
    tests: Vec<SynthTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// A synthesis test describes a set of examples, the options to synthesize
/// them with and the expected outcome.
///
/// The expected outcome is either an exact regex, a failure to synthesize,
/// or, when only the behavior of the regex matters, a list of strings that
/// it must or must not match.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    examples: Vec<String>,
    #[serde(default)]
    conversions: Vec<String>,
    minimum_repetitions: Option<u32>,
    minimum_substring_length: Option<u32>,
    #[serde(default)]
    escape_non_ascii: bool,
    #[serde(default)]
    surrogate_pairs: bool,
    #[serde(default)]
    syntax_highlighting: bool,
    regex: Option<String>,
    #[serde(default = "default_true")]
    synthesizes: bool,
    #[serde(default)]
    matches: Vec<String>,
    #[serde(default)]
    rejects: Vec<String>,
}

impl SynthTests {
    /// Create a new empty collection of synthesis tests.
    pub fn new() -> SynthTests {
        SynthTests { tests: vec![], seen: HashSet::new() }
    }

    /// Reads a TOML file of tests, grouping them under the file's stem, so
    /// that `data/repetition.toml` yields tests named `repetition/...`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let group = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(group) => group,
            None => bail!("no usable file stem in {}", path.display()),
        };
        self.load_slice(group, &data)
            .with_context(|| format!("in test file {}", path.display()))
    }

    /// Decodes TOML tests from `data` and adds them under `group`.
    ///
    /// Tests without a name are numbered from 1 in file order. Loading fails
    /// if a test is malformed or its full name was already loaded.
    pub fn load_slice(&mut self, group: &str, data: &[u8]) -> Result<()> {
        let decoded: SynthTests =
            toml::from_slice(data).context("malformed TOML")?;
        let mut unnamed = 0;
        for mut t in decoded.tests {
            if t.name.is_empty() {
                unnamed += 1;
                t.name = unnamed.to_string();
            }
            t.group = group.to_string();
            t.full_name = [group, t.name.as_str()].join("/");
            t.validate()
                .with_context(|| format!("in test '{}'", t.full_name))?;
            if !self.seen.insert(t.full_name.clone()) {
                bail!("test name '{}' is used twice", t.full_name);
            }
            self.tests.push(t);
        }
        Ok(())
    }

    /// Iterates over the loaded tests, in loading order.
    pub fn iter(&self) -> std::slice::Iter<'_, SynthTest> {
        self.tests.iter()
    }
}

impl Default for SynthTests {
    fn default() -> SynthTests {
        SynthTests::new()
    }
}

impl SynthTest {
    fn validate(&self) -> Result<()> {
        if self.synthesizes {
            if self.regex.is_none() && self.matches.is_empty() {
                bail!(
                    "a test that synthesizes must specify either 'regex' \
                     or 'matches'"
                );
            }
        } else if self.regex.is_some()
            || !self.matches.is_empty()
            || !self.rejects.is_empty()
        {
            bail!(
                "a test that does not synthesize cannot specify 'regex', \
                 'matches' or 'rejects'"
            );
        }
        Ok(())
    }

    /// Return the group name of this test, usually the file stem.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Return the name of this test within its group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the full name of this test, `group/name`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Return the example strings to synthesize from.
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Return the names of the conversions to enable.
    pub fn conversions(&self) -> &[String] {
        &self.conversions
    }

    /// Return the minimum repetition count, if one is set.
    pub fn minimum_repetitions(&self) -> Option<u32> {
        self.minimum_repetitions
    }

    /// Return the minimum repeated substring length, if one is set.
    pub fn minimum_substring_length(&self) -> Option<u32> {
        self.minimum_substring_length
    }

    /// Whether non-ASCII code points should be escaped.
    pub fn escape_non_ascii(&self) -> bool {
        self.escape_non_ascii
    }

    /// Whether supplementary code points should be written as surrogate
    /// pairs.
    pub fn surrogate_pairs(&self) -> bool {
        self.surrogate_pairs
    }

    /// Whether output should be decorated with ANSI color codes.
    pub fn syntax_highlighting(&self) -> bool {
        self.syntax_highlighting
    }

    /// Return the exact regex expected, if this test specifies one.
    pub fn regex(&self) -> Option<&str> {
        self.regex.as_deref()
    }

    /// Whether synthesis is expected to succeed.
    pub fn synthesizes(&self) -> bool {
        self.synthesizes
    }

    /// Return the strings the regex must match in addition to the examples.
    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    /// Return the strings the regex must not match.
    pub fn rejects(&self) -> &[String] {
        &self.rejects
    }
}

/// The outcome of synthesizing a regex for a test.
///
/// Besides the regex text, this may carry a matcher for checking the regex
/// against the test's examples and its `matches` and `rejects` lists.
/// Without a matcher, only the text of the regex is checked.
pub struct Synthesized {
    regex: String,
    matcher: Option<Box<dyn Fn(&str) -> bool>>,
}

impl Synthesized {
    /// A synthesized regex that is only compared by its text.
    pub fn new(regex: String) -> Synthesized {
        Synthesized { regex, matcher: None }
    }

    /// A synthesized regex along with a function reporting whether it
    /// matches a haystack.
    pub fn with_matcher<F: Fn(&str) -> bool + 'static>(
        regex: String,
        matcher: F,
    ) -> Synthesized {
        Synthesized { regex, matcher: Some(Box::new(matcher)) }
    }
}

impl std::fmt::Debug for Synthesized {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Synthesized")
            .field("regex", &self.regex)
            .field("matcher", &self.matcher.as_ref().map(|_| "..."))
            .finish()
    }
}

/// Runs synthesis tests from inside a `#[test]` function.
///
/// Feed it tests with `test_iter` and finish with `assert`, which panics with
/// a report of every failure. Failures are collected rather than raised, so
/// one broken test does not hide the others.
///
/// ### Filtering
///
/// `SYNTH_TEST` holds comma separated substrings of full test names. A plain
/// substring selects tests, and one prefixed with `-` deselects them. When
/// any selecting substring is present, tests matching none of them are
/// skipped. For a test matching several substrings, the rightmost one
/// decides.
#[derive(Debug)]
pub struct TestRunner {
    include: Vec<IncludePattern>,
    results: SynthTestResults,
}

#[derive(Debug)]
struct IncludePattern {
    blacklist: bool,
    substring: String,
}

impl TestRunner {
    /// Creates a runner filtered by `SYNTH_TEST`, which must be valid UTF-8
    /// if set.
    pub fn new() -> Result<TestRunner> {
        let mut runner =
            TestRunner { include: vec![], results: SynthTestResults::new() };
        for substring in read_env(ENV_SYNTH_TEST)?.split(',') {
            let substring = substring.trim();
            if substring.is_empty() {
                continue;
            }
            if let Some(rest) = substring.strip_prefix('-') {
                runner.blacklist(rest);
            } else {
                runner.whitelist(substring);
            }
        }
        Ok(runner)
    }

    /// Panics with a report if any test run so far failed.
    ///
    /// Setting `SYNTH_TEST_VERBOSE=1` additionally lists every test by
    /// outcome.
    pub fn assert(&mut self) {
        self.results.assert();
    }

    /// Selects tests whose full name contains `substring`.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        self.filter(substring, false)
    }

    /// Deselects tests whose full name contains `substring`. Later calls to
    /// `whitelist` can select them again.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        self.filter(substring, true)
    }

    fn filter(&mut self, substring: &str, blacklist: bool) -> &mut TestRunner {
        let substring = substring.to_string();
        self.include.push(IncludePattern { blacklist, substring });
        self
    }

    /// Runs every test not filtered out, recording skips.
    pub fn test_iter<I, T>(
        &mut self,
        it: I,
        mut synthesize: impl FnMut(
            &SynthTest,
        )
            -> Result<Synthesized, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<SynthTest>,
    {
        for test in it {
            let test = test.borrow();
            if self.should_skip(test) {
                self.results.skip(test);
                continue;
            }
            self.test(test, |t| synthesize(t));
        }
        self
    }

    /// Runs one test and records its outcome for `assert`.
    pub fn test(
        &mut self,
        test: &SynthTest,
        mut synthesize: impl FnMut(
            &SynthTest,
        )
            -> Result<Synthesized, Box<dyn std::error::Error>>,
    ) -> &mut TestRunner {
        let synthesized = match safe(|| synthesize(test)) {
            Err(msg) => {
                self.results.fail(test, FailureKind::UnexpectedPanic(msg));
                return self;
            }
            Ok(Err(err)) => {
                if test.synthesizes() {
                    self.results.fail(test, FailureKind::SynthError { err });
                } else {
                    self.results.pass(test);
                }
                return self;
            }
            Ok(Ok(synthesized)) => synthesized,
        };
        if !test.synthesizes() {
            self.results.fail(
                test,
                FailureKind::NoSynthError { got: synthesized.regex },
            );
            return self;
        }
        if let Some(expected) = test.regex() {
            if expected != synthesized.regex {
                self.results.fail(
                    test,
                    FailureKind::Regex { got: synthesized.regex },
                );
                return self;
            }
        }
        if let Some(ref is_match) = synthesized.matcher {
            let must_match =
                test.examples().iter().chain(test.matches().iter());
            for haystack in must_match {
                match safe(|| is_match(haystack.as_str())) {
                    Ok(true) => {}
                    Ok(false) => {
                        self.results.fail(
                            test,
                            FailureKind::NoMatch {
                                regex: synthesized.regex.clone(),
                                haystack: haystack.clone(),
                            },
                        );
                        return self;
                    }
                    Err(msg) => {
                        self.results
                            .fail(test, FailureKind::UnexpectedPanic(msg));
                        return self;
                    }
                }
            }
            for haystack in test.rejects() {
                match safe(|| is_match(haystack.as_str())) {
                    Ok(false) => {}
                    Ok(true) => {
                        self.results.fail(
                            test,
                            FailureKind::Match {
                                regex: synthesized.regex.clone(),
                                haystack: haystack.clone(),
                            },
                        );
                        return self;
                    }
                    Err(msg) => {
                        self.results
                            .fail(test, FailureKind::UnexpectedPanic(msg));
                        return self;
                    }
                }
            }
        }
        self.results.pass(test);
        self
    }

    fn should_skip(&self, test: &SynthTest) -> bool {
        let name = test.full_name();
        match self.include.iter().rev().find(|p| name.contains(&p.substring)) {
            Some(pat) => pat.blacklist,
            // Unmatched tests run only when nothing was selected explicitly.
            None => self.include.iter().any(|p| !p.blacklist),
        }
    }
}

/// Names of passed and skipped tests, and the failures in full.
#[derive(Debug)]
struct SynthTestResults {
    pass: Vec<String>,
    fail: Vec<SynthTestFailure>,
    skip: Vec<String>,
}

#[derive(Debug)]
struct SynthTestFailure {
    test: SynthTest,
    kind: FailureKind,
}

/// Why a test failed.
#[derive(Debug)]
enum FailureKind {
    /// The synthesized regex differs from the one the test expects.
    Regex { got: String },
    /// The test expected synthesis to fail, but it succeeded.
    NoSynthError { got: String },
    /// The test expected synthesis to succeed, but it failed.
    SynthError { err: Box<dyn std::error::Error> },
    /// The regex does not match a string it must match.
    NoMatch { regex: String, haystack: String },
    /// The regex matches a string it must not match.
    Match { regex: String, haystack: String },
    /// A panic occurred. If possible, the panic message is captured.
    UnexpectedPanic(String),
}

impl SynthTestResults {
    fn new() -> SynthTestResults {
        SynthTestResults { pass: vec![], fail: vec![], skip: vec![] }
    }

    fn pass(&mut self, test: &SynthTest) {
        self.pass.push(test.full_name().to_string());
    }

    fn fail(&mut self, test: &SynthTest, kind: FailureKind) {
        self.fail.push(SynthTestFailure { test: test.clone(), kind });
    }

    fn skip(&mut self, test: &SynthTest) {
        self.skip.push(test.full_name().to_string());
    }

    fn assert(&self) {
        if read_env(ENV_SYNTH_TEST_VERBOSE).map_or(false, |s| s == "1") {
            self.verbose();
        }
        if self.fail.is_empty() {
            return;
        }
        let failures = self
            .fail
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<String>>()
            .join("\n\n");
        let rule = "~".repeat(79);
        panic!(
            "{} synthesis tests failed:\n{}\n{}\n{}\n\n\
             Set the SYNTH_TEST environment variable to filter tests, \n\
             e.g., SYNTH_TEST=foo,-foo2 runs every test whose name contains \n\
             foo but not foo2\n\n",
            self.fail.len(),
            rule,
            failures.trim(),
            rule,
        )
    }

    fn verbose(&self) {
        let rule = "~".repeat(79);
        println!("{}", rule);
        for name in &self.skip {
            println!("skip: {}", name);
        }
        for name in &self.pass {
            println!("pass: {}", name);
        }
        for failure in &self.fail {
            println!("fail: {}", failure.test.full_name());
        }
        println!(
            "\n{} passed, {} skipped, {} failed",
            self.pass.len(),
            self.skip.len(),
            self.fail.len()
        );
        println!("{}", rule);
    }
}

impl std::fmt::Display for SynthTestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let t = &self.test;
        writeln!(f, "{}: {}", t.full_name(), self.kind)?;
        writeln!(f, "    examples: {:?}", t.examples())?;
        if !t.conversions().is_empty() {
            writeln!(f, "    conversions: {:?}", t.conversions())?;
        }
        if let Some(expected) = t.regex() {
            writeln!(f, "    expected regex: {:?}", expected)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            FailureKind::Regex { ref got } => {
                write!(f, "synthesized unexpected regex {:?}", got)
            }
            FailureKind::NoSynthError { ref got } => write!(
                f,
                "expected synthesis to fail, but it produced {:?}",
                got
            ),
            FailureKind::SynthError { ref err } => {
                write!(f, "expected synthesis to succeed, but got: {}", err)
            }
            FailureKind::NoMatch { ref regex, ref haystack } => write!(
                f,
                "regex {:?} does not match {:?}, but it should",
                regex, haystack
            ),
            FailureKind::Match { ref regex, ref haystack } => write!(
                f,
                "regex {:?} matches {:?}, but it should not",
                regex, haystack
            ),
            FailureKind::UnexpectedPanic(ref msg) => {
                write!(f, "unexpected panic: {}", msg)
            }
        }
    }
}

/// Returns the value of `var`, or an empty string when it is unset.
fn read_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(val) => Ok(val),
        Err(std::env::VarError::NotPresent) => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("reading ${}", var)),
    }
}

/// Runs `fun`, turning a panic into its message.
fn safe<T, F>(fun: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    use std::panic;

    panic::catch_unwind(panic::AssertUnwindSafe(fun)).map_err(|payload| {
        // Panic payloads are a &str or a String in practice.
        match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast_ref::<&str>() {
                Some(msg) => msg.to_string(),
                None => "<panic payload is not a string>".to_string(),
            },
        }
    })
}

// Used by serde for fields that default to true.
fn default_true() -> bool {
    true
}
