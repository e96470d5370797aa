use quickcheck::{quickcheck, TestResult};
use regex::Regex;
use regex_synth::{build_regex, Config};

/// The alphabet that exactness properties are checked over. It mixes
/// letters of both cases, a digit, a space and a meta character so that
/// every conversion has something to act on.
const ALPHABET: &[char] = &['a', 'b', 'B', '1', ' ', '.'];

/// Maps arbitrary strings onto `ALPHABET`, keeping them short so that every
/// string up to the same length can be enumerated.
fn small(strings: &[String]) -> Vec<String> {
    strings
        .iter()
        .take(10)
        .map(|s| {
            s.chars()
                .take(4)
                .map(|c| ALPHABET[c as usize % ALPHABET.len()])
                .collect()
        })
        .collect()
}

/// Every string over `ALPHABET` of at most `len` code points.
fn all_strings(len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..len {
        let mut next = vec![];
        for s in frontier.iter() {
            for &c in ALPHABET.iter() {
                let mut t = s.clone();
                t.push(c);
                next.push(t);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

/// Returns true if the regex synthesized from `examples` under `config`
/// matches exactly the examples among all short strings.
fn exact(examples: &[String], config: &Config) -> bool {
    let pattern = build_regex(examples, config).unwrap();
    let re = Regex::new(&pattern).unwrap();
    all_strings(5)
        .iter()
        .all(|s| re.is_match(s) == examples.contains(s))
}

quickcheck! {
    fn prop_matches_exactly_the_examples(strings: Vec<String>) -> TestResult {
        let examples = small(&strings);
        if examples.is_empty() {
            return TestResult::discard();
        }
        TestResult::from_bool(exact(&examples, &Config::new()))
    }

    fn prop_repetition_preserves_language(strings: Vec<String>) -> TestResult {
        let examples = small(&strings);
        if examples.is_empty() {
            return TestResult::discard();
        }
        let config = Config::new().conversion_of(&["repetition"]).unwrap();
        TestResult::from_bool(exact(&examples, &config))
    }

    fn prop_capturing_groups_preserve_language(
        strings: Vec<String>
    ) -> TestResult {
        let examples = small(&strings);
        if examples.is_empty() {
            return TestResult::discard();
        }
        let config = Config::new()
            .conversion_of(&["capturingGroup", "repetition"])
            .unwrap()
            .minimum_substring_length(2);
        TestResult::from_bool(exact(&examples, &config))
    }

    fn prop_example_order_is_irrelevant(strings: Vec<String>) -> TestResult {
        if strings.is_empty() {
            return TestResult::discard();
        }
        let config = Config::new()
            .conversion_of(&["word", "repetition", "caseInsensitivity"])
            .unwrap();
        let mut reversed = strings.clone();
        reversed.reverse();
        let a = build_regex(&strings, &config).unwrap();
        let b = build_regex(&reversed, &config).unwrap();
        TestResult::from_bool(a == b)
    }

    fn prop_conversions_still_match_examples(
        strings: Vec<String>,
        mask: u16
    ) -> TestResult {
        if strings.is_empty() {
            return TestResult::discard();
        }
        let names = [
            "digit", "noDigit", "space", "noSpace", "word", "noWord",
            "repetition", "caseInsensitivity", "capturingGroup",
        ];
        let enabled: Vec<&str> = names
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, &name)| name)
            .collect();
        let config = Config::new()
            .conversion_of(&enabled)
            .unwrap()
            .escape_non_ascii(mask & (1 << 9) != 0);
        let pattern = build_regex(&strings, &config).unwrap();
        let re = Regex::new(&pattern).unwrap();
        TestResult::from_bool(strings.iter().all(|s| re.is_match(s)))
    }
}
