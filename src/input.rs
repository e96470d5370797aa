/*!
Normalization of the example strings given by a caller.
*/

use std::collections::HashSet;

use crate::error::Error;

/// A deduplicated, non-empty set of example strings, each decoded into its
/// sequence of code points.
///
/// The examples are kept in the order in which they were first seen. That
/// order has no influence on the synthesized expression (alternatives are
/// ordered by code point later on), but it makes diagnostics easier to read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExampleSet {
    examples: Vec<Vec<char>>,
}

impl ExampleSet {
    /// Normalize the given strings into an example set.
    ///
    /// Duplicates are removed, keeping the first occurrence. The empty string
    /// is a valid example. If no strings are given at all, then an error is
    /// returned.
    pub fn new<I, S>(strings: I) -> Result<ExampleSet, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut examples = vec![];
        for s in strings {
            let chars: Vec<char> = s.as_ref().chars().collect();
            if seen.insert(chars.clone()) {
                examples.push(chars);
            }
        }
        if examples.is_empty() {
            return Err(Error::empty_input());
        }
        debug!("normalized {} distinct examples", examples.len());
        Ok(ExampleSet { examples })
    }

    /// Return the number of distinct examples. This is never zero.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Always returns false, since an example set is never empty. This
    /// exists to pair with `len`.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Return an iterator over the code points of each example, in the order
    /// in which the examples were first given.
    pub fn iter(&self) -> impl Iterator<Item = &[char]> {
        self.examples.iter().map(|e| e.as_slice())
    }

    /// Return the length, in code points, of the longest example.
    pub fn max_len(&self) -> usize {
        self.examples.iter().map(|e| e.len()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let set = ExampleSet::new(&["b", "a", "b", "", "a"]).unwrap();
        let got: Vec<String> =
            set.iter().map(|e| e.iter().collect()).collect();
        assert_eq!(vec!["b", "a", ""], got);
        assert_eq!(3, set.len());
    }

    #[test]
    fn decodes_code_points() {
        let set = ExampleSet::new(vec!["💩é".to_string()]).unwrap();
        assert_eq!(vec![&['💩', 'é'][..]], set.iter().collect::<Vec<_>>());
        assert_eq!(2, set.max_len());
    }

    #[test]
    fn empty_is_an_error() {
        let err = ExampleSet::new(Vec::<String>::new()).unwrap_err();
        assert!(err.is_empty_input());
    }

    #[test]
    fn only_empty_string_is_fine() {
        let set = ExampleSet::new(&[""]).unwrap();
        assert_eq!(1, set.len());
        assert_eq!(0, set.max_len());
    }
}
