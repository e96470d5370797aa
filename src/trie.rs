/*!
A prefix tree over strings of symbols.

The trie is the first automaton built during synthesis. Since it is already
deterministic and acyclic, it is handed to the DFA constructor as is, where
every trie state becomes a DFA state.
*/

use crate::{
    input::ExampleSet,
    util::{
        alphabet::Symbol,
        id::{IteratorIDExt, StateID},
    },
};

/// A trie whose edges are labeled with symbols.
///
/// The root is always state `StateID::ZERO`. A state is a match state if the
/// path from the root to it spells one of the strings that were added.
#[derive(Clone)]
pub struct Trie {
    states: Vec<State>,
}

impl Trie {
    /// Create an empty trie containing only the root state.
    pub fn new() -> Trie {
        Trie { states: vec![State::default()] }
    }

    /// Build a trie containing every example, each code point becoming a
    /// `Symbol::Char` edge.
    pub fn from_examples(examples: &ExampleSet) -> Trie {
        let mut trie = Trie::new();
        for example in examples.iter() {
            let syms: Vec<Symbol> =
                example.iter().map(|&c| Symbol::Char(c)).collect();
            trie.add(&syms);
        }
        debug!(
            "built trie with {} states from {} examples",
            trie.len(),
            examples.len(),
        );
        trie
    }

    /// Build a trie containing every string in the given language.
    pub fn from_strings<I, S>(strings: I) -> Trie
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Symbol]>,
    {
        let mut trie = Trie::new();
        for s in strings {
            trie.add(s.as_ref());
        }
        trie
    }

    /// Add the given string to this trie. Adding a string twice has no
    /// effect.
    pub fn add(&mut self, syms: &[Symbol]) {
        let mut prev = StateID::ZERO;
        for sym in syms.iter() {
            prev = match self.states[prev].next_state(sym) {
                Some(sid) => sid,
                None => {
                    let next = self.add_state();
                    self.states[prev].set_next_state(sym.clone(), next);
                    next
                }
            };
        }
        self.states[prev].is_match = true;
    }

    fn add_state(&mut self) -> StateID {
        let id = StateID::new(self.states.len());
        self.states.push(State::default());
        id
    }

    /// Return the number of states in this trie, including the root.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if this trie has no states. This is never the case, since
    /// the root always exists.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns true if the given state is the end of an added string.
    pub fn is_match_state(&self, sid: StateID) -> bool {
        self.states[sid].is_match
    }

    /// Return the outgoing transitions of the given state, in ascending
    /// symbol order.
    pub fn transitions(
        &self,
        sid: StateID,
    ) -> impl Iterator<Item = (&Symbol, StateID)> {
        self.states[sid].transitions.iter().map(|t| (&t.symbol, t.next))
    }
}

impl Default for Trie {
    fn default() -> Trie {
        Trie::new()
    }
}

impl core::fmt::Debug for Trie {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        writeln!(f, "Trie(")?;
        for (sid, state) in self.states.iter().with_state_ids() {
            writeln!(f, "{:06?}: {:?}", sid.as_usize(), state)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct State {
    // Sorted by symbol.
    transitions: Vec<Transition>,
    is_match: bool,
}

impl State {
    fn next_state(&self, sym: &Symbol) -> Option<StateID> {
        self.transitions
            .binary_search_by(|t| t.symbol.cmp(sym))
            .ok()
            .map(|i| self.transitions[i].next)
    }

    fn set_next_state(&mut self, symbol: Symbol, next: StateID) {
        let t = Transition { symbol, next };
        match self.transitions.binary_search_by(|x| x.symbol.cmp(&t.symbol)) {
            Ok(i) => self.transitions[i] = t,
            Err(i) => self.transitions.insert(i, t),
        }
    }
}

impl core::fmt::Debug for State {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.is_match {
            write!(f, "MATCH")?;
        }
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 || self.is_match {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", t)?;
        }
        Ok(())
    }
}

#[derive(Clone)]
struct Transition {
    symbol: Symbol,
    next: StateID,
}

impl core::fmt::Debug for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} => {}", self.symbol, self.next.as_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol::Char).collect()
    }

    #[test]
    fn shares_prefixes() {
        let examples = ExampleSet::new(&["zapper", "z", "zap"]).unwrap();
        let trie = Trie::from_examples(&examples);
        // root + z, a, p, p, e, r
        assert_eq!(7, trie.len());
        assert!(!trie.is_match_state(StateID::ZERO));
        assert!(trie.is_match_state(StateID::new(1)));
    }

    #[test]
    fn transitions_are_sorted() {
        let mut trie = Trie::new();
        trie.add(&chars("c"));
        trie.add(&chars("a"));
        trie.add(&chars("b"));
        let got: Vec<Symbol> =
            trie.transitions(StateID::ZERO).map(|(s, _)| s.clone()).collect();
        assert_eq!(chars("abc"), got);
    }

    #[test]
    fn empty_string_marks_root() {
        let trie = Trie::from_strings(vec![chars(""), chars("a")]);
        assert!(trie.is_match_state(StateID::ZERO));
        assert_eq!(2, trie.len());
    }

    #[test]
    fn debug_output() {
        let trie = Trie::from_strings(vec![chars("ab")]);
        let got = format!("{:?}", trie);
        assert!(got.contains("'a' => 1"));
        assert!(got.contains("MATCH"));
    }
}
