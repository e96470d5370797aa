use std::collections::BTreeMap;

use crate::{
    dfa::{State, DEAD, DFA},
    util::{alphabet::Symbol, id::StateID},
};

/// An implementation of Hopcroft's algorithm for minimizing DFAs.
///
/// The DFAs minimized here are partial: a missing transition goes to the
/// dead state, which is excluded from refinement entirely. Hopcroft's trick
/// of only queueing the smaller half of a split block remains sound for
/// partial DFAs as long as every initial block starts out in the waiting
/// list, which is what we do.
///
/// Once refinement reaches a fixed point, the DFA is rebuilt with one state
/// per block and then canonicalized, so that the output does not depend on
/// the order in which blocks happened to be split.
#[derive(Debug)]
pub(crate) struct Minimizer<'a> {
    dfa: &'a mut DFA,
    // For every state, its incoming transitions as (symbol index,
    // predecessor), sorted.
    in_transitions: Vec<Vec<(usize, StateID)>>,
    partitions: Vec<StateSet>,
    // The block containing each state. The dead state maps to no block.
    block_of: Vec<usize>,
    waiting: Vec<usize>,
    in_waiting: Vec<bool>,
}

/// A sorted set of state identifiers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct StateSet(Vec<StateID>);

impl<'a> Minimizer<'a> {
    pub(crate) fn new(dfa: &'a mut DFA) -> Minimizer<'a> {
        let alphabet = dfa.alphabet();
        let in_transitions = Minimizer::incoming_transitions(dfa, &alphabet);
        let partitions = Minimizer::initial_partitions(dfa);
        let mut block_of = vec![usize::MAX; dfa.state_len()];
        for (i, p) in partitions.iter().enumerate() {
            for &sid in p.iter() {
                block_of[sid.as_usize()] = i;
            }
        }
        let waiting: Vec<usize> = (0..partitions.len()).collect();
        let in_waiting = vec![true; partitions.len()];
        Minimizer {
            dfa,
            in_transitions,
            partitions,
            block_of,
            waiting,
            in_waiting,
        }
    }

    pub(crate) fn run(mut self) {
        while let Some(splitter) = self.waiting.pop() {
            self.in_waiting[splitter] = false;
            let incoming = self.find_incoming_to(splitter);
            for (_sym, preds) in incoming {
                trace!("splitting on block {} via symbol #{}", splitter, _sym);
                self.split(&preds);
            }
        }
        trace!(
            "refinement reached a fixed point with {} blocks",
            self.partitions.len()
        );

        // Rebuild the DFA with one state per block. The block's first
        // member stands in for all of them, which is fine since all members
        // have equivalent transitions.
        let mut states = Vec::with_capacity(self.partitions.len() + 1);
        states.push(State::default());
        for p in self.partitions.iter() {
            let rep = &self.dfa.states[p.first()];
            let transitions = rep
                .transitions
                .iter()
                .map(|&(ref sym, next)| {
                    let block = self.block_of[next.as_usize()];
                    (sym.clone(), StateID::new(block + 1))
                })
                .collect();
            states.push(State { transitions, is_match: rep.is_match });
        }
        let start = StateID::new(self.block_of[self.dfa.start.as_usize()] + 1);
        *self.dfa = DFA::from_parts(states, start);
        self.dfa.canonicalize();
    }

    /// Split every block that is only partially contained in `preds`.
    fn split(&mut self, preds: &StateSet) {
        let mut touched: BTreeMap<usize, StateSet> = BTreeMap::new();
        for &sid in preds.iter() {
            touched
                .entry(self.block_of[sid.as_usize()])
                .or_insert_with(StateSet::empty)
                .add(sid);
        }
        for (block, x) in touched {
            if x.len() == self.partitions[block].len() {
                continue;
            }
            let y = self.partitions[block].subtract(&x);
            debug_assert!(!y.is_empty());
            debug_assert_eq!(x, self.partitions[block].intersection(preds));

            let new_block = self.partitions.len();
            for &sid in y.iter() {
                self.block_of[sid.as_usize()] = new_block;
            }
            let (xlen, ylen) = (x.len(), y.len());
            self.partitions[block] = x;
            self.partitions.push(y);
            self.in_waiting.push(false);
            if self.in_waiting[block] {
                self.push_waiting(new_block);
            } else if xlen <= ylen {
                self.push_waiting(block);
            } else {
                self.push_waiting(new_block);
            }
        }
    }

    fn push_waiting(&mut self, block: usize) {
        if !self.in_waiting[block] {
            self.in_waiting[block] = true;
            self.waiting.push(block);
        }
    }

    /// Return, for each symbol, the set of states with a transition on that
    /// symbol into the given block.
    fn find_incoming_to(&self, block: usize) -> BTreeMap<usize, StateSet> {
        let mut incoming: BTreeMap<usize, StateSet> = BTreeMap::new();
        for &sid in self.partitions[block].iter() {
            for &(sym, pred) in self.in_transitions[sid.as_usize()].iter() {
                incoming.entry(sym).or_insert_with(StateSet::empty).add(pred);
            }
        }
        for set in incoming.values_mut() {
            set.canonicalize();
        }
        incoming
    }

    fn initial_partitions(dfa: &DFA) -> Vec<StateSet> {
        let mut is_match = StateSet::empty();
        let mut no_match = StateSet::empty();
        for sid in dfa.states() {
            if sid == DEAD {
                continue;
            }
            if dfa.is_match_state(sid) {
                is_match.add(sid);
            } else {
                no_match.add(sid);
            }
        }
        assert!(!is_match.is_empty(), "must have at least one matching state");

        let mut sets = vec![is_match];
        if !no_match.is_empty() {
            sets.push(no_match);
        }
        sets.sort_by_key(|s| s.len());
        sets
    }

    fn incoming_transitions(
        dfa: &DFA,
        alphabet: &[Symbol],
    ) -> Vec<Vec<(usize, StateID)>> {
        let mut incoming = vec![vec![]; dfa.state_len()];
        for sid in dfa.states() {
            for (sym, next) in dfa.transitions(sid) {
                // OK because the alphabet contains every transition symbol.
                let i = alphabet.binary_search(sym).unwrap();
                incoming[next.as_usize()].push((i, sid));
            }
        }
        for list in incoming.iter_mut() {
            list.sort();
        }
        incoming
    }
}

impl StateSet {
    fn empty() -> StateSet {
        StateSet(vec![])
    }

    fn add(&mut self, id: StateID) {
        self.0.push(id);
    }

    fn first(&self) -> StateID {
        self.0[0]
    }

    fn canonicalize(&mut self) {
        self.0.sort();
        self.0.dedup();
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> core::slice::Iter<'_, StateID> {
        self.0.iter()
    }

    /// Both sets must be sorted.
    fn intersection(&self, other: &StateSet) -> StateSet {
        let mut result = StateSet::empty();
        let (mut ita, mut itb) = (self.iter().peekable(), other.iter().peekable());
        while let (Some(&&a), Some(&&b)) = (ita.peek(), itb.peek()) {
            if a == b {
                result.add(a);
                ita.next();
                itb.next();
            } else if a < b {
                ita.next();
            } else {
                itb.next();
            }
        }
        result
    }

    /// Both sets must be sorted.
    fn subtract(&self, other: &StateSet) -> StateSet {
        let mut result = StateSet::empty();
        let mut itb = other.iter().peekable();
        for &a in self.iter() {
            while itb.peek().map_or(false, |&&b| b < a) {
                itb.next();
            }
            if itb.peek().map_or(true, |&&b| b != a) {
                result.add(a);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use crate::{input::ExampleSet, trie::Trie};

    use super::*;

    fn minimal(examples: &[&str]) -> DFA {
        let set = ExampleSet::new(examples).unwrap();
        let mut dfa = DFA::from_trie(&Trie::from_examples(&set));
        dfa.minimize();
        dfa
    }

    fn chars(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol::Char).collect()
    }

    #[test]
    fn chain_is_already_minimal() {
        // dead + one state per length 0..=3
        let dfa = minimal(&["a", "aa", "aaa"]);
        assert_eq!(5, dfa.state_len());
    }

    #[test]
    fn shared_suffixes_merge() {
        // dead, start, {after a or b}, final
        let dfa = minimal(&["ac", "bc"]);
        assert_eq!(4, dfa.state_len());
        let s = dfa.start();
        assert_eq!(
            dfa.next_state(s, &Symbol::Char('a')),
            dfa.next_state(s, &Symbol::Char('b')),
        );
    }

    #[test]
    fn partial_transitions_are_distinguished() {
        // The states after 'x' and 'y' are both non-accepting, but only one
        // of them continues on 'b'.
        let dfa = minimal(&["xa", "xb", "ya"]);
        let s = dfa.start();
        let x = dfa.next_state(s, &Symbol::Char('x'));
        let y = dfa.next_state(s, &Symbol::Char('y'));
        assert_ne!(x, y);
        assert!(dfa.accepts(&chars("xb")));
        assert!(!dfa.accepts(&chars("yb")));
    }

    #[test]
    fn all_final_states_merge() {
        let dfa = minimal(&["aa", "bcbc", "defdefdef"]);
        let finals: Vec<StateID> =
            dfa.states().filter(|&s| dfa.is_match_state(s)).collect();
        assert_eq!(1, finals.len());
    }

    #[test]
    fn set_operations() {
        let a = StateSet((1..6).map(StateID::new).collect());
        let b = StateSet(vec![StateID::new(2), StateID::new(4), StateID::new(9)]);
        assert_eq!(
            StateSet(vec![StateID::new(2), StateID::new(4)]),
            a.intersection(&b),
        );
        assert_eq!(
            StateSet(vec![StateID::new(1), StateID::new(3), StateID::new(5)]),
            a.subtract(&b),
        );
    }

    /// Maps arbitrary strings onto a two letter alphabet so that generated
    /// examples actually share prefixes and suffixes.
    fn small(strings: &[String]) -> Vec<String> {
        strings
            .iter()
            .map(|s| {
                s.chars()
                    .take(6)
                    .map(|c| if u32::from(c) % 2 == 0 { 'a' } else { 'b' })
                    .collect()
            })
            .collect()
    }

    quickcheck! {
        fn prop_minimize_is_idempotent(strings: Vec<String>) -> bool {
            let strings = small(&strings);
            if strings.is_empty() {
                return true;
            }
            let refs: Vec<&str> = strings.iter().map(|s| s.as_str()).collect();
            let once = minimal(&refs);
            let mut twice = once.clone();
            twice.minimize();
            once == twice
        }

        fn prop_minimize_preserves_language(strings: Vec<String>) -> bool {
            let strings = small(&strings);
            if strings.is_empty() {
                return true;
            }
            let refs: Vec<&str> = strings.iter().map(|s| s.as_str()).collect();
            let dfa = minimal(&refs);
            // Every string over {a, b} up to length 7.
            let mut all = vec![String::new()];
            let mut frontier = vec![String::new()];
            for _ in 0..7 {
                let mut next = vec![];
                for s in frontier.iter() {
                    for c in ['a', 'b'].iter() {
                        let mut t = s.clone();
                        t.push(*c);
                        next.push(t);
                    }
                }
                all.extend(next.iter().cloned());
                frontier = next;
            }
            all.iter().all(|s| {
                dfa.accepts(&chars(s)) == strings.contains(s)
            })
        }

        fn prop_minimize_ignores_input_order(strings: Vec<String>) -> bool {
            let strings = small(&strings);
            if strings.is_empty() {
                return true;
            }
            let refs: Vec<&str> = strings.iter().map(|s| s.as_str()).collect();
            let mut reversed = refs.clone();
            reversed.reverse();
            minimal(&refs) == minimal(&reversed)
        }
    }
}
