/*!
A deterministic finite automaton over [`Symbol`]s.

The DFA built here is always acyclic and recognizes a finite language: it is
constructed from a [`Trie`] and then minimized. States live in an arena and
refer to each other by [`StateID`], so the states merged by minimization can
be shared by many predecessors without any ownership cycles.

State `DEAD` (identifier zero) is reserved. It is never a match state and a
missing transition is equivalent to a transition to it.
*/

use std::collections::VecDeque;

use crate::{
    trie::Trie,
    util::{
        alphabet::Symbol,
        id::{IteratorIDExt, StateID},
    },
};

mod minimize;

pub(crate) use self::minimize::Minimizer;

/// The identifier of the dead state in every DFA.
pub const DEAD: StateID = StateID::ZERO;

/// A deterministic finite automaton whose language is a finite set of symbol
/// strings.
#[derive(Clone, Eq, PartialEq)]
pub struct DFA {
    states: Vec<State>,
    start: StateID,
}

impl DFA {
    /// Build a DFA recognizing exactly the strings in the given trie.
    ///
    /// Every trie state becomes a DFA state, so this takes time linear in the
    /// size of the trie. The result is generally not minimal.
    pub fn from_trie(trie: &Trie) -> DFA {
        let mut states = Vec::with_capacity(trie.len() + 1);
        states.push(State::default());
        for i in 0..trie.len() {
            let tsid = StateID::new(i);
            let transitions = trie
                .transitions(tsid)
                .map(|(sym, next)| {
                    (sym.clone(), StateID::new(next.as_usize() + 1))
                })
                .collect();
            states.push(State {
                transitions,
                is_match: trie.is_match_state(tsid),
            });
        }
        let dfa = DFA { states, start: StateID::new(1) };
        debug!("built DFA with {} states from trie", dfa.state_len());
        dfa
    }

    pub(crate) fn from_parts(states: Vec<State>, start: StateID) -> DFA {
        DFA { states, start }
    }

    /// Minimize this DFA in place.
    ///
    /// The result is the unique minimal DFA recognizing the same language,
    /// with states numbered in breadth first order from the start state.
    /// Two DFAs recognizing the same language are therefore equal after
    /// minimization, and minimizing twice is the same as minimizing once.
    pub fn minimize(&mut self) {
        let _before = self.state_len();
        Minimizer::new(self).run();
        debug!(
            "minimized DFA from {} to {} states",
            _before,
            self.state_len(),
        );
    }

    /// Return the start state of this DFA.
    pub fn start(&self) -> StateID {
        self.start
    }

    /// Return the total number of states in this DFA, including the dead
    /// state.
    pub fn state_len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if and only if the given state is a match state.
    pub fn is_match_state(&self, sid: StateID) -> bool {
        self.states[sid].is_match
    }

    /// Return the state reached from `sid` on the given symbol. If there is
    /// no such transition, then `DEAD` is returned.
    pub fn next_state(&self, sid: StateID, sym: &Symbol) -> StateID {
        self.states[sid].next_state(sym)
    }

    /// Return the outgoing transitions of a state in ascending symbol order.
    /// Transitions to the dead state are never included.
    pub fn transitions(
        &self,
        sid: StateID,
    ) -> impl Iterator<Item = (&Symbol, StateID)> {
        self.states[sid].transitions.iter().map(|&(ref sym, next)| (sym, next))
    }

    /// Return an iterator over every state identifier in this DFA, starting
    /// with the dead state.
    pub fn states(&self) -> impl Iterator<Item = StateID> {
        (0..self.states.len()).map(StateID::new)
    }

    /// Returns true if this DFA accepts the given string of symbols.
    pub fn accepts(&self, syms: &[Symbol]) -> bool {
        let mut sid = self.start;
        for sym in syms.iter() {
            sid = self.next_state(sid, sym);
            if sid == DEAD {
                return false;
            }
        }
        self.is_match_state(sid)
    }

    /// Return every distinct symbol used by a transition, in ascending order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        let mut syms: Vec<Symbol> = self
            .states
            .iter()
            .flat_map(|s| s.transitions.iter().map(|&(ref sym, _)| sym.clone()))
            .collect();
        syms.sort();
        syms.dedup();
        syms
    }

    /// Renumber the states reachable from the start state in breadth first
    /// order, visiting transitions in ascending symbol order. Unreachable
    /// states are dropped. The dead state keeps identifier zero.
    pub(crate) fn canonicalize(&mut self) {
        let mut remap = vec![None; self.states.len()];
        remap[DEAD] = Some(DEAD);
        let mut order = vec![];
        let mut queue = VecDeque::new();
        remap[self.start] = Some(StateID::new(1));
        order.push(self.start);
        queue.push_back(self.start);
        while let Some(sid) = queue.pop_front() {
            for &(_, next) in self.states[sid].transitions.iter() {
                if remap[next].is_none() {
                    remap[next] = Some(StateID::new(order.len() + 1));
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }

        let mut states = Vec::with_capacity(order.len() + 1);
        states.push(State::default());
        for &old in order.iter() {
            let state = &self.states[old];
            let transitions = state
                .transitions
                .iter()
                .filter_map(|&(ref sym, next)| {
                    remap[next].map(|new| (sym.clone(), new))
                })
                .collect();
            states.push(State { transitions, is_match: state.is_match });
        }
        self.states = states;
        self.start = StateID::new(1);
    }
}

impl core::fmt::Debug for DFA {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "DFA(")?;
        for (sid, state) in self.states.iter().with_state_ids() {
            let marker = if sid == DEAD {
                'D'
            } else if sid == self.start {
                '>'
            } else {
                ' '
            };
            let accept = if state.is_match { '*' } else { ' ' };
            write!(f, "{}{}{:06?}:", marker, accept, sid.as_usize())?;
            for (i, &(ref sym, next)) in state.transitions.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{}{} => {}", sep, sym, next.as_usize())?;
            }
            writeln!(f)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// A single DFA state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct State {
    // Sorted by symbol and never containing a transition to DEAD.
    pub(crate) transitions: Vec<(Symbol, StateID)>,
    pub(crate) is_match: bool,
}

impl State {
    fn next_state(&self, sym: &Symbol) -> StateID {
        match self.transitions.binary_search_by(|&(ref s, _)| s.cmp(sym)) {
            Ok(i) => self.transitions[i].1,
            Err(_) => DEAD,
        }
    }
}
