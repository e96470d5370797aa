/*!
Conversion of a minimal DFA into a regular expression by state elimination.

The DFA is first turned into a generalized automaton whose edges are labeled
with expressions instead of symbols. Two extra nodes are added: an initial
node with an empty edge to the DFA's start state, and a final node with an
empty edge from every match state. States are then removed one at a time.
Removing a state `q` replaces every path `p -> q -> r` with a direct edge
`p -> r` labeled with the concatenation of the two labels, unioned with
whatever edge `p -> r` already had. Once every DFA state is gone, the label
of the edge from the initial node to the final node is the expression.

Since the DFA is acyclic, no state ever has a self loop and no Kleene star
is ever needed. States are removed in the post-order of a depth first search
from the start state, so a state is always removed after all of its
successors. That order is what factors common prefixes out of alternations:
by the time a state is removed, everything after it has already collapsed
into a single edge per predecessor.
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    ast::Ast,
    dfa::{DEAD, DFA},
    trie::Trie,
    util::{alphabet::Symbol, id::StateID},
};

/// Synthesize an expression matching exactly the language of the given DFA.
///
/// The DFA should be minimal, since the shape of the expression follows the
/// shape of the automaton. Synthesizing from a non-minimal DFA still yields
/// a correct expression, just a longer one.
pub fn synthesize(dfa: &DFA) -> Ast {
    let mut gnfa = Gnfa::new(dfa);
    let order = elimination_order(dfa);
    for &sid in order.iter() {
        gnfa.eliminate(sid.as_usize());
    }
    let (initial, final_) = (gnfa.initial, gnfa.final_);
    let ast = gnfa.take(initial, final_);
    debug!("eliminated {} states", order.len());
    ast
}

/// Build the minimal DFA for a language and synthesize an expression from
/// it.
///
/// This is how conversion passes that change the alphabet rebuild an
/// expression: the language of the old expression is rewritten symbol by
/// symbol and then synthesized from scratch, so that strings which have
/// become indistinguishable share structure again.
pub fn synthesize_language<I, S>(strings: I) -> Ast
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Symbol]>,
{
    let mut dfa = DFA::from_trie(&Trie::from_strings(strings));
    dfa.minimize();
    synthesize(&dfa)
}

/// A generalized NFA whose nodes are the DFA's states plus an initial and a
/// final node, and whose edges are labeled with expressions. There is at
/// most one edge between any ordered pair of nodes.
#[derive(Debug)]
struct Gnfa {
    // Keyed by destination node, in ascending order.
    outgoing: Vec<BTreeMap<usize, Ast>>,
    incoming: Vec<BTreeSet<usize>>,
    initial: usize,
    final_: usize,
}

impl Gnfa {
    fn new(dfa: &DFA) -> Gnfa {
        let n = dfa.state_len();
        let (initial, final_) = (n, n + 1);
        let mut gnfa = Gnfa {
            outgoing: vec![BTreeMap::new(); n + 2],
            incoming: vec![BTreeSet::new(); n + 2],
            initial,
            final_,
        };
        for sid in dfa.states() {
            if sid == DEAD {
                continue;
            }
            for (sym, next) in dfa.transitions(sid) {
                gnfa.add(sid.as_usize(), next.as_usize(), Ast::from_symbol(sym));
            }
            if dfa.is_match_state(sid) {
                gnfa.add(sid.as_usize(), final_, Ast::empty());
            }
        }
        gnfa.add(initial, dfa.start().as_usize(), Ast::empty());
        gnfa
    }

    /// Add an edge, unioning it with any existing edge between the same
    /// pair of nodes.
    fn add(&mut self, from: usize, to: usize, label: Ast) {
        let label = match self.outgoing[from].remove(&to) {
            None => label,
            Some(existing) => existing.union(label),
        };
        self.outgoing[from].insert(to, label);
        self.incoming[to].insert(from);
    }

    /// Remove and return the label of the edge between two nodes. If there
    /// is no such edge, then the empty expression is returned.
    fn take(&mut self, from: usize, to: usize) -> Ast {
        self.incoming[to].remove(&from);
        self.outgoing[from].remove(&to).unwrap_or_else(Ast::empty)
    }

    fn eliminate(&mut self, q: usize) {
        debug_assert!(!self.outgoing[q].contains_key(&q), "DFA has a cycle");
        let mut succs: Vec<(usize, Ast)> =
            core::mem::take(&mut self.outgoing[q]).into_iter().collect();
        for &(r, _) in succs.iter() {
            self.incoming[r].remove(&q);
        }
        let preds: Vec<usize> =
            core::mem::take(&mut self.incoming[q]).into_iter().collect();
        for (i, &p) in preds.iter().enumerate() {
            let head = match self.outgoing[p].remove(&q) {
                None => continue,
                Some(head) => head,
            };
            // The last predecessor takes the labels instead of copying them,
            // which keeps eliminating a long chain of states linear.
            let tails = if i + 1 == preds.len() {
                core::mem::take(&mut succs)
            } else {
                succs.clone()
            };
            let mut head = Some(head);
            let n = tails.len();
            for (j, (r, tail)) in tails.into_iter().enumerate() {
                let h = if j + 1 == n { head.take() } else { head.clone() };
                self.add(p, r, h.unwrap_or_else(Ast::empty).concat(tail));
            }
        }
        trace!("eliminated state {}", q);
    }
}

/// Return every state reachable from the start state such that each state
/// comes after all of its successors. Successors are visited in ascending
/// symbol order.
///
/// The search uses an explicit stack, since the depth of the DFA is the
/// length of the longest example.
fn elimination_order(dfa: &DFA) -> Vec<StateID> {
    let mut order = Vec::with_capacity(dfa.state_len());
    let mut seen = vec![false; dfa.state_len()];
    // Each frame is a state and the index of its next transition to visit.
    let mut stack: Vec<(StateID, usize)> = vec![(dfa.start(), 0)];
    seen[dfa.start()] = true;
    while let Some(&mut (sid, ref mut next)) = stack.last_mut() {
        match dfa.transitions(sid).nth(*next) {
            Some((_, child)) => {
                *next += 1;
                if child != DEAD && !seen[child] {
                    seen[child] = true;
                    stack.push((child, 0));
                }
            }
            None => {
                order.push(sid);
                stack.pop();
            }
        }
    }
    order
}
