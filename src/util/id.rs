/*!
Identifiers for states in the automata built during synthesis.

Both the trie and the DFA store their states in an arena (a `Vec`) and refer
to each other's states by index. Wrapping that index in a dedicated type keeps
trie states, DFA states and plain counters from being mixed up.
*/

/// The identifier of a state in a trie or a DFA.
///
/// A `StateID` is an index into the arena of states owned by the automaton
/// that produced it. Using it with any other automaton is a logic error and
/// will likely panic.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID(u32);

impl StateID {
    /// The zero identifier.
    ///
    /// In a trie this is the root. In a DFA this is the dead state.
    pub const ZERO: StateID = StateID(0);

    /// The total number of identifiers that can be represented.
    pub const LIMIT: usize = u32::MAX as usize;

    /// Create a new state identifier from an arena index.
    ///
    /// This panics if the index exceeds `StateID::LIMIT`. Arenas only grow
    /// by one state per input code point, so exceeding the limit means the
    /// examples themselves occupy gigabytes of memory.
    #[inline]
    pub fn new(index: usize) -> StateID {
        assert!(index < StateID::LIMIT, "state identifier overflow");
        StateID(index as u32)
    }

    /// Return the arena index of this identifier.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl<T> core::ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl<T> core::ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

/// An extension trait that pairs every item of an iterator with the state
/// identifier corresponding to its position.
pub(crate) trait IteratorIDExt: Iterator {
    fn with_state_ids(self) -> WithStateIDIter<Self>
    where
        Self: Sized,
    {
        WithStateIDIter { it: self, next: 0 }
    }
}

impl<I: Iterator> IteratorIDExt for I {}

#[derive(Clone, Debug)]
pub(crate) struct WithStateIDIter<I> {
    it: I,
    next: usize,
}

impl<I: Iterator> Iterator for WithStateIDIter<I> {
    type Item = (StateID, I::Item);

    fn next(&mut self) -> Option<(StateID, I::Item)> {
        let item = self.it.next()?;
        let id = StateID::new(self.next);
        self.next += 1;
        Some((id, item))
    }
}
