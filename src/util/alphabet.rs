/*!
The alphabet over which tries and DFAs are built.

Automata in this crate do not transition on raw code points. They transition
on [`Symbol`]s, which are either a code point, a named character class such
as `\d`, or an atomic counted repetition such as `(?:bc){2}`. Starting out,
every symbol is a code point. Conversion passes that replace code points with
classes, or that fold case, rebuild the automaton over the new symbols so that
strings which have become identical share states again.

The ordering of symbols is significant: it determines the order in which
alternatives are written out. Symbols are ordered by the code point they start
with, so that `\d` (which starts at `0`) sorts before a literal `a`.
*/

use core::cmp::Ordering;

/// The kind of a named character class.
///
/// The order of the variants is used to break ties between classes that
/// start at the same code point.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ClassKind {
    /// `\d`
    Digit,
    /// `\s`
    Space,
    /// `\w`
    Word,
}

/// A named character class, possibly negated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Class {
    kind: ClassKind,
    negated: bool,
}

impl Class {
    /// Create a new class of the given kind.
    pub const fn new(kind: ClassKind, negated: bool) -> Class {
        Class { kind, negated }
    }

    /// Return the kind of this class.
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Returns true if this is the complement of its named class.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Return the escape sequence that denotes this class, e.g., `\D`.
    pub fn as_str(&self) -> &'static str {
        match (self.kind, self.negated) {
            (ClassKind::Digit, false) => r"\d",
            (ClassKind::Digit, true) => r"\D",
            (ClassKind::Space, false) => r"\s",
            (ClassKind::Space, true) => r"\S",
            (ClassKind::Word, false) => r"\w",
            (ClassKind::Word, true) => r"\W",
        }
    }

    /// Returns true if the given literal may be replaced by this class
    /// without the literal ceasing to match.
    ///
    /// Positive classes are checked against the narrowest reading of each
    /// class: ASCII digits for `\d`, Unicode `White_Space` for `\s` and
    /// Unicode `\w` for `\w`. Negated classes only accept a literal that is
    /// outside the widest reading of the class, since a regex engine with
    /// Unicode classes would otherwise reject it.
    pub fn folds(&self, c: char) -> bool {
        match (self.kind, self.negated) {
            (ClassKind::Digit, false) => c.is_ascii_digit(),
            (ClassKind::Digit, true) => !c.is_numeric(),
            (ClassKind::Space, false) => c.is_whitespace(),
            (ClassKind::Space, true) => !c.is_whitespace(),
            (ClassKind::Word, false) => regex_syntax::is_word_character(c),
            (ClassKind::Word, true) => !regex_syntax::is_word_character(c),
        }
    }

    /// The smallest code point matched by this class.
    fn lowest(&self) -> u32 {
        if self.negated {
            return 0;
        }
        match self.kind {
            ClassKind::Digit | ClassKind::Word => u32::from('0'),
            ClassKind::Space => u32::from('\t'),
        }
    }
}

impl core::fmt::Display for Class {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single element of the alphabet of a trie or DFA.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// A single code point.
    Char(char),
    /// A named character class.
    Class(Class),
    /// A string of symbols repeated exactly `count` times, treated as one
    /// indivisible symbol. The count is always at least 2.
    Repeat {
        /// The repeated string. Never empty.
        unit: Vec<Symbol>,
        /// How many times the unit occurs.
        count: u32,
    },
}

impl Symbol {
    /// Returns the code point this symbol starts with. For classes, this is
    /// the smallest code point in the class.
    pub fn leading(&self) -> u32 {
        match *self {
            Symbol::Char(c) => u32::from(c),
            Symbol::Class(ref class) => class.lowest(),
            Symbol::Repeat { ref unit, .. } => {
                unit.first().map_or(0, Symbol::leading)
            }
        }
    }

    /// Apply the given function to every code point in this symbol,
    /// descending into repeated units.
    pub(crate) fn map_chars(&self, f: &mut impl FnMut(char) -> Symbol) -> Symbol {
        match *self {
            Symbol::Char(c) => f(c),
            Symbol::Class(class) => Symbol::Class(class),
            Symbol::Repeat { ref unit, count } => Symbol::Repeat {
                unit: unit.iter().map(|s| s.map_chars(f)).collect(),
                count,
            },
        }
    }

    fn rank(&self) -> u8 {
        match *self {
            Symbol::Char(_) => 0,
            Symbol::Class(_) => 1,
            Symbol::Repeat { .. } => 2,
        }
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Symbol) -> Ordering {
        self.leading()
            .cmp(&other.leading())
            .then_with(|| self.rank().cmp(&other.rank()))
            .then_with(|| match (self, other) {
                (Symbol::Char(a), Symbol::Char(b)) => a.cmp(b),
                (Symbol::Class(a), Symbol::Class(b)) => a.cmp(b),
                (
                    Symbol::Repeat { unit: u1, count: c1 },
                    Symbol::Repeat { unit: u2, count: c2 },
                ) => u1.cmp(u2).then_with(|| c1.cmp(c2)),
                // Equal ranks imply equal variants.
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Symbol) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Symbol::Char(c) => write!(f, "{:?}", c),
            Symbol::Class(ref class) => write!(f, "{}", class),
            Symbol::Repeat { ref unit, count } => {
                write!(f, "(")?;
                for s in unit.iter() {
                    write!(f, "{}", s)?;
                }
                write!(f, "){{{}}}", count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGIT: Class = Class::new(ClassKind::Digit, false);
    const WORD: Class = Class::new(ClassKind::Word, false);
    const NON_WORD: Class = Class::new(ClassKind::Word, true);

    #[test]
    fn order_by_leading_code_point() {
        let mut syms = vec![
            Symbol::Char('b'),
            Symbol::Class(WORD),
            Symbol::Char('1'),
            Symbol::Class(DIGIT),
            Symbol::Repeat { unit: vec![Symbol::Char('a')], count: 2 },
            Symbol::Class(NON_WORD),
        ];
        syms.sort();
        assert_eq!(
            vec![
                Symbol::Class(NON_WORD),
                Symbol::Class(DIGIT),
                Symbol::Class(WORD),
                Symbol::Char('1'),
                Symbol::Repeat { unit: vec![Symbol::Char('a')], count: 2 },
                Symbol::Char('b'),
            ],
            syms,
        );
    }

    #[test]
    fn folding_is_conservative() {
        let non_digit = Class::new(ClassKind::Digit, true);
        assert!(DIGIT.folds('7'));
        assert!(!DIGIT.folds('٣'));
        // Arabic-Indic three is a Unicode digit, so it must not become \D.
        assert!(!non_digit.folds('٣'));
        assert!(non_digit.folds('x'));
        assert!(WORD.folds('é'));
        assert!(WORD.folds('_'));
        assert!(NON_WORD.folds('-'));
        assert!(!NON_WORD.folds('é'));
    }

    #[test]
    fn class_names() {
        assert_eq!(r"\d", DIGIT.to_string());
        assert_eq!(r"\W", NON_WORD.to_string());
        assert_eq!(r"\S", Class::new(ClassKind::Space, true).as_str());
    }
}
