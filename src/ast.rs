/*!
The abstract syntax of synthesized regular expressions.

An [`Ast`] is always a tree: every node is owned by exactly one parent.
Passes that rewrite an expression consume it and return a new one.

The smart constructors [`Ast::concat`] and [`Ast::union`] keep expressions in
a normal form that the rest of the crate relies on:

* sequences are flattened and never contain exactly one element,
* alternations are flattened, contain no duplicates and no empty branch, and
  are ordered by the leading symbol of each branch,
* an alternation that would contain the empty string is instead wrapped in an
  optional quantifier.
*/

use crate::util::alphabet::{Class, Symbol};

/// A regular expression over a finite language.
///
/// The empty sequence denotes the language containing only the empty string.
/// There is no way to express the empty language, since every synthesized
/// expression matches at least one example.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Ast {
    /// A single code point.
    Literal(char),
    /// A named character class such as `\d`.
    Class(Class),
    /// A concatenation.
    Sequence(Vec<Ast>),
    /// A choice between alternatives. Order is significant for output only.
    Alternation(Vec<Ast>),
    /// A group around an expression. Groups are only inserted right before
    /// an expression is written out.
    Group {
        /// The grouped expression.
        inner: Box<Ast>,
        /// Whether the group is written as `(...)` or `(?:...)`.
        capturing: bool,
    },
    /// `inner` repeated exactly `count` times, optionally not at all.
    Quantifier {
        /// The repeated expression.
        inner: Box<Ast>,
        /// When true, the whole repetition may also be skipped.
        optional: bool,
        /// The number of repetitions. At least 1.
        count: u32,
    },
}

impl Ast {
    /// The expression matching only the empty string.
    pub fn empty() -> Ast {
        Ast::Sequence(vec![])
    }

    /// Returns true if this is the expression matching only the empty
    /// string.
    pub fn is_empty(&self) -> bool {
        matches!(*self, Ast::Sequence(ref items) if items.is_empty())
    }

    /// `inner?`
    pub fn optional(inner: Ast) -> Ast {
        Ast::Quantifier { inner: Box::new(inner), optional: true, count: 1 }
    }

    /// `inner{count}`
    pub fn repeat(inner: Ast, count: u32) -> Ast {
        Ast::Quantifier { inner: Box::new(inner), optional: false, count }
    }

    /// Convert a single symbol into an expression.
    pub fn from_symbol(sym: &Symbol) -> Ast {
        match *sym {
            Symbol::Char(c) => Ast::Literal(c),
            Symbol::Class(class) => Ast::Class(class),
            Symbol::Repeat { ref unit, count } => {
                Ast::repeat(Ast::from_symbols(unit), count)
            }
        }
    }

    /// Convert a string of symbols into the sequence matching it.
    pub fn from_symbols(syms: &[Symbol]) -> Ast {
        syms.iter()
            .map(Ast::from_symbol)
            .fold(Ast::empty(), |acc, ast| acc.concat(ast))
    }

    /// Concatenate this expression with another one.
    pub fn concat(self, other: Ast) -> Ast {
        let mut items = match self {
            Ast::Sequence(items) => items,
            ast => vec![ast],
        };
        match other {
            Ast::Sequence(more) => items.extend(more),
            ast => items.push(ast),
        }
        if items.len() == 1 {
            items.pop().unwrap_or_else(Ast::empty)
        } else {
            Ast::Sequence(items)
        }
    }

    /// Form the union of this expression with another one.
    ///
    /// Branches are ordered by ascending leading symbol, duplicates are
    /// dropped, and an empty branch turns the result into an optional
    /// quantifier around the remaining branches.
    pub fn union(self, other: Ast) -> Ast {
        let mut nullable = false;
        let mut branches = vec![];
        self.push_branches(&mut branches, &mut nullable);
        other.push_branches(&mut branches, &mut nullable);
        // The sort is stable, so branches with equal leading symbols keep
        // the order in which they were unioned.
        branches.sort_by(|a, b| a.leading().cmp(&b.leading()));
        let mut uniq: Vec<Ast> = Vec::with_capacity(branches.len());
        for branch in branches {
            if !uniq.contains(&branch) {
                uniq.push(branch);
            }
        }
        let body = match uniq.len() {
            0 => Ast::empty(),
            1 => uniq.pop().unwrap_or_else(Ast::empty),
            _ => Ast::Alternation(uniq),
        };
        if nullable && !body.is_empty() {
            Ast::optional(body)
        } else {
            body
        }
    }

    fn push_branches(self, out: &mut Vec<Ast>, nullable: &mut bool) {
        match self {
            Ast::Alternation(alts) => {
                for alt in alts {
                    alt.push_branches(out, nullable);
                }
            }
            Ast::Quantifier { inner, optional: true, count: 1 } => {
                *nullable = true;
                inner.push_branches(out, nullable);
            }
            ast if ast.is_empty() => *nullable = true,
            ast => out.push(ast),
        }
    }

    /// Returns true if this expression matches the empty string.
    pub fn is_nullable(&self) -> bool {
        match *self {
            Ast::Literal(_) | Ast::Class(_) => false,
            Ast::Sequence(ref items) => items.iter().all(Ast::is_nullable),
            Ast::Alternation(ref alts) => alts.iter().any(Ast::is_nullable),
            Ast::Group { ref inner, .. } => inner.is_nullable(),
            Ast::Quantifier { ref inner, optional, .. } => {
                optional || inner.is_nullable()
            }
        }
    }

    /// Return the smallest symbol that a non-empty match of this expression
    /// can start with, or `None` if it only matches the empty string.
    ///
    /// This is the key by which alternatives are ordered.
    pub fn leading(&self) -> Option<Symbol> {
        let mut min: Option<Symbol> = None;
        let mut stack = vec![self];
        while let Some(ast) = stack.pop() {
            match *ast {
                Ast::Literal(c) => min = smallest(min, Some(Symbol::Char(c))),
                Ast::Class(class) => {
                    min = smallest(min, Some(Symbol::Class(class)))
                }
                Ast::Sequence(ref items) => {
                    for item in items.iter() {
                        stack.push(item);
                        if !item.is_nullable() {
                            break;
                        }
                    }
                }
                Ast::Alternation(ref alts) => stack.extend(alts.iter()),
                Ast::Group { ref inner, .. } => stack.push(inner),
                Ast::Quantifier { ref inner, optional: false, count } => {
                    match repeat_symbol(inner, count) {
                        Some(sym) => min = smallest(min, Some(sym)),
                        None => stack.push(inner),
                    }
                }
                Ast::Quantifier { ref inner, optional: true, .. } => {
                    stack.push(inner)
                }
            }
        }
        min
    }

    /// If this expression is a single symbol, then return it.
    ///
    /// Literals and classes are symbols. A mandatory repetition of a string
    /// of symbols is a `Symbol::Repeat`.
    pub fn as_symbol(&self) -> Option<Symbol> {
        match *self {
            Ast::Literal(c) => Some(Symbol::Char(c)),
            Ast::Class(class) => Some(Symbol::Class(class)),
            Ast::Group { ref inner, .. } => inner.as_symbol(),
            Ast::Quantifier { ref inner, optional: false, count } => {
                repeat_symbol(inner, count)
            }
            _ => None,
        }
    }

    /// If this expression is a non-empty string of symbols, then return it.
    pub fn as_symbols(&self) -> Option<Vec<Symbol>> {
        match *self {
            Ast::Sequence(ref items) if !items.is_empty() => {
                items.iter().map(Ast::as_symbol).collect()
            }
            Ast::Group { ref inner, .. } => inner.as_symbols(),
            _ => self.as_symbol().map(|sym| vec![sym]),
        }
    }

    /// Enumerate the language of this expression, sorted and deduplicated.
    ///
    /// Mandatory repetitions of symbol strings are kept as single
    /// `Symbol::Repeat` symbols rather than being expanded, which lets a
    /// language be rebuilt into an automaton without losing them.
    pub fn language(&self) -> Vec<Vec<Symbol>> {
        let mut lang = vec![];
        // Each pending entry is a prefix of a string in the language,
        // together with the nodes that remain to be matched after it. The
        // next node is at the end.
        let mut pending: Vec<(Vec<Symbol>, Vec<&Ast>)> =
            vec![(vec![], vec![self])];
        while let Some((mut prefix, mut rest)) = pending.pop() {
            let ast = match rest.pop() {
                None => {
                    lang.push(prefix);
                    continue;
                }
                Some(ast) => ast,
            };
            match *ast {
                Ast::Literal(c) => prefix.push(Symbol::Char(c)),
                Ast::Class(class) => prefix.push(Symbol::Class(class)),
                Ast::Sequence(ref items) => rest.extend(items.iter().rev()),
                Ast::Alternation(ref alts) => {
                    for alt in alts.iter() {
                        let mut rest = rest.clone();
                        rest.push(alt);
                        pending.push((prefix.clone(), rest));
                    }
                    continue;
                }
                Ast::Group { ref inner, .. } => rest.push(inner),
                Ast::Quantifier { ref inner, optional, count } => {
                    if optional {
                        pending.push((prefix.clone(), rest.clone()));
                    }
                    match repeat_symbol(inner, count) {
                        Some(sym) => prefix.push(sym),
                        None => rest.extend((0..count).map(|_| &**inner)),
                    }
                }
            }
            pending.push((prefix, rest));
        }
        lang.sort();
        lang.dedup();
        lang
    }

    /// Returns true if some literal in this expression satisfies `pred`.
    pub fn any_literal<F: FnMut(char) -> bool>(&self, mut pred: F) -> bool {
        let mut stack = vec![self];
        while let Some(ast) = stack.pop() {
            match *ast {
                Ast::Literal(c) if pred(c) => return true,
                _ => stack.extend(ast.children()),
            }
        }
        false
    }

    /// The direct subexpressions of this expression, in order.
    pub fn children(&self) -> &[Ast] {
        match *self {
            Ast::Literal(_) | Ast::Class(_) => &[],
            Ast::Sequence(ref items) | Ast::Alternation(ref items) => {
                items.as_slice()
            }
            Ast::Group { ref inner, .. } | Ast::Quantifier { ref inner, .. } => {
                core::slice::from_ref(&**inner)
            }
        }
    }

    /// Rebuild this expression bottom up, replacing every node by the result
    /// of `f` once its children have been replaced.
    ///
    /// This uses an explicit stack, so it works on expressions of any
    /// depth.
    pub(crate) fn map_bottom_up<F: FnMut(Ast) -> Ast>(self, mut f: F) -> Ast {
        enum Frame {
            Enter(Ast),
            Exit(Ast, usize),
        }

        let mut stack = vec![Frame::Enter(self)];
        let mut built: Vec<Ast> = vec![];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(mut ast) => {
                    let children = ast.take_children();
                    stack.push(Frame::Exit(ast, children.len()));
                    stack.extend(children.into_iter().rev().map(Frame::Enter));
                }
                Frame::Exit(mut ast, len) => {
                    let children = built.split_off(built.len() - len);
                    ast.put_children(children);
                    built.push(f(ast));
                }
            }
        }
        built.pop().unwrap_or_else(Ast::empty)
    }

    fn take_children(&mut self) -> Vec<Ast> {
        match *self {
            Ast::Literal(_) | Ast::Class(_) => vec![],
            Ast::Sequence(ref mut items) | Ast::Alternation(ref mut items) => {
                core::mem::take(items)
            }
            Ast::Group { ref mut inner, .. }
            | Ast::Quantifier { ref mut inner, .. } => {
                vec![core::mem::replace(&mut **inner, Ast::empty())]
            }
        }
    }

    fn put_children(&mut self, mut children: Vec<Ast>) {
        match *self {
            Ast::Literal(_) | Ast::Class(_) => {}
            Ast::Sequence(ref mut items) | Ast::Alternation(ref mut items) => {
                *items = children;
            }
            Ast::Group { ref mut inner, .. }
            | Ast::Quantifier { ref mut inner, .. } => {
                if let Some(child) = children.pop() {
                    **inner = child;
                }
            }
        }
    }
}

/// The atomic symbol for `inner{count}`, if there is one.
fn repeat_symbol(inner: &Ast, count: u32) -> Option<Symbol> {
    if count < 2 {
        return None;
    }
    let unit = inner.as_symbols()?;
    Some(Symbol::Repeat { unit, count })
}

fn smallest(a: Option<Symbol>, b: Option<Symbol>) -> Option<Symbol> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(if b < a { b } else { a }),
    }
}
