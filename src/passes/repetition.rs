/*!
Collapsing of consecutive repeated substrings into counted repetitions.

Only runs of atoms are considered, where an atom is a literal, a class or a
mandatory counted repetition. A run is never collapsed across an
alternation, a group or an optional part, so the set of matched strings does
not change.
*/

use crate::ast::Ast;

/// Collapse repeated substrings everywhere in the given expression.
///
/// A substring is collapsed when it is at least `min_len` atoms long, is not
/// itself a repetition of a shorter substring, and occurs at least twice in
/// a row with more than `min_repetitions` occurrences after the first one
/// counted as repetitions, i.e., `count > min_repetitions`.
///
/// Sequences are scanned from left to right. At each position, the run
/// covering the most atoms wins, with ties going to the longer unit. The
/// unit of a collapsed run is itself compressed.
pub fn compress(ast: Ast, min_repetitions: u32, min_len: u32) -> Ast {
    ast.map_bottom_up(|ast| match ast {
        Ast::Sequence(items) => {
            let mut out = compress_sequence(items, min_repetitions, min_len);
            if out.len() == 1 {
                out.pop().unwrap_or_else(Ast::empty)
            } else {
                Ast::Sequence(out)
            }
        }
        ast => ast,
    })
}

fn is_atom(ast: &Ast) -> bool {
    match *ast {
        Ast::Literal(_) | Ast::Class(_) => true,
        Ast::Quantifier { optional: false, count, .. } => {
            count >= 2 && ast.as_symbol().is_some()
        }
        _ => false,
    }
}

/// Compress every maximal run of atoms in a sequence, leaving other items
/// where they are.
fn compress_sequence(
    items: Vec<Ast>,
    min_repetitions: u32,
    min_len: u32,
) -> Vec<Ast> {
    let mut out = vec![];
    let mut atoms = vec![];
    for item in items {
        if is_atom(&item) {
            atoms.push(item);
            continue;
        }
        out.extend(compress_atoms(
            core::mem::take(&mut atoms),
            min_repetitions,
            min_len,
        ));
        out.push(item);
    }
    out.extend(compress_atoms(atoms, min_repetitions, min_len));
    out
}

fn compress_atoms(
    atoms: Vec<Ast>,
    min_repetitions: u32,
    min_len: u32,
) -> Vec<Ast> {
    let mut out = vec![];
    let mut i = 0;
    while i < atoms.len() {
        match best_run(&atoms[i..], min_repetitions, min_len) {
            None => {
                out.push(atoms[i].clone());
                i += 1;
            }
            Some((len, count)) => {
                let mut unit = compress_atoms(
                    atoms[i..i + len].to_vec(),
                    min_repetitions,
                    min_len,
                );
                let unit = if unit.len() == 1 {
                    unit.pop().unwrap_or_else(Ast::empty)
                } else {
                    Ast::Sequence(unit)
                };
                trace!("collapsed {} copies of a {} atom unit", count, len);
                // Counts never get near u32::MAX, since each copy is at
                // least one code point of an example.
                out.push(Ast::repeat(unit, count as u32));
                i += len * count;
            }
        }
    }
    out
}

/// Find the best run starting at the beginning of `atoms`, returned as the
/// unit length and the number of copies.
fn best_run(
    atoms: &[Ast],
    min_repetitions: u32,
    min_len: u32,
) -> Option<(usize, usize)> {
    let min_len = min_len as usize;
    let mut best: Option<(usize, usize)> = None;
    for len in (min_len.max(1)..=atoms.len() / 2).rev() {
        let unit = &atoms[..len];
        if !is_primitive(unit) {
            continue;
        }
        let mut count = 1;
        while atoms[count * len..].starts_with(unit) {
            count += 1;
        }
        if count < 2 || count as u64 <= u64::from(min_repetitions) {
            continue;
        }
        let covered = len * count;
        if best.map_or(true, |(blen, bcount)| covered > blen * bcount) {
            best = Some((len, count));
        }
    }
    best
}

/// Returns true if the given unit is not a repetition of a shorter unit.
fn is_primitive(unit: &[Ast]) -> bool {
    let n = unit.len();
    (1..n).filter(|d| n % d == 0).all(|d| {
        !unit.chunks(d).all(|chunk| chunk == &unit[..d])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Ast {
        s.chars().map(Ast::Literal).fold(Ast::empty(), Ast::concat)
    }

    fn rep(s: &str, count: u32) -> Ast {
        Ast::repeat(lit(s), count)
    }

    #[test]
    fn single_code_point() {
        assert_eq!(rep("a", 3), compress(lit("aaa"), 1, 1));
    }

    #[test]
    fn multi_code_point_unit() {
        assert_eq!(
            lit("x").concat(rep("bc", 2)).concat(lit("y")),
            compress(lit("xbcbcy"), 1, 1),
        );
    }

    #[test]
    fn minimum_repetitions() {
        let ast = Ast::Alternation(vec![
            lit("aa"),
            lit("bcbc"),
            lit("defdefdef"),
        ]);
        let want = Ast::Alternation(vec![
            lit("aa"),
            lit("bcbc"),
            rep("def", 3),
        ]);
        assert_eq!(want, compress(ast, 2, 1));
    }

    #[test]
    fn minimum_substring_length() {
        assert_eq!(lit("aaa"), compress(lit("aaa"), 1, 2));
        assert_eq!(rep("ab", 2), compress(lit("abab"), 1, 2));
    }

    #[test]
    fn most_coverage_wins() {
        // "ab" twice covers four atoms, "a" never repeats here.
        assert_eq!(rep("ab", 2), compress(lit("abab"), 1, 1));
        // "aab" twice covers six atoms, beating "aa" which covers two.
        assert_eq!(
            Ast::repeat(rep("a", 2).concat(lit("b")), 2),
            compress(lit("aabaab"), 1, 1),
        );
    }

    #[test]
    fn non_primitive_units_are_skipped() {
        // "aaaa" is a run of four 'a', not two copies of "aa".
        assert_eq!(rep("a", 4), compress(lit("aaaa"), 1, 1));
    }

    #[test]
    fn runs_stop_at_non_atoms() {
        let ast = lit("aa").concat(Ast::optional(lit("a"))).concat(lit("aa"));
        let want = rep("a", 2)
            .concat(Ast::optional(lit("a")))
            .concat(rep("a", 2));
        assert_eq!(want, compress(ast, 1, 1));
    }

    #[test]
    fn inside_optional() {
        let ast = lit("x").concat(Ast::optional(lit("yy")));
        let want = lit("x").concat(Ast::optional(rep("y", 2)));
        assert_eq!(want, compress(ast, 1, 1));
    }

    #[test]
    fn idempotent() {
        let once = compress(lit("abcabcabcxx"), 1, 1);
        assert_eq!(once.clone(), compress(once, 1, 1));
    }

    #[test]
    fn deep_optional_chain() {
        // xx(?:xx(?:xx...)?)? keeps its shape, with every pair collapsed.
        let mut ast = lit("xx");
        for _ in 1..20_000 {
            ast = lit("xx").concat(Ast::optional(ast));
        }
        let mut next = Some(compress(ast, 1, 1));
        let mut depth = 0;
        while let Some(ast) = next.take() {
            depth += 1;
            match ast {
                Ast::Sequence(mut items) => {
                    assert_eq!(2, items.len());
                    if let Some(Ast::Quantifier { inner, optional: true, .. }) =
                        items.pop()
                    {
                        next = Some(*inner);
                    }
                    assert_eq!(Some(rep("x", 2)), items.pop());
                }
                ast => assert_eq!(rep("x", 2), ast),
            }
        }
        assert_eq!(20_000, depth);
    }
}
