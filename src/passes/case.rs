/*!
Case folding of ASCII letters.
*/

use crate::{ast::Ast, synth, util::alphabet::Symbol};

/// Fold every ASCII letter in the expression to lowercase and re-synthesize
/// it, so that examples differing only in case share one alternative.
///
/// The returned flag is true if the expression contains any ASCII letter,
/// even one that was lowercase already, since `(?i)` changes what such an
/// expression matches. Otherwise the expression is returned unchanged and
/// the flag is false.
pub fn fold_case(ast: Ast) -> (Ast, bool) {
    if !ast.any_literal(|c| c.is_ascii_alphabetic()) {
        return (ast, false);
    }
    let mut lower = |c: char| Symbol::Char(c.to_ascii_lowercase());
    let mut folded = ast.language();
    for sym in folded.iter_mut().flatten() {
        *sym = sym.map_chars(&mut lower);
    }
    (synth::synthesize_language(folded), true)
}
