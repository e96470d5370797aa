/*!
Replacement of literals with character classes.
*/

use crate::{
    ast::Ast,
    synth,
    util::alphabet::{Class, Symbol},
};

/// Replace every literal matched by one of the given classes with the first
/// such class, then re-synthesize the expression.
///
/// Literals matched by none of the classes are kept. If no literal is
/// replaced at all, then the expression is returned unchanged.
pub fn fold_classes(ast: Ast, classes: &[Class]) -> Ast {
    let folds = |c: char| classes.iter().find(|cls| cls.folds(c)).copied();
    if !ast.any_literal(|c| folds(c).is_some()) {
        return ast;
    }
    let mut fold = |c: char| match folds(c) {
        Some(class) => Symbol::Class(class),
        None => Symbol::Char(c),
    };
    let mut lang = ast.language();
    for sym in lang.iter_mut().flatten() {
        *sym = sym.map_chars(&mut fold);
    }
    synth::synthesize_language(lang)
}
