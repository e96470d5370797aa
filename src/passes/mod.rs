/*!
Conversion passes that rewrite a synthesized expression.

Passes run in a fixed order, regardless of the order in which conversions
were requested:

1. [`classes`] replaces literals with character classes.
2. [`repetition`] collapses consecutive repeated substrings.
3. [`case`] folds letters to lowercase and raises the case-insensitive flag.

Class and case folding change the alphabet of the expression. Both
re-synthesize it from its rewritten language, so that alternatives which
have become identical are merged and factored again. Repetitions created by
the second pass survive the third one because enumerating a language keeps
them as single symbols.
*/

use crate::{
    ast::Ast,
    config::{Config, Conversion},
};

pub mod case;
pub mod classes;
pub mod repetition;

/// The result of applying every enabled conversion to an expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Converted {
    /// The rewritten expression.
    pub ast: Ast,
    /// Whether the expression must be matched case insensitively.
    pub case_insensitive: bool,
}

/// Apply every conversion enabled in the given configuration.
///
/// Options are assumed to have been validated already.
pub fn apply(ast: Ast, config: &Config) -> Converted {
    let conversions = config.get_conversions();
    let mut ast = ast;

    let classes = conversions.classes();
    if !classes.is_empty() {
        ast = classes::fold_classes(ast, &classes);
        debug!("folded literals into {} classes", classes.len());
    }
    if conversions.contains(Conversion::Repetition) {
        ast = repetition::compress(
            ast,
            config.get_minimum_repetitions(),
            config.get_minimum_substring_length(),
        );
        debug!("collapsed repetitions");
    }
    let mut case_insensitive = false;
    if conversions.contains(Conversion::CaseInsensitivity) {
        let (folded, flag) = case::fold_case(ast);
        ast = folded;
        case_insensitive = flag;
        debug!("folded case, flag raised: {}", case_insensitive);
    }
    Converted { ast, case_insensitive }
}
