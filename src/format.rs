/*!
Rendering of an expression as the text of a regular expression.

The tree is written out depth first with an explicit stack, so arbitrarily
deep expressions are fine. Groups are written around:

* every alternation, including one at the top level, since the anchors
  would otherwise bind to the first and last alternatives only,
* the operand of `?`, unless it is a single literal code point,
* the operand of `{n}`, unless it is a single literal or class.

A literal written as a surrogate pair counts as two code points here. An
optional counted repetition is written as `(?:x{n})?`.
*/

use crate::{
    ast::Ast,
    config::{Config, Conversion},
};

const RESET: &str = "\x1B[0m";

/// The category of a piece of output, used to pick its color.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token {
    /// `^`, `$` and the `(?i)` flag.
    Anchor,
    /// Group delimiters and `|`.
    Group,
    /// `?` and `{n}`.
    Quantifier,
    /// `\d`, `\W` and the like.
    Class,
    /// An escaped literal.
    Escape,
}

impl Token {
    fn color(&self) -> &'static str {
        match *self {
            Token::Anchor => "\x1B[1;33m",
            Token::Group => "\x1B[32m",
            Token::Quantifier => "\x1B[35m",
            Token::Class => "\x1B[36m",
            Token::Escape => "\x1B[31m",
        }
    }
}

/// One unit of pending output.
enum Step<'a> {
    Node(&'a Ast),
    Text(Token, String),
}

/// Writes expressions out as regular expression text.
#[derive(Clone, Debug)]
pub struct Formatter {
    capturing: bool,
    escape_non_ascii: bool,
    surrogate_pairs: bool,
    highlight: bool,
}

impl Formatter {
    /// Create a formatter using the output options of the given
    /// configuration.
    pub fn new(config: &Config) -> Formatter {
        Formatter {
            capturing: config.is_converted(Conversion::CapturingGroup),
            escape_non_ascii: config.get_escape_non_ascii(),
            surrogate_pairs: config.get_surrogate_pairs(),
            highlight: config.get_syntax_highlighting(),
        }
    }

    /// Write the given expression out, anchored at both ends and prefixed
    /// with `(?i)` if it must be matched case insensitively.
    pub fn format(&self, ast: &Ast, case_insensitive: bool) -> String {
        let mut out = String::new();
        if case_insensitive {
            self.paint(&mut out, Token::Anchor, "(?i)");
        }
        self.paint(&mut out, Token::Anchor, "^");
        self.write(&mut out, ast);
        self.paint(&mut out, Token::Anchor, "$");
        out
    }

    fn write(&self, out: &mut String, ast: &Ast) {
        // Steps are pushed in reverse order of output.
        let mut stack = vec![Step::Node(ast)];
        while let Some(step) = stack.pop() {
            let ast = match step {
                Step::Text(token, text) => {
                    self.paint(out, token, &text);
                    continue;
                }
                Step::Node(ast) => ast,
            };
            match *ast {
                Ast::Literal(c) => self.write_literal(out, c),
                Ast::Class(class) => {
                    self.paint(out, Token::Class, class.as_str())
                }
                Ast::Sequence(ref items) => {
                    stack.extend(items.iter().rev().map(Step::Node));
                }
                Ast::Alternation(ref alts) => {
                    stack.push(self.close());
                    for (i, alt) in alts.iter().enumerate().rev() {
                        stack.push(Step::Node(alt));
                        if i > 0 {
                            stack.push(Step::Text(Token::Group, "|".into()));
                        }
                    }
                    stack.push(self.open(self.capturing));
                }
                Ast::Group { ref inner, capturing } => {
                    stack.push(self.close());
                    stack.push(Step::Node(inner));
                    stack.push(self.open(capturing));
                }
                Ast::Quantifier { ref inner, optional, count } => {
                    let counted = count >= 2;
                    if optional {
                        stack.push(Step::Text(Token::Quantifier, "?".into()));
                    }
                    if optional && counted {
                        stack.push(self.close());
                    }
                    if counted {
                        let text = format!("{{{}}}", count);
                        stack.push(Step::Text(Token::Quantifier, text));
                    }
                    let bare = self.is_bare(inner, optional && !counted);
                    if !bare {
                        stack.push(self.close());
                    }
                    stack.push(Step::Node(inner));
                    if !bare {
                        stack.push(self.open(self.capturing));
                    }
                    if optional && counted {
                        stack.push(self.open(self.capturing));
                    }
                }
            }
        }
    }

    /// Returns true if `inner` can take a quantifier without a group around
    /// it. Alternations count as bare since they always bring their own.
    fn is_bare(&self, inner: &Ast, optional: bool) -> bool {
        match *inner {
            Ast::Alternation(_) | Ast::Group { .. } => true,
            Ast::Literal(c) => !self.is_surrogate_pair(c),
            Ast::Class(_) => !optional,
            _ => false,
        }
    }

    fn is_surrogate_pair(&self, c: char) -> bool {
        self.escape_non_ascii && self.surrogate_pairs && u32::from(c) > 0xFFFF
    }

    fn open(&self, capturing: bool) -> Step<'static> {
        let text = if capturing { "(" } else { "(?:" };
        Step::Text(Token::Group, text.to_string())
    }

    fn close(&self) -> Step<'static> {
        Step::Text(Token::Group, ")".into())
    }

    fn write_literal(&self, out: &mut String, c: char) {
        let escaped = match c {
            '\t' => r"\t".to_string(),
            '\n' => r"\n".to_string(),
            '\r' => r"\r".to_string(),
            '\x0B' => r"\v".to_string(),
            '\x0C' => r"\f".to_string(),
            c if is_syntax_character(c) => format!(r"\{}", c),
            c if c.is_ascii() || !self.escape_non_ascii => {
                out.push(c);
                return;
            }
            c if self.is_surrogate_pair(c) => {
                let mut units = [0; 2];
                c.encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!(r"\u{{{:x}}}", unit))
                    .collect()
            }
            c => format!(r"\u{{{:x}}}", u32::from(c)),
        };
        self.paint(out, Token::Escape, &escaped);
    }

    fn paint(&self, out: &mut String, token: Token, text: &str) {
        if self.highlight {
            out.push_str(token.color());
            out.push_str(text);
            out.push_str(RESET);
        } else {
            out.push_str(text);
        }
    }
}

/// Returns true for the characters with a meaning of their own in the
/// emitted syntax. Other punctuation, such as `#` or `-`, is written as is.
fn is_syntax_character(c: char) -> bool {
    matches!(
        c,
        '\\' | '.'
            | '+'
            | '*'
            | '?'
            | '('
            | ')'
            | '|'
            | '['
            | ']'
            | '{'
            | '}'
            | '^'
            | '$'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::alphabet::{Class, ClassKind, Symbol};

    fn lit(s: &str) -> Ast {
        Ast::from_symbols(&s.chars().map(Symbol::Char).collect::<Vec<_>>())
    }

    fn fmt(ast: &Ast) -> String {
        Formatter::new(&Config::new()).format(ast, false)
    }

    #[test]
    fn anchors_and_alternation() {
        let ast = Ast::Alternation(vec![lit("123"), lit("a")]);
        assert_eq!("^(?:123|a)$", fmt(&ast));
        assert_eq!("^$", fmt(&Ast::empty()));
    }

    #[test]
    fn optional_grouping() {
        assert_eq!("^ab?$", fmt(&lit("a").concat(Ast::optional(lit("b")))));
        assert_eq!("^(?:ab)?$", fmt(&Ast::optional(lit("ab"))));
        let w = Ast::Class(Class::new(ClassKind::Word, false));
        assert_eq!(r"^(?:\w)?$", fmt(&Ast::optional(w)));
        let alt = Ast::Alternation(vec![lit("a"), lit("b")]);
        assert_eq!("^(?:a|b)?$", fmt(&Ast::optional(alt)));
    }

    #[test]
    fn counted_grouping() {
        let d = Ast::Class(Class::new(ClassKind::Digit, false));
        assert_eq!(r"^\d{3}$", fmt(&Ast::repeat(d, 3)));
        assert_eq!("^a{2}$", fmt(&Ast::repeat(lit("a"), 2)));
        assert_eq!("^(?:bc){2}$", fmt(&Ast::repeat(lit("bc"), 2)));
        let optional = Ast::Quantifier {
            inner: Box::new(lit("a")),
            optional: true,
            count: 2,
        };
        assert_eq!("^(?:a{2})?$", fmt(&optional));
    }

    #[test]
    fn capturing_groups() {
        let config = Config::new()
            .conversions(vec![Conversion::CapturingGroup].into_iter().collect());
        let ast = Ast::optional(Ast::Alternation(vec![lit("a"), lit("bc")]));
        let got = Formatter::new(&config).format(&ast, false);
        assert_eq!("^(a|bc)?$", got);
    }

    #[test]
    fn case_flag() {
        let got = Formatter::new(&Config::new()).format(&lit("a"), true);
        assert_eq!("(?i)^a$", got);
    }

    #[test]
    fn escaping() {
        assert_eq!(r"^a\.b\*\n\t$", fmt(&lit("a.b*\n\t")));
        assert_eq!(r"^\v\f\r$", fmt(&lit("\x0B\x0C\r")));
        assert_eq!("^ é💩$", fmt(&lit(" é💩")));
        assert_eq!(r"^\(\)\[\]\{\}\|\+\?\^\$\\$", fmt(&lit("()[]{}|+?^$\\")));
    }

    #[test]
    fn punctuation_left_alone() {
        assert_eq!("^a#b&c~d-e/f$", fmt(&lit("a#b&c~d-e/f")));
    }

    #[test]
    fn non_ascii_escapes() {
        let config = Config::new().escape_non_ascii(true);
        let got = Formatter::new(&config).format(&lit("é💩"), false);
        assert_eq!(r"^\u{e9}\u{1f4a9}$", got);

        let config = config.surrogate_pairs(true);
        let got = Formatter::new(&config).format(&lit("é💩"), false);
        assert_eq!(r"^\u{e9}\u{d83d}\u{dca9}$", got);
    }

    #[test]
    fn surrogates_ignored_without_escaping() {
        let config = Config::new().surrogate_pairs(true);
        let f = Formatter::new(&config);
        assert_eq!("^é$", f.format(&lit("é"), false));
        assert_eq!("^💩$", f.format(&lit("💩"), false));
        assert_eq!("^💩?$", f.format(&Ast::optional(lit("💩")), false));
    }

    #[test]
    fn surrogate_pairs_are_grouped() {
        let config =
            Config::new().escape_non_ascii(true).surrogate_pairs(true);
        let f = Formatter::new(&config);
        let got = f.format(&Ast::repeat(lit("💩"), 2), false);
        assert_eq!(r"^(?:\u{d83d}\u{dca9}){2}$", got);
        let got = f.format(&lit("a").concat(Ast::optional(lit("💩"))), false);
        assert_eq!(r"^a(?:\u{d83d}\u{dca9})?$", got);
        let got = f.format(&Ast::optional(lit("é")), false);
        assert_eq!(r"^\u{e9}?$", got);
    }

    #[test]
    fn deep_nesting() {
        // a(?:a(?:a...)?)? nested far deeper than any call stack allows.
        let mut ast = lit("a");
        for _ in 1..50_000 {
            ast = lit("a").concat(Ast::optional(ast));
        }
        let got = fmt(&ast);
        assert_eq!(50_000, got.matches('a').count());
        assert!(got.starts_with("^a(?:a(?:a"));
        assert!(got.ends_with("aa?)?)?$"));
        // The tree is dropped piecewise to keep the test itself shallow.
        let mut next = Some(ast);
        while let Some(ast) = next.take() {
            if let Ast::Sequence(mut items) = ast {
                if let Some(Ast::Quantifier { inner, .. }) = items.pop() {
                    next = Some(*inner);
                }
            }
        }
    }

    #[test]
    fn highlighting() {
        let config = Config::new().syntax_highlighting(true);
        let d = Ast::Class(Class::new(ClassKind::Digit, false));
        let got = Formatter::new(&config)
            .format(&Ast::optional(lit("a")).concat(d), false);
        assert!(got.starts_with("\x1B[1;33m^\x1B[0m"));
        assert!(got.contains("a\x1B[35m?\x1B[0m"));
        assert!(got.contains("\x1B[36m\\d\x1B[0m"));
        assert!(got.ends_with("\x1B[1;33m$\x1B[0m"));
    }
}
