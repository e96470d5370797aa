/*!
This crate synthesizes a regular expression that matches a given set of
example strings.

Without any conversions, the synthesized expression matches exactly the
examples and nothing else. Optional conversions can generalize it, for
instance by replacing digits with `\d`, or make it more compact by
collapsing repeated substrings.

# Example

```
use regex_synth::{build_regex, Config};

let re = build_regex(&["a", "aa", "aaa"], &Config::new())?;
assert_eq!("^a(?:aa?)?$", re);

let config = Config::new().conversion_of(&["caseInsensitivity"])?;
let re = build_regex(&["big", "BIGGER", "Big", "bIgGeR"], &config)?;
assert_eq!("(?i)^big(?:ger)?$", re);

# Ok::<(), Box<dyn std::error::Error>>(())
```

# How it works

The examples are first inserted into a trie over code points. The trie is
already a deterministic automaton, so it is converted into a [`dfa::DFA`]
as is and then minimized with Hopcroft's algorithm. Minimization merges
common suffixes, and since the minimal DFA of a language is unique, the
order of the examples has no effect on the result.

The minimal DFA is converted into an [`ast::Ast`] by state elimination
(see [`synth`]), which factors out common prefixes along the way. The
conversion passes in [`passes`] then rewrite the expression, and finally
[`format::Formatter`] writes it out.

Alternatives are always written in ascending order of the code point they
start with.

# Crate features

* **logging** - Emits diagnostics for each stage through the `log` crate.
  This is disabled by default.
*/

#![warn(missing_docs)]

pub use crate::{
    builder::Builder,
    config::{Config, Conversion, Conversions},
    error::Error,
};

#[macro_use]
mod macros;

pub mod ast;
mod builder;
mod config;
pub mod dfa;
mod error;
pub mod format;
pub mod input;
pub mod passes;
pub mod synth;
pub mod trie;
pub mod util;

/// Synthesize a regular expression matching the given examples.
///
/// This is a convenience routine for building with a [`Builder`] that uses
/// the given configuration.
pub fn build_regex<I, S>(examples: I, config: &Config) -> Result<String, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Builder::new().configure(*config).build(examples)
}
