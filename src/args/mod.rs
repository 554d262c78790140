//! Command argument type system and parsing.
//!
//! - [`definition`]: declared argument model ([`ArgKind`], [`ArgumentDef`], [`ArgSpec`])
//! - [`value`]: coerced values and the [`ParsedArgs`] bag
//! - [`primitives`]: single-token parsers
//! - [`glyph`]: custom emote and default emoji extraction
//! - [`parser`]: the [`ArgParser`] engine

pub mod definition;
pub mod glyph;
pub mod parser;
pub mod primitives;
pub mod value;

pub use definition::{ArgKind, ArgSpec, ArgumentDef, FlagDef};
pub use glyph::{Glyph, ParsedEmoji, ParsedEmote};
pub use parser::ArgParser;
pub use value::{ArgValue, ParsedArgs};
