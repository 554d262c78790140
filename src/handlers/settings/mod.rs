//! Prefix settings commands: `prefixes`, `setprefix`.

pub mod prefixes;
pub mod setprefix;

pub use prefixes::PrefixesHandler;
pub use setprefix::SetPrefixHandler;

/// Inline-code list of prefixes joined by `sep`.
fn format_prefixes(prefixes: &[String], sep: &str) -> String {
    format!("`{}`", prefixes.join(&format!("`{sep}`")))
}
