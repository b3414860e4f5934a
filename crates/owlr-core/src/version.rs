/// Crate version, taken from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable version line for CLI output.
#[must_use]
pub fn version_string() -> String {
    format!("owlr {VERSION}")
}
