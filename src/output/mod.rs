mod styling;
mod summary;

pub use summary::print_summary;

use styling::{dim, magenta_bold};

/// Prints the `CIGate` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚦 CIGate"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI Build Gate")
    );
}
