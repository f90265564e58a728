// Declare all modules as public so they can be used by the binary and tests.
pub mod app;
pub mod config;
pub mod core;
pub mod utils;
pub mod web;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Set by the release build through the `DIMANDOCS_BUILD_TIME` environment
/// variable.
pub const BUILD_TIME: &str = match option_env!("DIMANDOCS_BUILD_TIME") {
    Some(time) => time,
    None => "unknown",
};

/// The text printed by `--version`.
pub fn version_text() -> String {
    format!("DimanDocs {VERSION}\nBuild Time: {BUILD_TIME}\n")
}
