pub mod commands;
pub mod render;
pub mod state;
pub mod submit;

// Re-export the entry points the binary needs to parse and dispatch a command.
pub use commands::{run, Cli, Outcome};
pub use state::AppState;
pub use submit::{submit_intake, Submission};
