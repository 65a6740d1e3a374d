//! Command-line front end for the `tern` agent.
//!
//! # Features
//!
//! - Single-shot mode (`--prompt`) printing only the final answer
//! - Line-based REPL sharing one transcript across turns
//! - Debug hook printing tool activity to stderr
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=xxx cargo run -p tern-cli -- --workspace ./ws
//! OPENAI_API_KEY=xxx cargo run -p tern-cli -- --prompt "Create hello.py" --quiet
//! DEEPSEEK_API_KEY=xxx cargo run -p tern-cli -- --provider deepseek
//! ```

mod hook;
mod provider;

pub use hook::DebugHook;
pub use provider::Provider;
