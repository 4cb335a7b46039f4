//! Relatime CLI - Relative date display and auto-update in the terminal
//!
//! This is a thin wrapper around relatime-core that builds the executable.
//! It keeps an in-memory page of rendered fragments and relays tokio timer
//! ticks into the engine's refresh passes. Hosts with a real document can
//! use relatime-core directly and plug in their own element source.

mod repl;
mod tokio_scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    repl::run_repl().await
}
