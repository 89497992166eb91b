//! Snake risk daemon library - exposes modules for testing.

pub mod config;
pub mod error;
pub mod llm_client;
pub mod middleware;
pub mod narrative;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod scorecard;
