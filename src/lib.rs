pub mod config;
pub mod core_types;
pub mod cost;
pub mod domain;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod render;
pub mod scenario;
pub mod solver;
pub mod state;
// cmd and reports are binary modules (see main.rs).
