// mouse_sim/src/lib.rs

// The headless driver around `mouse_core`: scenario loading, the CLI, the
// fixed-step runner and the serial link to real hardware.
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod serial;
