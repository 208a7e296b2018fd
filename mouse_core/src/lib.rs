// mouse_core/src/lib.rs

// The pure simulation/control kernel. Nothing in here owns a clock, a window
// or a serial port; the driver crate feeds time and bytes in.
pub mod config;
pub mod controller;
pub mod corridor;
pub mod episode;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod link;
pub mod prelude;
pub mod sensor;
pub mod simulation;
