// mouse_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::controller::SteeringController;
pub use crate::corridor::Corridor;
pub use crate::link::LinkTransport;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::controller::WheelCommand;
pub use crate::corridor::WallSegment;
pub use crate::episode::{EpisodePhase, EpisodeState};
pub use crate::geometry::Vec2;
pub use crate::kinematics::{DriveStep, RobotPose};
pub use crate::sensor::{RayHit, SensorReading};

// --- Configuration ---
pub use crate::config::{CommandClamp, CourseConfig, SimConfig};

// --- Concrete Implementations (Export common ones for convenience) ---
pub use crate::controller::{CorridorPid, IdleController};
pub use crate::corridor::{build_corridor, LayoutMaze, ObstacleCourse};
pub use crate::kinematics::DifferentialDrive;
pub use crate::link::{FrameDecoder, HardwareController};
pub use crate::sensor::SensorModel;
pub use crate::simulation::{Simulation, TickReport};

// --- Errors ---
pub use crate::error::{CoreError, LinkError};
