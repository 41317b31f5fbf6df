//! IMU complementary-fusion simulator
//!
//! Synthesizes a ground-truth pitch/roll/yaw trace, derives noisy gyroscope,
//! accelerometer and magnetometer observations from it, and fuses rate and
//! absolute-angle streams per axis with a single-coefficient complementary
//! filter.

pub mod axis;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod metrics;
pub mod motion;
pub mod noise;
pub mod pipeline;
pub mod sensors;
pub mod time;

// Re-export main types
pub use axis::{Axis, Triad};
pub use config::SimConfig;
pub use error::{FusionError, Result};
pub use filter::{fuse, Alpha, ComplementaryFilter, FusionStrategy};
pub use motion::{generate_motion, MotionConfig, MotionProfile};
pub use noise::NoiseSource;
pub use pipeline::{FusionSession, SimulationRun, SweepPoint};
pub use sensors::{simulate_rate, simulate_reference};
pub use time::TimeBase;
