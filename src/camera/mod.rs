//! Camera access and stream lifetime.

pub mod device;
pub mod session;
pub mod simulated;

pub use device::{CameraDevice, CameraStream, FacingMode};
pub use session::{Activation, CameraResolution, CameraSession, CameraStatus, CameraUpdate};
pub use simulated::{SimulatedCamera, SimulatedOutcome};
