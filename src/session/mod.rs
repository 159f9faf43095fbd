//! Top-level session: the current screen, overlays, and the components
//! that run behind the camera screen.

pub mod controller;
pub mod model;

pub use controller::{SessionConfig, SessionController, SessionDeps};
pub use model::{CameraView, ModalKind, ModalVisibility, Screen, Session, SessionUpdate};
