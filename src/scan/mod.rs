//! Menu scanning: the classifier seam and the timed simulator around it.

pub mod classifier;
pub mod model;
pub mod simulator;

pub use classifier::{Classifier, MenuItem, MockClassifier, SAMPLE_MENU};
pub use model::{Classification, ScanResult};
pub use simulator::{ScanCompletion, ScanSimulator, ScanState};
