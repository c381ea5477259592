pub mod controller;
pub mod loop_worker;
pub mod scan;

pub use controller::IngestController;
pub use loop_worker::{ScanJob, ScanState};
pub use scan::{list_measurement_files, scan_once};
