//! Detector pipeline orchestration

pub mod detector_dag;

pub use detector_dag::{dependency_closure, DetectorDag};
