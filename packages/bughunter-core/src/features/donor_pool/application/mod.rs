//! Donor Pool Application Layer (UseCase)

mod pool_usecase;

pub use pool_usecase::{DonorPoolOutcome, DonorPoolService};
