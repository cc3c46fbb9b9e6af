//! qdist Hardware Abstraction Layer
//!
//! A uniform interface between the swap-test estimator and whatever samples
//! its circuits: the local simulator, a remote device, or a test stub.
//!
//! - [`Backend`] trait for job submission and management
//! - [`Capabilities`] describing qubit count, gate set and shot limits
//! - [`Counts`] and [`ExecutionResult`] for measurement statistics
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use qdist_hal::{
//!     Backend, Capabilities, ExecutionResult, HalResult, JobId, JobStatus, ValidationResult,
//! };
//! use qdist_ir::Circuit;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::check(&self.capabilities, circuit))
//!     }
//!
//!     async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
//!         # todo!()
//!     }
//!
//!     async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
//!         # todo!()
//!     }
//!
//!     async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//!
//!     async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, MAX_POLLS, POLL_INTERVAL, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
