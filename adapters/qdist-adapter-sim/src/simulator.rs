//! In-process backend over the statevector engine.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use qdist_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, Job, JobId, JobStatus, ValidationResult,
};
use qdist_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

const DEFAULT_MAX_QUBITS: u32 = 20;

/// Finished jobs kept for `status`/`result` lookups.
pub const DEFAULT_JOB_RETENTION: usize = 1024;

/// A job and, once it has run, its counts.
struct SimJob {
    /// Submission order, used to evict the oldest finished jobs first.
    seq: u64,
    job: Job,
    result: Option<ExecutionResult>,
}

/// Shot-sampling statevector simulator.
///
/// Evolves the statevector once per job and draws every shot from the final
/// Born distribution. Measurements must be terminal. Outcome keys have one
/// character per classical bit, clbit 0 first; a circuit without
/// measurements reports every qubit, qubit 0 first.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    /// Recent jobs by id. Beyond `job_retention` entries the oldest
    /// finished jobs are dropped.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    job_retention: usize,
    next_seq: AtomicU64,
    /// Shot sampler; seeded runs are reproducible.
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// A simulator named `simulator` with 20 qubits and an entropy seed.
    pub fn new() -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, None)
    }

    /// Same as [`new`](Self::new) with a different qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(BackendConfig::new("simulator"), max_qubits, None)
    }

    /// Reseed the shot sampler.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Keep at most `retention` finished jobs; older ones report
    /// [`HalError::JobNotFound`]. Clamped to at least one.
    #[must_use]
    pub fn with_job_retention(self, retention: usize) -> Self {
        Self {
            job_retention: retention.max(1),
            ..self
        }
    }

    fn build(config: BackendConfig, max_qubits: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut capabilities = Capabilities::simulator(max_qubits);
        capabilities.name.clone_from(&config.name);

        Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            job_retention: DEFAULT_JOB_RETENTION,
            next_seq: AtomicU64::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Evolve once, then draw `shots` outcomes and tally them per clbit string.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();

        let mut sv = Statevector::new(circuit.num_qubits());
        let mut readout: Vec<Option<usize>> = vec![None; circuit.num_clbits()];

        for inst in circuit.instructions() {
            if inst.is_measure() {
                readout[inst.clbits[0].0 as usize] = Some(inst.qubits[0].0 as usize);
            } else {
                sv.apply(inst);
            }
        }

        if readout.iter().all(Option::is_none) {
            readout = (0..sv.num_qubits()).map(Some).collect();
        }

        let outcomes = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            sv.sample_many(shots, &mut *rng)?
        };

        let mut tally: FxHashMap<usize, u64> = FxHashMap::default();
        for outcome in outcomes {
            *tally.entry(outcome).or_insert(0) += 1;
        }

        let counts = Counts::from_pairs(
            tally
                .into_iter()
                .map(|(outcome, n)| (bitstring(outcome, &readout), n)),
        );

        let elapsed = start.elapsed();
        debug!(?elapsed, "sampling finished");

        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64))
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the limit of {}",
                self.capabilities.max_shots
            )));
        }
        Ok(())
    }
}

/// Drop the oldest finished jobs until at most `keep` remain.
/// Jobs still queued or running are never dropped.
fn evict_finished(jobs: &mut FxHashMap<String, SimJob>, keep: usize) {
    while jobs.len() > keep {
        let oldest = jobs
            .iter()
            .filter(|(_, j)| j.job.status.is_terminal())
            .min_by_key(|(_, j)| j.seq)
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                debug!(job = %id, "evicted");
                jobs.remove(&id);
            }
            None => break,
        }
    }
}

/// Render a basis-state index as a clbit string. Unmeasured clbits read 0.
fn bitstring(outcome: usize, readout: &[Option<usize>]) -> String {
    readout
        .iter()
        .map(|q| match q {
            Some(q) if (outcome >> q) & 1 == 1 => '1',
            _ => '0',
        })
        .collect()
}

/// Reasons a circuit applies operations to already-measured qubits.
fn mid_circuit_measurements(circuit: &Circuit) -> Vec<String> {
    let mut measured = FxHashSet::default();
    let mut reasons = Vec::new();
    for inst in circuit.instructions() {
        match inst.kind {
            InstructionKind::Measure => {
                measured.insert(inst.qubits[0]);
            }
            InstructionKind::Barrier => {}
            _ => {
                if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                    reasons.push(format!("{} acts on {q} after it was measured", inst.name()));
                }
            }
        }
    }
    reasons
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::check(&self.capabilities, circuit)
            .with_reasons(mid_circuit_measurements(circuit)))
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_shots(shots)?;

        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "{} qubits requested, limit is {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }

        if let ValidationResult::Invalid { reasons } = self.validate(circuit).await? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.config.name.clone());

        {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            jobs.insert(
                job_id.0.clone(),
                SimJob {
                    seq,
                    job,
                    result: None,
                },
            );
            evict_finished(&mut jobs, self.job_retention);
        }

        debug!(job = %job_id, "accepted");

        // Executes inline; the job is already terminal when submit returns.
        let outcome = self.run_simulation(circuit, shots);

        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.job.transition(JobStatus::Running);
                match outcome {
                    Ok(result) => {
                        sim_job.job.transition(JobStatus::Completed);
                        sim_job.result = Some(result);
                    }
                    Err(e) => {
                        warn!(job = %job_id, error = %e, "simulation failed");
                        sim_job.job.transition(JobStatus::Failed(e.to_string()));
                    }
                }
                if let Some(took) = sim_job.job.turnaround() {
                    debug!(
                        job = %job_id,
                        ms = took.num_milliseconds(),
                        status = %sim_job.job.status,
                        "job finished"
                    );
                }
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (status, _) => Err(HalError::JobFailed(format!(
                "result requested for job {job_id} in state {status}"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            sim_job.job.transition(JobStatus::Cancelled);
            Ok(())
        } else {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra.get("max_qubits") {
            None => DEFAULT_MAX_QUBITS,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    HalError::Configuration(format!("max_qubits must be a positive integer, got {v}"))
                })?,
        };

        let seed = match config.extra.get("seed") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(v.as_u64().ok_or_else(|| {
                HalError::Configuration(format!("seed must be a non-negative integer, got {v}"))
            })?),
        };

        Ok(Self::build(config, max_qubits, seed))
    }
}
