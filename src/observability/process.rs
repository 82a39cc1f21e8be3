//! Process-level default metrics.
//!
//! # Responsibilities
//! - Sample memory, CPU, start time and open descriptors of this process
//! - Sample tokio runtime worker and task counts
//! - Measure scheduler lag with a background sampler
//!
//! # Design Decisions
//! - Memory/CPU/fds are refreshed at scrape time, not on a timer
//! - Scheduler lag needs continuous sampling, so it runs as its own task

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sysinfo::{Pid, System};
use tokio::sync::broadcast;

use crate::lifecycle::ShutdownReason;
use crate::observability::metrics::{GatewayMetrics, MetricsError};

/// Tokio runtime counters.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeSnapshot {
    pub workers: usize,
    pub alive_tasks: usize,
}

/// One sample of process metrics.
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pub resident_memory_bytes: u64,
    pub virtual_memory_bytes: u64,
    pub cpu_usage_percent: f32,
    pub start_time_seconds: u64,
    pub open_fds: Option<usize>,
    pub runtime: Option<RuntimeSnapshot>,
}

/// Reads process statistics through sysinfo.
pub struct ProcessCollector {
    system: Mutex<System>,
    pid: Result<Pid, &'static str>,
}

impl ProcessCollector {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid(),
        }
    }

    pub fn collect(&self) -> Result<ProcessSnapshot, MetricsError> {
        let pid = self.pid.map_err(|e| MetricsError::Process(e.to_string()))?;

        let mut system = self
            .system
            .lock()
            .map_err(|_| MetricsError::Process("process collector lock poisoned".to_string()))?;

        if !system.refresh_process(pid) {
            return Err(MetricsError::Process(format!("process {pid} not found")));
        }
        let process = system
            .process(pid)
            .ok_or_else(|| MetricsError::Process(format!("process {pid} not found")))?;

        Ok(ProcessSnapshot {
            resident_memory_bytes: process.memory(),
            virtual_memory_bytes: process.virtual_memory(),
            cpu_usage_percent: process.cpu_usage(),
            start_time_seconds: process.start_time(),
            open_fds: count_open_fds(),
            runtime: runtime_snapshot(),
        })
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "linux")]
fn count_open_fds() -> Option<usize> {
    std::fs::read_dir("/proc/self/fd")
        .ok()
        .map(|entries| entries.count())
}

#[cfg(not(target_os = "linux"))]
fn count_open_fds() -> Option<usize> {
    None
}

fn runtime_snapshot() -> Option<RuntimeSnapshot> {
    let handle = tokio::runtime::Handle::try_current().ok()?;
    let metrics = handle.metrics();
    Some(RuntimeSnapshot {
        workers: metrics.num_workers(),
        alive_tasks: metrics.num_alive_tasks(),
    })
}

/// Periodically measures how late the runtime wakes a sleeping task.
pub struct LagSampler {
    metrics: Arc<GatewayMetrics>,
    interval: Duration,
}

impl LagSampler {
    pub fn new(metrics: Arc<GatewayMetrics>, interval: Duration) -> Self {
        Self { metrics, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<ShutdownReason>) {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "Scheduler lag sampler starting");

        loop {
            let started = Instant::now();
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let lag = started.elapsed().saturating_sub(self.interval);
                    self.metrics.record_scheduler_lag(lag);
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Scheduler lag sampler received shutdown signal");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_current_process() {
        let snapshot = ProcessCollector::new().collect().unwrap();
        assert!(snapshot.resident_memory_bytes > 0);
        assert!(snapshot.start_time_seconds > 0);
        let runtime = snapshot.runtime.unwrap();
        assert!(runtime.workers >= 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_open_fds_counted() {
        assert!(count_open_fds().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_lag_sampler_stops_on_shutdown() {
        let metrics = Arc::new(GatewayMetrics::new("main-api").unwrap());
        let (tx, rx) = broadcast::channel(1);
        let sampler = LagSampler::new(metrics.clone(), Duration::from_millis(10));
        let task = tokio::spawn(sampler.run(rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(ShutdownReason::Requested).unwrap();
        task.await.unwrap();

        assert!(metrics.render().unwrap().contains("runtime_scheduler_lag_seconds"));
    }
}
