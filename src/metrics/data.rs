//! Data structures for dashboard metrics.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete snapshot of dashboard metrics at a point in time.
///
/// A snapshot is immutable once constructed and lives for exactly one
/// refresh iteration; the renderer only reads it. Missing data is encoded
/// with sentinel values (`None`, empty lists, `Unknown`) rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Pending jobs, in the order reported by the queue listing
    pub queue_jobs: Vec<QueueJob>,
    /// State of the (possibly filtered) printer
    pub printer: PrinterStatus,
    /// Whether the CUPS scheduler is running
    pub scheduler: SchedulerStatus,
    /// Primary IPv4 address, if any interface is up
    pub network_ip: Option<String>,
    /// Aggregate CPU load percentage (0.0 to 100.0)
    pub cpu_load: f32,
    /// CPU temperature in Celsius, if the sensor is readable
    pub temperature_c: Option<f32>,
    /// Wall-clock time the snapshot was taken (drives the footer clock)
    pub collected_at: DateTime<Local>,
}

impl DashboardSnapshot {
    /// A snapshot with every source at its sentinel value.
    ///
    /// This is what collection degrades to when no data source is readable;
    /// it must still render and sink without issue.
    pub fn empty(collected_at: DateTime<Local>) -> Self {
        Self {
            queue_jobs: Vec::new(),
            printer: PrinterStatus::default(),
            scheduler: SchedulerStatus::Unknown,
            network_ip: None,
            cpu_load: 0.0,
            temperature_c: None,
            collected_at,
        }
    }
}

/// One pending job from the queue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueJob {
    /// Full job identifier as reported by `lpstat -o` (e.g. "Brother_HL-42")
    pub id: String,
    /// Printer name the job is queued on
    pub printer: String,
    /// Submitting user
    pub owner: String,
    /// Job title, best-effort from the trailing listing columns
    pub title: String,
    /// Job size in bytes
    pub size_bytes: u64,
}

/// Enumerated printer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    Idle,
    Printing,
    Stopped,
    #[default]
    Unknown,
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Printing => write!(f, "printing"),
            Self::Stopped => write!(f, "stopped"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Printer state plus the free-text detail from the status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Resolved printer name, if the status listing reported one
    pub name: Option<String>,
    /// Enumerated state
    pub state: PrinterState,
    /// Free-text detail (e.g. "enabled since Mon 01 Jan 2024")
    pub detail: String,
}

impl Default for PrinterStatus {
    fn default() -> Self {
        Self {
            name: None,
            state: PrinterState::Unknown,
            detail: String::new(),
        }
    }
}

/// Liveness of the CUPS scheduler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerStatus {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl fmt::Display for SchedulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
