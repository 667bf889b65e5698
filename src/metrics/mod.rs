//! Metrics collection and snapshot data structures.
//!
//! This module provides the collection side of the dashboard: querying the
//! CUPS print queue via `lpstat`, the host IP address, CPU load, and the
//! thermal sensors, and bundling the results into an immutable snapshot.

pub mod collector;
pub mod data;

// Re-export commonly used items
pub use collector::MetricsCollector;
pub use data::DashboardSnapshot;
