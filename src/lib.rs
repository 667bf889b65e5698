//! # lpdash - Print Queue Status Dashboard
//!
//! A small daemon that renders the state of a CUPS print queue together with
//! a few host metrics (IP address, CPU load, temperature) to a fixed-layout
//! dashboard frame, refreshed on a polling interval. Frames are delivered to
//! a PNG file or blitted straight to a Linux framebuffer device, which makes
//! it a good fit for the small SPI/HDMI displays commonly attached to
//! single-board computers.
//!
//! ## Design
//!
//! - **Collection**: every refresh, [`MetricsCollector`] queries `lpstat`,
//!   the network stack, and the thermal sensors. Each source is guarded
//!   independently; an unreadable source degrades to a sentinel value and
//!   never aborts the snapshot.
//! - **Rendering**: [`render`] is a pure function from a snapshot and a
//!   configuration to a [`Frame`]. Fonts are compiled in, so identical inputs
//!   always produce byte-identical pixels.
//! - **Output**: a [`FrameSink`](sink::FrameSink) chosen once at startup
//!   writes the frame out; a failed write only loses that iteration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lpdash::{config::Config, metrics::MetricsCollector, render, sink, sink::FrameSink};
//!
//! # fn main() -> lpdash::error::Result<()> {
//! let config = Config::from_env()?;
//! let mut collector = MetricsCollector::new();
//! let mut sink = sink::from_config(&config);
//!
//! let snapshot = collector.collect(&config);
//! let frame = render(&snapshot, &config);
//! sink.present(&frame)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod render;
pub mod sink;

// Re-export public API
pub use config::{Config, DisplayMode};
pub use error::{DashboardError, Result};
pub use metrics::{
    collector::MetricsCollector,
    data::{DashboardSnapshot, PrinterState, PrinterStatus, QueueJob, SchedulerStatus},
};
pub use render::{render, Frame};
pub use sink::{FrameSink, FramebufferSink, PngSink};

/// The default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 480;

/// The default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 320;

/// The default PNG output path
pub const DEFAULT_OUTPUT_PATH: &str = "./build/dashboard.png";

/// The default framebuffer device
pub const DEFAULT_FB_DEVICE: &str = "/dev/fb1";

/// The default refresh interval in seconds
pub const DEFAULT_REFRESH_SECS: f64 = 1.0;
