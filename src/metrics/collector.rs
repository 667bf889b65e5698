//! Core metrics collection implementation.
//!
//! All external data enters the dashboard through this module: the CUPS
//! queue/status listings (`lpstat`), the host IP address (`hostname -I`),
//! aggregate CPU load (sysinfo) and the CPU temperature (sysfs thermal zone,
//! with a `vcgencmd` fallback on Raspberry Pi). Every source is guarded
//! independently: a missing command or unreadable file degrades that one
//! field to its sentinel value and never fails the snapshot as a whole.

use crate::config::Config;
use crate::metrics::data::*;
use chrono::Local;
use std::fs;
use std::process::{Command, Stdio};
use sysinfo::System;
use tracing::debug;

/// Primary CPU temperature sensor on Raspberry Pi class hardware.
const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Dashboard metrics collector using `lpstat`, sysinfo and direct sysfs access.
///
/// The collector owns a persistent [`System`] handle so that CPU usage can be
/// computed as a delta between refreshes; everything else is queried fresh on
/// every [`collect`](Self::collect) call.
pub struct MetricsCollector {
    system: System,
}

impl MetricsCollector {
    /// Create a new collector instance.
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the CPU counters so the first collect has a usable delta.
        system.refresh_cpu_usage();
        Self { system }
    }

    /// Take one complete snapshot. Never fails; unreadable sources fall back
    /// to their sentinel values.
    pub fn collect(&mut self, config: &Config) -> DashboardSnapshot {
        let printer_filter = config.printer.as_deref();
        DashboardSnapshot {
            queue_jobs: self.collect_queue_jobs(printer_filter),
            printer: self.collect_printer_status(printer_filter),
            scheduler: self.collect_scheduler_status(),
            network_ip: self.collect_network_ip(),
            cpu_load: self.collect_cpu_load(),
            temperature_c: self.collect_temperature(),
            collected_at: Local::now(),
        }
    }

    /// List pending jobs via `lpstat -o`, optionally filtered to one printer.
    fn collect_queue_jobs(&self, printer: Option<&str>) -> Vec<QueueJob> {
        match command_stdout("lpstat", &["-o"]) {
            Some(output) => parse_queue_jobs(&output, printer),
            None => {
                debug!("lpstat -o unavailable, reporting an empty queue");
                Vec::new()
            }
        }
    }

    /// Resolve the printer state line via `lpstat -p`.
    fn collect_printer_status(&self, printer: Option<&str>) -> PrinterStatus {
        match command_stdout("lpstat", &["-p"]) {
            Some(output) => parse_printer_status(&output, printer),
            None => {
                debug!("lpstat -p unavailable, printer state unknown");
                PrinterStatus::default()
            }
        }
    }

    /// Probe scheduler liveness: `lpstat -r`, then `systemctl is-active cups`.
    fn collect_scheduler_status(&self) -> SchedulerStatus {
        if let Some(output) = command_stdout("lpstat", &["-r"]) {
            let status = parse_lpstat_scheduler(&output);
            if status != SchedulerStatus::Unknown {
                return status;
            }
        }
        match command_stdout("systemctl", &["is-active", "cups"]) {
            Some(output) => parse_systemctl_active(&output),
            None => SchedulerStatus::Unknown,
        }
    }

    /// First IPv4 address reported by `hostname -I`.
    fn collect_network_ip(&self) -> Option<String> {
        let output = command_stdout("hostname", &["-I"])?;
        first_ipv4(&output)
    }

    /// Aggregate CPU load as the mean over all cores, clamped to 0..100.
    fn collect_cpu_load(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return 0.0;
        }
        let mean = cpus.iter().map(|cpu| cpu.cpu_usage()).sum::<f32>() / cpus.len() as f32;
        mean.clamp(0.0, 100.0)
    }

    /// CPU temperature from sysfs, falling back to `vcgencmd measure_temp`.
    fn collect_temperature(&self) -> Option<f32> {
        if let Some(temp) = fs::read_to_string(THERMAL_ZONE_PATH)
            .ok()
            .and_then(|raw| parse_thermal_millidegrees(&raw))
        {
            return Some(temp);
        }
        command_stdout("vcgencmd", &["measure_temp"])
            .and_then(|output| parse_vcgencmd_temp(&output))
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a command and capture stdout, regardless of exit status.
///
/// `lpstat` and `systemctl` report interesting states through non-zero exits
/// (scheduler down, unit inactive), so the exit code is deliberately ignored;
/// only a failure to spawn the process counts as "source unavailable".
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program)
        .args(args)
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        Err(err) => {
            debug!(program, error = %err, "failed to spawn metrics command");
            None
        }
    }
}

/// Parse `lpstat -o` output into job descriptors.
///
/// Lines look like `Brother_HL-42  root  1024  Tue 06 Aug 2024 ...`; the
/// first column is `<printer>-<job number>`, then the owner and the size in
/// bytes. The title is best-effort from the trailing columns (CUPS does not
/// expose the document name here). With a filter, only exact printer-name
/// matches are kept, preserving the listing order.
pub(crate) fn parse_queue_jobs(output: &str, printer: Option<&str>) -> Vec<QueueJob> {
    let mut jobs = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let id = tokens[0];
        let Some((printer_name, _job_number)) = id.rsplit_once('-') else {
            continue;
        };
        if let Some(filter) = printer {
            if printer_name != filter {
                continue;
            }
        }
        let owner = tokens.get(1).copied().unwrap_or("?").to_string();
        let size_bytes = tokens.get(2).and_then(|t| t.parse().ok()).unwrap_or(0);
        let title = if tokens.len() > 3 {
            tokens[3..].join(" ")
        } else {
            owner.clone()
        };
        jobs.push(QueueJob {
            id: id.to_string(),
            printer: printer_name.to_string(),
            owner,
            title,
            size_bytes,
        });
    }
    jobs
}

/// Parse `lpstat -p` output into a printer status.
///
/// Recognized line shapes:
/// - `printer NAME is idle.  enabled since ...`
/// - `printer NAME now printing NAME-42.  enabled since ...`
/// - `printer NAME disabled since ...`
pub(crate) fn parse_printer_status(output: &str, printer: Option<&str>) -> PrinterStatus {
    for line in output.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("printer ") else {
            continue;
        };
        let mut parts = rest.splitn(2, char::is_whitespace);
        let Some(name) = parts.next().filter(|n| !n.is_empty()) else {
            continue;
        };
        if let Some(filter) = printer {
            if name != filter {
                continue;
            }
        }
        let remainder = parts.next().unwrap_or("").trim();
        let sentence = remainder.split('.').next().unwrap_or("").trim();
        let lower = sentence.to_ascii_lowercase();
        let state = if lower.contains("printing") {
            PrinterState::Printing
        } else if lower.contains("idle") {
            PrinterState::Idle
        } else if lower.contains("disabled") || lower.contains("stopped") || lower.contains("paused")
        {
            PrinterState::Stopped
        } else {
            PrinterState::Unknown
        };
        let detail = remainder
            .split_once('.')
            .map(|(_, tail)| tail.trim())
            .filter(|tail| !tail.is_empty())
            .unwrap_or(sentence)
            .to_string();
        return PrinterStatus {
            name: Some(name.to_string()),
            state,
            detail,
        };
    }
    PrinterStatus::default()
}

/// Parse `lpstat -r` output ("scheduler is running" / "scheduler is not running").
pub(crate) fn parse_lpstat_scheduler(output: &str) -> SchedulerStatus {
    let lower = output.trim().to_ascii_lowercase();
    if lower.contains("not") {
        SchedulerStatus::Stopped
    } else if lower.contains("running") {
        SchedulerStatus::Running
    } else {
        SchedulerStatus::Unknown
    }
}

/// Parse `systemctl is-active cups` output.
pub(crate) fn parse_systemctl_active(output: &str) -> SchedulerStatus {
    match output.trim() {
        "active" | "activating" => SchedulerStatus::Running,
        "inactive" | "failed" | "deactivating" => SchedulerStatus::Stopped,
        _ => SchedulerStatus::Unknown,
    }
}

/// Pick the first IPv4 address from `hostname -I` output, falling back to
/// the first address of any family.
pub(crate) fn first_ipv4(output: &str) -> Option<String> {
    let mut first = None;
    for token in output.split_whitespace() {
        if first.is_none() {
            first = Some(token);
        }
        if !token.contains(':') {
            return Some(token.to_string());
        }
    }
    first.map(str::to_string)
}

/// Parse a sysfs thermal zone reading (millidegrees Celsius).
pub(crate) fn parse_thermal_millidegrees(raw: &str) -> Option<f32> {
    raw.trim().parse::<i32>().ok().map(|v| v as f32 / 1000.0)
}

/// Parse `vcgencmd measure_temp` output (`temp=45.2'C`).
pub(crate) fn parse_vcgencmd_temp(raw: &str) -> Option<f32> {
    raw.trim()
        .strip_prefix("temp=")?
        .strip_suffix("'C")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE_LISTING: &str = "\
Alpha-1                 alice             2048   Tue 06 Aug 2024 10:15:00 AM UTC
Beta-2                  bob               1024   Tue 06 Aug 2024 10:16:00 AM UTC
Alpha-3                 carol              512   Tue 06 Aug 2024 10:17:00 AM UTC
";

    #[test]
    fn queue_jobs_preserve_listing_order() {
        let jobs = parse_queue_jobs(QUEUE_LISTING, None);
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].id, "Alpha-1");
        assert_eq!(jobs[1].id, "Beta-2");
        assert_eq!(jobs[2].id, "Alpha-3");
        assert_eq!(jobs[0].owner, "alice");
        assert_eq!(jobs[0].size_bytes, 2048);
    }

    #[test]
    fn printer_filter_keeps_exact_matches_in_relative_order() {
        let jobs = parse_queue_jobs(QUEUE_LISTING, Some("Alpha"));
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "Alpha-1");
        assert_eq!(jobs[1].id, "Alpha-3");
        assert!(jobs.iter().all(|j| j.printer == "Alpha"));
    }

    #[test]
    fn printer_filter_is_exact_not_prefix() {
        let listing = "Alpha-1 alice 100\nAlphaTwo-2 bob 100\n";
        let jobs = parse_queue_jobs(listing, Some("Alpha"));
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].printer, "Alpha");
    }

    #[test]
    fn malformed_queue_lines_are_skipped() {
        let listing = "garbage\n\nAlpha-1 alice notasize\n";
        let jobs = parse_queue_jobs(listing, None);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].size_bytes, 0);
    }

    #[test]
    fn idle_printer_line_parses() {
        let output = "printer Alpha is idle.  enabled since Tue 06 Aug 2024\n";
        let status = parse_printer_status(output, None);
        assert_eq!(status.name.as_deref(), Some("Alpha"));
        assert_eq!(status.state, PrinterState::Idle);
        assert_eq!(status.detail, "enabled since Tue 06 Aug 2024");
    }

    #[test]
    fn printing_printer_line_parses() {
        let output = "printer Alpha now printing Alpha-42.  enabled since Tue\n";
        let status = parse_printer_status(output, None);
        assert_eq!(status.state, PrinterState::Printing);
    }

    #[test]
    fn disabled_printer_line_parses() {
        let output = "printer Alpha disabled since Tue 06 Aug 2024 -\n";
        let status = parse_printer_status(output, None);
        assert_eq!(status.state, PrinterState::Stopped);
    }

    #[test]
    fn printer_status_honors_filter() {
        let output = "\
printer Alpha is idle.  enabled since Tue
printer Beta now printing Beta-7.  enabled since Tue
";
        let status = parse_printer_status(output, Some("Beta"));
        assert_eq!(status.name.as_deref(), Some("Beta"));
        assert_eq!(status.state, PrinterState::Printing);
    }

    #[test]
    fn missing_printer_yields_default_status() {
        let status = parse_printer_status("no printers configured\n", None);
        assert_eq!(status, PrinterStatus::default());
        assert_eq!(status.state, PrinterState::Unknown);
    }

    #[test]
    fn scheduler_states_parse() {
        assert_eq!(
            parse_lpstat_scheduler("scheduler is running\n"),
            SchedulerStatus::Running
        );
        assert_eq!(
            parse_lpstat_scheduler("scheduler is not running\n"),
            SchedulerStatus::Stopped
        );
        assert_eq!(parse_lpstat_scheduler(""), SchedulerStatus::Unknown);
        assert_eq!(parse_systemctl_active("active\n"), SchedulerStatus::Running);
        assert_eq!(
            parse_systemctl_active("inactive\n"),
            SchedulerStatus::Stopped
        );
        assert_eq!(parse_systemctl_active("weird"), SchedulerStatus::Unknown);
    }

    #[test]
    fn first_ipv4_skips_ipv6_addresses() {
        let out = "fe80::1 192.168.1.10 10.0.0.2\n";
        assert_eq!(first_ipv4(out).as_deref(), Some("192.168.1.10"));
    }

    #[test]
    fn first_ipv4_falls_back_to_any_address() {
        assert_eq!(first_ipv4("fe80::1\n").as_deref(), Some("fe80::1"));
        assert_eq!(first_ipv4("  \n"), None);
    }

    #[test]
    fn thermal_readings_parse() {
        assert_eq!(parse_thermal_millidegrees("45230\n"), Some(45.23));
        assert_eq!(parse_thermal_millidegrees("bogus"), None);
        assert_eq!(parse_vcgencmd_temp("temp=45.2'C\n"), Some(45.2));
        assert_eq!(parse_vcgencmd_temp("temp=45.2"), None);
    }

    #[test]
    fn collect_never_fails_without_data_sources() {
        // On a host without CUPS every source degrades to its sentinel; the
        // snapshot must still come back complete.
        let config = crate::config::Config {
            printer: Some("NoSuchPrinterAnywhere".to_string()),
            ..Default::default()
        };
        let mut collector = MetricsCollector::new();
        let snapshot = collector.collect(&config);
        assert!((0.0..=100.0).contains(&snapshot.cpu_load));
        assert!(snapshot
            .queue_jobs
            .iter()
            .all(|j| j.printer == "NoSuchPrinterAnywhere"));
    }
}
