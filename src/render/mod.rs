//! Frame rendering: snapshot + configuration -> pixels.
//!
//! Rendering is a total, deterministic function. Fonts are the compiled-in
//! `embedded-graphics` mono fonts, text that does not fit its region is
//! hard-clipped at a character boundary, and absent values render as the
//! fixed [`PLACEHOLDER`] string. Identical inputs always produce
//! byte-identical frames.

mod frame;
mod layout;

pub use frame::Frame;
pub use layout::{palette, Layout};

use crate::config::Config;
use crate::metrics::data::{DashboardSnapshot, PrinterState, QueueJob};
use chrono::Timelike;
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10, FONT_9X15_BOLD};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use layout::{FOOTER_HEIGHT, JOB_ROW_HEIGHT, PADDING};

/// Fixed placeholder for unavailable values.
pub const PLACEHOLDER: &str = "--";

/// Render one dashboard frame of exactly `config.width x config.height`.
pub fn render(snapshot: &DashboardSnapshot, config: &Config) -> Frame {
    let mut frame = Frame::new(config.width, config.height, palette::BACKGROUND);
    let layout = Layout::new(config.width, config.height);

    draw_header(&mut frame, &layout, snapshot);
    draw_status(&mut frame, &layout, snapshot);
    draw_jobs(&mut frame, &layout, snapshot);
    draw_footer(&mut frame, &layout, snapshot);

    frame
}

/// Header band: printer name over an accent rule.
fn draw_header(frame: &mut Frame, layout: &Layout, snapshot: &DashboardSnapshot) {
    let title = snapshot.printer.name.as_deref().unwrap_or("Printer");
    let title = clip_line(title, max_chars(frame.width(), FONT_10X20.character_size.width));
    draw_text(
        frame,
        &title,
        Point::new(PADDING, layout.header.top_left.y + 12),
        MonoTextStyle::new(&FONT_10X20, palette::FOREGROUND),
    );

    let rule_y = layout.header.top_left.y + layout.header.size.height as i32 - 6;
    fill_rect(
        frame,
        Rectangle::new(
            Point::new(PADDING, rule_y),
            Size::new(frame.width().saturating_sub(2 * PADDING as u32), 2),
        ),
        palette::ACCENT,
    );
}

/// Status band: state word, detail line, and the current job.
fn draw_status(frame: &mut Frame, layout: &Layout, snapshot: &DashboardSnapshot) {
    let top = layout.status.top_left.y;
    let state = snapshot.printer.state;
    draw_text(
        frame,
        &state.to_string(),
        Point::new(PADDING, top + 6),
        MonoTextStyle::new(&FONT_9X15_BOLD, state_color(state)),
    );

    let small = MonoTextStyle::new(&FONT_6X10, palette::MUTED);
    let width_chars = max_chars(frame.width(), FONT_6X10.character_size.width);
    if !snapshot.printer.detail.is_empty() {
        draw_text(
            frame,
            &clip_line(&snapshot.printer.detail, width_chars),
            Point::new(PADDING, top + 26),
            small,
        );
    }
    if let Some(line) = current_job_line(snapshot) {
        draw_text(
            frame,
            &clip_line(&line, width_chars),
            Point::new(PADDING, top + 42),
            small,
        );
    }
}

/// Job list band: one line per pending job, with an overflow count.
fn draw_jobs(frame: &mut Frame, layout: &Layout, snapshot: &DashboardSnapshot) {
    let region = &layout.jobs;
    let rows = (region.size.height / JOB_ROW_HEIGHT) as usize;
    if rows == 0 {
        return;
    }

    let dim = MonoTextStyle::new(&FONT_6X10, palette::DIM);
    if snapshot.queue_jobs.is_empty() {
        draw_text(
            frame,
            "Queue is empty",
            Point::new(PADDING, region.top_left.y + 2),
            dim,
        );
        return;
    }

    let width_chars = max_chars(frame.width(), FONT_6X10.character_size.width);
    let style = MonoTextStyle::new(&FONT_6X10, palette::FOREGROUND);
    let visible = if snapshot.queue_jobs.len() > rows {
        rows.saturating_sub(1)
    } else {
        snapshot.queue_jobs.len()
    };
    for (row, job) in snapshot.queue_jobs.iter().take(visible).enumerate() {
        let y = region.top_left.y + 2 + (row as u32 * JOB_ROW_HEIGHT) as i32;
        draw_text(
            frame,
            &clip_line(&job_line(job), width_chars),
            Point::new(PADDING, y),
            style,
        );
    }

    let hidden = snapshot.queue_jobs.len() - visible;
    if hidden > 0 {
        let y = region.top_left.y + 2 + (visible as u32 * JOB_ROW_HEIGHT) as i32;
        draw_text(frame, &format!("(+{} more)", hidden), Point::new(PADDING, y), dim);
    }
}

/// Footer band: heartbeat dot, system metrics line, right-aligned clock.
fn draw_footer(frame: &mut Frame, layout: &Layout, snapshot: &DashboardSnapshot) {
    let region = &layout.footer;
    if region.size.height == 0 {
        return;
    }
    let text_y = region.top_left.y + (FOOTER_HEIGHT as i32 / 2) - 5;

    // Heartbeat dot flips with the snapshot's seconds parity
    let beat = snapshot.collected_at.second() % 2 == 0;
    let dot_color = if beat { palette::ACCENT } else { palette::DIM };
    let _ = Circle::new(Point::new(PADDING, text_y), 10)
        .into_styled(PrimitiveStyle::with_fill(dot_color))
        .draw(frame);

    let glyph_width = FONT_6X10.character_size.width as i32;
    let updated = format!("Updated {}", snapshot.collected_at.format("%H:%M:%S"));
    let updated_width = updated.chars().count() as i32 * glyph_width;
    let clock_x = frame.width() as i32 - PADDING - updated_width;
    draw_text(
        frame,
        &updated,
        Point::new(clock_x, text_y),
        MonoTextStyle::new(&FONT_6X10, palette::DIM),
    );

    // Metrics line fills the space between the dot and the clock
    let metrics_x = PADDING + 18;
    let available = (clock_x - metrics_x - 8).max(0) as usize / glyph_width as usize;
    draw_text(
        frame,
        &clip_line(&footer_line(snapshot), available),
        Point::new(metrics_x, text_y),
        MonoTextStyle::new(&FONT_6X10, palette::MUTED),
    );
}

/// State word color: idle blue, printing amber, stopped red, unknown grey.
fn state_color(state: PrinterState) -> Rgb888 {
    match state {
        PrinterState::Idle => palette::ACCENT,
        PrinterState::Printing => palette::WARN,
        PrinterState::Stopped => palette::ERROR,
        PrinterState::Unknown => palette::DIM,
    }
}

/// `Current: <owner>: <title>` for the first queued job.
pub(crate) fn current_job_line(snapshot: &DashboardSnapshot) -> Option<String> {
    snapshot
        .queue_jobs
        .first()
        .map(|job| format!("Current: {}: {}", job.owner, job.title))
}

/// One job list row: `<id>  <title>  <size>`.
pub(crate) fn job_line(job: &QueueJob) -> String {
    format!(
        "{}  {}  {}",
        job.id,
        job.title,
        format_size(job.size_bytes)
    )
}

/// Footer metrics line with placeholders for absent values.
pub(crate) fn footer_line(snapshot: &DashboardSnapshot) -> String {
    let ip = snapshot.network_ip.as_deref().unwrap_or(PLACEHOLDER);
    let temp = snapshot
        .temperature_c
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!(
        "Jobs {}  CUPS {}  IP {}  CPU {:.0}%  {}",
        snapshot.queue_jobs.len(),
        snapshot.scheduler,
        ip,
        snapshot.cpu_load,
        temp
    )
}

/// Hard-clip a line to a character budget. No ellipsis; mono fonts make the
/// budget exact.
pub(crate) fn clip_line(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Fixed-precision human size for the job list.
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{} kB", bytes / 1024)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn max_chars(width: u32, char_width: u32) -> usize {
    ((width as i64 - 2 * PADDING as i64).max(0) as u32 / char_width) as usize
}

/// Draw text at a position; the in-memory frame cannot fail.
fn draw_text(frame: &mut Frame, text: &str, position: Point, style: MonoTextStyle<'_, Rgb888>) {
    let _ = Text::with_baseline(text, position, style, Baseline::Top).draw(frame);
}

fn fill_rect(frame: &mut Frame, rect: Rectangle, color: Rgb888) {
    let _ = rect
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(frame);
}
