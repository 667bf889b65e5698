//! Fixed region layout and color palette.
//!
//! The dashboard is split into four horizontal bands: header, printer status,
//! job list, and footer. Region rectangles depend only on the configured
//! canvas size, so layout is fully deterministic.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Dashboard color palette.
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb888;

    /// Deep navy background
    pub const BACKGROUND: Rgb888 = Rgb888::new(12, 17, 27);
    /// Primary text
    pub const FOREGROUND: Rgb888 = Rgb888::new(230, 235, 245);
    /// Accent blue (idle state, heartbeat, header rule)
    pub const ACCENT: Rgb888 = Rgb888::new(62, 136, 248);
    /// Amber (printing state)
    pub const WARN: Rgb888 = Rgb888::new(255, 179, 71);
    /// Red (stopped state)
    pub const ERROR: Rgb888 = Rgb888::new(255, 99, 99);
    /// Secondary text
    pub const MUTED: Rgb888 = Rgb888::new(180, 195, 210);
    /// Tertiary text and inactive heartbeat
    pub const DIM: Rgb888 = Rgb888::new(140, 150, 165);
}

/// Horizontal inset applied to all text.
pub const PADDING: i32 = 16;

/// Header band height in pixels.
pub const HEADER_HEIGHT: u32 = 48;

/// Printer status band height in pixels.
pub const STATUS_HEIGHT: u32 = 64;

/// Footer band height in pixels.
pub const FOOTER_HEIGHT: u32 = 36;

/// Job list row pitch in pixels (FONT_6X10 line plus spacing).
pub const JOB_ROW_HEIGHT: u32 = 13;

/// The four fixed regions of the dashboard.
///
/// On undersized canvases the bands degrade gracefully: regions shrink to
/// zero height rather than overlapping, and the frame clips any overdraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub header: Rectangle,
    pub status: Rectangle,
    pub jobs: Rectangle,
    pub footer: Rectangle,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let footer_top = height.saturating_sub(FOOTER_HEIGHT);
        let header_bottom = HEADER_HEIGHT.min(footer_top);
        let status_bottom = (HEADER_HEIGHT + STATUS_HEIGHT).min(footer_top);
        Self {
            header: band(width, 0, header_bottom),
            status: band(width, header_bottom, status_bottom),
            jobs: band(width, status_bottom, footer_top),
            footer: band(width, footer_top, height),
        }
    }
}

fn band(width: u32, top: u32, bottom: u32) -> Rectangle {
    Rectangle::new(
        Point::new(0, top as i32),
        Size::new(width, bottom.saturating_sub(top)),
    )
}
