//! Output sinks: deliver a rendered frame to a PNG file or a framebuffer.
//!
//! The sink is selected once at startup from the configuration; the refresh
//! loop only sees the [`FrameSink`] trait. A failed write is reported as an
//! error for that iteration and the loop carries on.

use crate::config::{Config, DisplayMode};
use crate::error::Result;
use crate::render::Frame;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Destination abstraction for rendered frames.
pub trait FrameSink {
    /// Deliver one frame. Failures are fatal to the current iteration only.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Blank the output on shutdown. Best-effort; the default does nothing.
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Build the sink selected by `config.display_mode`.
pub fn from_config(config: &Config) -> Box<dyn FrameSink> {
    match config.display_mode {
        DisplayMode::Png => Box::new(PngSink::new(config.output_path.clone())),
        DisplayMode::Framebuffer => Box::new(FramebufferSink::new(
            config.fb_device.clone(),
            config.width,
            config.height,
        )),
    }
}

/// Encodes frames as PNG and writes them atomically to a file path.
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FrameSink for PngSink {
    /// Write-to-temp-then-rename so readers of the output path never observe
    /// a half-written file. Parent directories are created as needed.
    fn present(&mut self, frame: &Frame) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("png.tmp");
        {
            let file = fs::File::create(&tmp)?;
            let mut writer = std::io::BufWriter::new(file);
            PngEncoder::new(&mut writer).write_image(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "wrote dashboard frame");
        Ok(())
    }
}

/// Packs frames to RGB565 and writes them raw to a framebuffer device.
///
/// The canvas is expected to match the device's virtual resolution; the raw
/// buffer is written from the top-left with no line padding, which holds for
/// the small SPI TFT displays this daemon targets.
pub struct FramebufferSink {
    device: PathBuf,
    width: u32,
    height: u32,
}

impl FramebufferSink {
    pub fn new(device: PathBuf, width: u32, height: u32) -> Self {
        Self {
            device,
            width,
            height,
        }
    }

    fn write_raw(&self, bytes: &[u8]) -> Result<()> {
        let mut device = fs::OpenOptions::new().write(true).open(&self.device)?;
        device.write_all(bytes)?;
        device.flush()?;
        Ok(())
    }
}

impl FrameSink for FramebufferSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let packed = pack_rgb565_le(frame.data());
        self.write_raw(&packed)?;
        debug!(device = %self.device.display(), "blitted dashboard frame");
        Ok(())
    }

    /// Blank the panel to black so a stale frame does not linger after exit.
    fn clear(&mut self) -> Result<()> {
        let zeros = vec![0u8; self.width as usize * self.height as usize * 2];
        self.write_raw(&zeros)
    }
}

/// Pack RGB888 pixel data into little-endian RGB565.
///
/// 5 bits red, 6 bits green, 5 bits blue, truncated from the high bits of
/// each channel; the byte order matches what 16bpp Linux framebuffers expect.
pub fn pack_rgb565_le(rgb: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(rgb.len() / 3 * 2);
    for pixel in rgb.chunks_exact(3) {
        let value = ((pixel[0] as u16 & 0xF8) << 8)
            | ((pixel[1] as u16 & 0xFC) << 3)
            | (pixel[2] as u16 >> 3);
        packed.extend_from_slice(&value.to_le_bytes());
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::palette;
    use embedded_graphics::pixelcolor::Rgb888;

    #[test]
    fn rgb565_packs_known_values() {
        // white -> 0xFFFF, black -> 0x0000, pure red -> 0xF800
        assert_eq!(pack_rgb565_le(&[255, 255, 255]), vec![0xFF, 0xFF]);
        assert_eq!(pack_rgb565_le(&[0, 0, 0]), vec![0x00, 0x00]);
        assert_eq!(pack_rgb565_le(&[255, 0, 0]), vec![0x00, 0xF8]);
        assert_eq!(pack_rgb565_le(&[0, 255, 0]), vec![0xE0, 0x07]);
        assert_eq!(pack_rgb565_le(&[0, 0, 255]), vec![0x1F, 0x00]);
    }

    #[test]
    fn rgb565_output_is_two_bytes_per_pixel() {
        let frame = Frame::new(7, 3, palette::BACKGROUND);
        let packed = pack_rgb565_le(frame.data());
        assert_eq!(packed.len(), 7 * 3 * 2);
    }

    #[test]
    fn framebuffer_sink_writes_full_frame_to_device_path() {
        // A plain file stands in for the device node.
        let path = std::env::temp_dir().join(format!("lpdash-fb-test-{}", std::process::id()));
        fs::write(&path, b"").unwrap();

        let mut sink = FramebufferSink::new(path.clone(), 5, 4);
        let frame = Frame::new(5, 4, Rgb888::new(255, 0, 0));
        sink.present(&frame).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 5 * 4 * 2);

        sink.clear().unwrap();
        let cleared = fs::read(&path).unwrap();
        assert!(cleared.iter().all(|&b| b == 0));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn framebuffer_sink_reports_missing_device() {
        let mut sink = FramebufferSink::new(PathBuf::from("/nonexistent/fb9"), 2, 2);
        let frame = Frame::new(2, 2, Rgb888::new(0, 0, 0));
        assert!(sink.present(&frame).is_err());
    }
}
