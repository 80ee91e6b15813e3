//! Operator-facing frame display for the terminal.

use std::io::Write;

use waymark_core::traits::FrameDisplay;
use waymark_core::types::FrameBuffer;

/// Prints one status line per frame.
///
/// Lines end in `\r\n` so they render correctly while the terminal is in
/// raw mode.
#[derive(Debug, Default)]
pub struct StatusLine;

impl FrameDisplay for StatusLine {
    fn show(&mut self, step: u32, image: &FrameBuffer) {
        let mut out = std::io::stdout().lock();
        let _ = write!(
            out,
            "step {step:>4}  {}x{}  luma {:>5.1}\r\n",
            image.width(),
            image.height(),
            mean_luma(image)
        );
        let _ = out.flush();
    }
}

/// Mean Rec.601 luma over all pixels, 0..=255.
#[allow(clippy::cast_precision_loss)]
fn mean_luma(image: &FrameBuffer) -> f64 {
    let channels = image.format().bytes_per_pixel() as usize;
    let (sum, count) = image
        .data()
        .chunks_exact(channels)
        .fold((0.0, 0_u64), |(sum, count), px| {
            let luma =
                0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]);
            (sum + luma, count + 1)
        });
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use waymark_core::types::PixelFormat;

    use super::*;

    #[test]
    fn luma_of_uniform_frames() {
        let black = FrameBuffer::new(4, 4, PixelFormat::Rgb8);
        assert!(mean_luma(&black).abs() < 1e-9);

        let white = FrameBuffer::from_raw(1, 1, PixelFormat::Rgba8, vec![255; 4]).unwrap();
        assert!((mean_luma(&white) - 255.0).abs() < 1e-6);
    }

    #[test]
    fn luma_of_empty_frame_is_zero() {
        let empty = FrameBuffer::new(0, 0, PixelFormat::Rgb8);
        assert!(mean_luma(&empty).abs() < 1e-9);
    }
}
