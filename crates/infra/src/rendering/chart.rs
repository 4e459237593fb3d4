//! Bitmap chart renderer built on the `image` crate
//!
//! Draws bars and donuts only; labels and figures are printed by the caller
//! next to the image, so no font rasterization is needed.

use std::f64::consts::PI;
use std::io::Cursor;

use image::{ImageFormat, Rgb as Pixel, RgbImage};
use recarga_core::{ChartKind, ChartRenderer, ChartSpec, RasterImage, Rgb};
use recarga_domain::{DashboardError, Result};
use tracing::debug;

use crate::errors::InfraError;

const BACKGROUND: Pixel<u8> = Pixel([255, 255, 255]);
const AXIS: Pixel<u8> = Pixel([90, 90, 90]);

/// Colours for points without a fixed colour, cycled in order.
pub const PALETTE: [Rgb; 8] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
    Rgb(227, 119, 194),
    Rgb(23, 190, 207),
];

/// Rasterizes bar and donut charts at a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterChartRenderer {
    width: u32,
    height: u32,
}

impl Default for RasterChartRenderer {
    fn default() -> Self {
        Self { width: 960, height: 540 }
    }
}

impl RasterChartRenderer {
    /// # Errors
    /// `DashboardError::Render` when either dimension is below 32 pixels.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < 32 || height < 32 {
            return Err(DashboardError::Render(format!(
                "chart size {width}x{height} is too small"
            )));
        }
        Ok(Self { width, height })
    }

    fn draw_bars(&self, img: &mut RgbImage, chart: &ChartSpec) {
        let margin = self.width.min(self.height) / 12;
        let (left, right) = (margin, self.width - margin);
        let (top, bottom) = (margin, self.height - margin);

        let max = chart.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        let slots = u32::try_from(chart.points.len()).unwrap_or(u32::MAX).max(1);
        let slot = (right - left) / slots;
        let gap = (slot / 5).max(1);
        let usable = f64::from(bottom - top);

        for (i, point) in chart.points.iter().enumerate() {
            if max <= 0.0 || point.value <= 0.0 {
                continue;
            }
            let bar_height = ((point.value / max) * usable).round() as u32;
            let x0 = left + slot * i as u32 + gap / 2;
            let x1 = (x0 + slot.saturating_sub(gap)).min(right);
            let y0 = bottom.saturating_sub(bar_height);
            fill_rect(img, x0, y0, x1, bottom, colour(point.color, i));
        }

        fill_rect(img, left, bottom, right, bottom + 2, AXIS);
        fill_rect(img, left.saturating_sub(2), top, left, bottom + 2, AXIS);
    }

    fn draw_donut(&self, img: &mut RgbImage, chart: &ChartSpec) {
        let total: f64 = chart.points.iter().map(|p| p.value.max(0.0)).sum();
        if total <= 0.0 {
            return;
        }

        // Cumulative end fraction per segment, clockwise from 12 o'clock.
        let mut bounds = Vec::with_capacity(chart.points.len());
        let mut acc = 0.0;
        for (i, point) in chart.points.iter().enumerate() {
            acc += point.value.max(0.0) / total;
            bounds.push((acc, colour(point.color, i)));
        }

        let cx = f64::from(self.width) / 2.0;
        let cy = f64::from(self.height) / 2.0;
        let outer = f64::from(self.width.min(self.height)) * 0.42;
        let inner = outer * 0.55;

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let distance = dx.hypot(dy);
            if distance > outer || distance < inner {
                continue;
            }
            let fraction = (dx.atan2(-dy) + 2.0 * PI) % (2.0 * PI) / (2.0 * PI);
            if let Some((_, segment)) = bounds.iter().find(|(end, _)| fraction <= *end) {
                *pixel = *segment;
            } else if let Some((_, last)) = bounds.last() {
                *pixel = *last;
            }
        }
    }
}

impl ChartRenderer for RasterChartRenderer {
    fn rasterize(&self, chart: &ChartSpec) -> Result<RasterImage> {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        match chart.kind {
            ChartKind::Bar => self.draw_bars(&mut img, chart),
            ChartKind::Donut => self.draw_donut(&mut img, chart),
        }
        debug!(title = %chart.title, points = chart.points.len(), "chart rasterized");
        Ok(RasterImage { width: self.width, height: self.height, rgb: img.into_raw() })
    }
}

/// Encode a rasterized chart as PNG.
///
/// # Errors
/// `DashboardError::Render` if the buffer does not match its dimensions or
/// encoding fails.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let buffer = RgbImage::from_raw(image.width, image.height, image.rgb.clone()).ok_or_else(|| {
        DashboardError::Render(format!(
            "raster buffer does not match {}x{}",
            image.width, image.height
        ))
    })?;
    let mut out = Cursor::new(Vec::new());
    buffer.write_to(&mut out, ImageFormat::Png).map_err(InfraError::from)?;
    Ok(out.into_inner())
}

fn colour(fixed: Option<Rgb>, index: usize) -> Pixel<u8> {
    let Rgb(r, g, b) = fixed.unwrap_or(PALETTE[index % PALETTE.len()]);
    Pixel([r, g, b])
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, pixel: Pixel<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use recarga_core::ChartPoint;

    use super::*;

    fn spec(kind: ChartKind, values: &[(f64, Option<Rgb>)]) -> ChartSpec {
        ChartSpec {
            title: "test".into(),
            kind,
            points: values
                .iter()
                .enumerate()
                .map(|(i, (value, color))| ChartPoint {
                    label: format!("p{i}"),
                    value: *value,
                    color: *color,
                })
                .collect(),
        }
    }

    fn pixel_at(image: &RasterImage, x: u32, y: u32) -> [u8; 3] {
        let offset = ((y * image.width + x) * 3) as usize;
        [image.rgb[offset], image.rgb[offset + 1], image.rgb[offset + 2]]
    }

    #[test]
    fn test_bar_chart_uses_fixed_colours() {
        let renderer = RasterChartRenderer::new(200, 100).unwrap();
        let image = renderer
            .rasterize(&spec(ChartKind::Bar, &[(10.0, Some(Rgb::GREEN)), (5.0, Some(Rgb::RED))]))
            .unwrap();

        assert!(image.is_well_formed());
        // Bottom of the first slot is inside the tallest bar.
        let margin = 100 / 12;
        assert_eq!(pixel_at(&image, margin + 20, 100 - margin - 2), [46, 160, 67]);
    }

    #[test]
    fn test_donut_leaves_centre_blank() {
        let renderer = RasterChartRenderer::new(100, 100).unwrap();
        let image = renderer.rasterize(&spec(ChartKind::Donut, &[(1.0, None), (3.0, None)])).unwrap();

        assert_eq!(pixel_at(&image, 50, 50), [255, 255, 255]);
        // Just right of 12 o'clock on the ring belongs to the first segment.
        let Rgb(r, g, b) = PALETTE[0];
        assert_eq!(pixel_at(&image, 52, 10), [r, g, b]);
    }

    #[test]
    fn test_all_zero_values_render_blank_canvas() {
        let renderer = RasterChartRenderer::default();
        let image = renderer.rasterize(&spec(ChartKind::Donut, &[(0.0, None)])).unwrap();
        assert!(image.rgb.iter().all(|channel| *channel == 255));
    }

    #[test]
    fn test_too_small_canvas_is_rejected() {
        assert!(RasterChartRenderer::new(10, 400).is_err());
    }

    #[test]
    fn test_png_encoding_has_signature() {
        let image = RasterChartRenderer::new(64, 64)
            .unwrap()
            .rasterize(&spec(ChartKind::Bar, &[(1.0, None)]))
            .unwrap();
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let broken = RasterImage { width: 4, height: 4, rgb: vec![0; 5] };
        assert!(encode_png(&broken).is_err());
    }
}
