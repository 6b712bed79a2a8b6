use crate::polyline::Polyline;
use log::{debug, info, warn};
use rand::Rng;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("Failed to encode image for '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
    #[error("Failed to write image '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub dpi: u32,
    pub width_in: f64,
    pub height_in: f64,
    /// Stroke width in points (1/72 inch).
    pub stroke_pt: f64,
    /// Blank border around the data, as a fraction of each canvas side.
    pub margin: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            width_in: 6.4,
            height_in: 4.8,
            stroke_pt: 0.3,
            margin: 0.05,
        }
    }
}

impl RenderConfig {
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    pub fn stroke_px(&self) -> f32 {
        (self.stroke_pt * self.dpi as f64 / 72.0) as f32
    }
}

/// Maps data coordinates onto the canvas with equal x/y scale, y pointing up.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Viewport {
    fn fit<'a>(
        lines: impl IntoIterator<Item = &'a Polyline>,
        width: u32,
        height: u32,
        margin: f64,
    ) -> Self {
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for line in lines {
            for c in line.coords() {
                min_x = min_x.min(c.x);
                min_y = min_y.min(c.y);
                max_x = max_x.max(c.x);
                max_y = max_y.max(c.y);
            }
        }
        if min_x > max_x {
            // Nothing to draw.
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 1.0, 1.0);
        }

        let (w, h) = (width as f64, height as f64);
        let usable_w = w * (1.0 - 2.0 * margin);
        let usable_h = h * (1.0 - 2.0 * margin);
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = (usable_w / span_x).min(usable_h / span_y);

        // Centre the data inside the canvas.
        let offset_x = (w - span_x * scale) / 2.0 - min_x * scale;
        let offset_y = (h - span_y * scale) / 2.0 - min_y * scale;
        Self {
            scale,
            offset_x,
            offset_y,
            height: h,
        }
    }

    fn project(&self, x: f64, y: f64) -> (f32, f32) {
        let px = x * self.scale + self.offset_x;
        let py = self.height - (y * self.scale + self.offset_y);
        (px as f32, py as f32)
    }
}

fn line_path(line: &Polyline, viewport: &Viewport) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut coords = line.coords().iter();
    let first = coords.next()?;
    let (x, y) = viewport.project(first.x, first.y);
    pb.move_to(x, y);
    for c in coords {
        let (x, y) = viewport.project(c.x, c.y);
        pb.line_to(x, y);
    }
    pb.finish()
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::from_rgba8(rng.random(), rng.random(), rng.random(), 0xFF)
}

/// Draws every line with its own random colour into an in-memory canvas.
pub fn render_pixmap<'a>(
    lines: impl IntoIterator<Item = &'a Polyline> + Clone,
    config: &RenderConfig,
    rng: &mut impl Rng,
) -> Result<Pixmap, RenderError> {
    let (width, height) = config.pixel_size();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    pixmap.fill(Color::WHITE);

    let viewport = Viewport::fit(lines.clone(), width, height, config.margin);
    let stroke = Stroke {
        width: config.stroke_px(),
        ..Default::default()
    };

    let mut drawn = 0;
    for line in lines {
        let Some(path) = line_path(line, &viewport) else {
            warn!("Line {} produced an empty path, not drawn", line.id);
            continue;
        };
        let mut paint = Paint::default();
        paint.set_color(random_color(rng));
        paint.anti_alias = true;
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        drawn += 1;
    }
    debug!("Drew {} lines on a {}x{} canvas", drawn, width, height);

    Ok(pixmap)
}

/// Renders the lines and writes them to `path` as PNG.
pub fn render_png<'a>(
    lines: impl IntoIterator<Item = &'a Polyline> + Clone,
    config: &RenderConfig,
    rng: &mut impl Rng,
    path: &Path,
) -> Result<(), RenderError> {
    let pixmap = render_pixmap(lines, config, rng)?;
    let bytes = pixmap.encode_png().map_err(|source| RenderError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Wrote {}x{} image to {:?}",
        pixmap.width(),
        pixmap.height(),
        path
    );
    Ok(())
}
