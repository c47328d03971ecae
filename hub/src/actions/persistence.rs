//! Saving typed text and drawings to disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use image::{Rgb, RgbImage};
use tracing::info;

use crate::modes::Canvas;

/// Stroke color in saved drawings.
const INK: Rgb<u8> = Rgb([255, 0, 255]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
/// Pen radius in pixels.
const PEN_RADIUS: i64 = 3;

/// Sink for the two kinds of user content.  Returns an identifier of what
/// was written (a file name for disk persistence).
pub trait Persistence {
    fn save_text(&mut self, text: &str) -> anyhow::Result<String>;
    fn save_image(&mut self, canvas: &Canvas) -> anyhow::Result<String>;
}

/// Timestamped files in one output directory.
#[derive(Debug, Clone)]
pub struct DiskPersistence {
    dir: PathBuf,
}

impl DiskPersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<prefix>_<YYYYmmdd_HHMMSS_mmm>.<ext>`, suffixed if that name is taken.
    fn next_path(&self, prefix: &str, ext: &str) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output dir {}", self.dir.display()))?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let mut path = self.dir.join(format!("{}_{}.{}", prefix, stamp, ext));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}_{}.{}", prefix, stamp, n, ext));
            n += 1;
        }
        Ok(path)
    }
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Persistence for DiskPersistence {
    fn save_text(&mut self, text: &str) -> anyhow::Result<String> {
        let path = self.next_path("typed_text", "txt")?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        info!("saved {} chars of text to {}", text.chars().count(), path.display());
        Ok(file_id(&path))
    }

    fn save_image(&mut self, canvas: &Canvas) -> anyhow::Result<String> {
        let img = rasterize(canvas)?;
        let path = self.next_path("drawing", "png")?;
        img.save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "saved drawing ({} strokes, {} points) to {}",
            canvas.strokes().len(),
            canvas.point_count(),
            path.display()
        );
        Ok(file_id(&path))
    }
}

// ── Rasterizer ─────────────────────────────────────────────

/// Render strokes as thick lines on a white background.
pub fn rasterize(canvas: &Canvas) -> anyhow::Result<RgbImage> {
    if canvas.width == 0 || canvas.height == 0 {
        bail!("canvas has no size ({}x{})", canvas.width, canvas.height);
    }
    let mut img = RgbImage::from_pixel(canvas.width, canvas.height, PAPER);
    for stroke in canvas.strokes() {
        match stroke.points.as_slice() {
            [] => {}
            [only] => stamp(&mut img, *only),
            points => {
                for pair in points.windows(2) {
                    line(&mut img, pair[0], pair[1]);
                }
            }
        }
    }
    Ok(img)
}

fn line(img: &mut RgbImage, from: (f32, f32), to: (f32, f32)) {
    let pad = PEN_RADIUS as f32;
    let bounds = (-pad, -pad, img.width() as f32 + pad, img.height() as f32 + pad);
    let Some((from, to)) = clip_segment(from, to, bounds) else {
        return;
    };
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(img, (from.0 + dx * t, from.1 + dy * t));
    }
}

/// Liang-Barsky clip of a segment to `(x0, y0, x1, y1)`.  `None` when the
/// segment misses the box or has a non-finite end.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (x0, y0, x1, y1): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-dx, from.0 - x0),
        (dx, x1 - from.0),
        (-dy, from.1 - y0),
        (dy, y1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

/// Filled disc of `PEN_RADIUS` around a point, clipped to the image.
fn stamp(img: &mut RgbImage, center: (f32, f32)) {
    if !center.0.is_finite() || !center.1.is_finite() {
        return;
    }
    let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);
    let (w, h) = (img.width() as i64, img.height() as i64);
    for y in (cy - PEN_RADIUS)..=(cy + PEN_RADIUS) {
        for x in (cx - PEN_RADIUS)..=(cx + PEN_RADIUS) {
            let inside = (x - cx).pow(2) + (y - cy).pow(2) <= PEN_RADIUS * PEN_RADIUS;
            if inside && x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, INK);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = DiskPersistence::new(dir.path().join("out"));
        let id = p.save_text("HELLO").unwrap();
        assert!(id.starts_with("typed_text_"));
        assert!(id.ends_with(".txt"));
        let written = std::fs::read_to_string(dir.path().join("out").join(&id)).unwrap();
        assert_eq!(written, "HELLO");
    }

    #[test]
    fn test_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = DiskPersistence::new(dir.path());
        let a = p.save_text("a").unwrap();
        let b = p.save_text("b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_save_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = DiskPersistence::new(dir.path());
        let mut canvas = Canvas::new(64, 48);
        canvas.draw_to((10.0, 10.0));
        canvas.draw_to((50.0, 10.0));
        let id = p.save_image(&canvas).unwrap();
        assert!(id.starts_with("drawing_"));
        let img = image::open(dir.path().join(&id)).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (64, 48));
        assert_eq!(*img.get_pixel(30, 10), INK);
        assert_eq!(*img.get_pixel(30, 30), PAPER);
    }

    #[test]
    fn test_rasterize_single_point_and_clipping() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_to((0.0, 0.0));
        canvas.lift_pen();
        canvas.draw_to((19.0, 19.0));
        let img = rasterize(&canvas).unwrap();
        assert_eq!(*img.get_pixel(0, 0), INK);
        assert_eq!(*img.get_pixel(19, 19), INK);
        assert_eq!(*img.get_pixel(10, 10), PAPER);
    }

    #[test]
    fn test_rasterize_far_segment_is_clipped() {
        let mut canvas = Canvas::new(64, 48);
        canvas.draw_to((10.0, 10.0));
        canvas.draw_to((10.0, 1e9));
        canvas.lift_pen();
        canvas.draw_to((-1e30, 5.0));
        canvas.draw_to((f32::INFINITY, 5.0));
        let img = rasterize(&canvas).unwrap();
        assert_eq!(*img.get_pixel(10, 47), INK);
        assert_eq!(*img.get_pixel(10, 5), PAPER);
        assert_eq!(*img.get_pixel(40, 30), PAPER);
    }

    #[test]
    fn test_clip_segment() {
        let b = (0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            clip_segment((5.0, -8.0), (5.0, 24.0), b),
            Some(((5.0, 0.0), (5.0, 10.0)))
        );
        assert_eq!(clip_segment((20.0, 0.0), (30.0, 10.0), b), None);
        assert_eq!(clip_segment((1.0, 1.0), (2.0, 2.0), b), Some(((1.0, 1.0), (2.0, 2.0))));
    }

    #[test]
    fn test_rasterize_rejects_empty_size() {
        let canvas = Canvas::new(0, 0);
        assert!(rasterize(&canvas).is_err());
    }

    #[test]
    fn test_unwritable_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut p = DiskPersistence::new(blocker.join("sub"));
        assert!(p.save_text("x").is_err());
    }
}
