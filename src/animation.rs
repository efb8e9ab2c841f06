//! Animation producer: a phase-shifted sine wave rendered frame by frame, staged as PNG files,
//! then assembled into a looping GIF.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::geom::{AxisMap, Point, Rect, linspace};
use crate::raster::Rasterizer;
use crate::svg::{Anchor, Stroke, SvgDoc, TextStyle};

const UNITS_PER_INCH: f64 = 100.0;

/// 0-based frame index in generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u32);

#[derive(Clone, Debug)]
pub struct WaveAnimation {
    pub frame_count: u32,
    /// Phase added per frame, in radians.
    pub phase_step: f64,
    pub samples: usize,
    /// Sampled x domain `[0, x_max]`.
    pub x_max: f64,
    pub y_range: (f64, f64),
    pub title: String,
    pub color: String,
    pub size_in: (f64, f64),
    pub dpi: f64,
    /// Display time of every frame.
    pub delay_ms: u32,
}

impl Default for WaveAnimation {
    fn default() -> Self {
        Self {
            frame_count: 20,
            phase_step: 0.5,
            samples: 200,
            x_max: 4.0 * std::f64::consts::PI,
            y_range: (-1.5, 1.5),
            title: "Quantum Oscillation (2D)".to_string(),
            color: "#0000ff".to_string(),
            size_in: (6.0, 4.0),
            dpi: 80.0,
            delay_ms: 150,
        }
    }
}

impl WaveAnimation {
    pub fn phase(&self, idx: FrameIndex) -> f64 {
        f64::from(idx.0) * self.phase_step
    }

    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> {
        (0..self.frame_count).map(FrameIndex)
    }

    pub fn scale(&self) -> f32 {
        (self.dpi / UNITS_PER_INCH) as f32
    }

    /// `(x, sin(x + phase))` samples for one frame.
    pub fn samples_for(&self, idx: FrameIndex) -> Vec<(f64, f64)> {
        let phase = self.phase(idx);
        linspace(0.0, self.x_max, self.samples)
            .into_iter()
            .map(|x| (x, (x + phase).sin()))
            .collect()
    }

    pub fn frame_svg(&self, idx: FrameIndex) -> AssetResult<String> {
        if self.samples < 2 {
            return Err(AssetError::validation("wave needs at least two samples"));
        }
        let (y_lo, y_hi) = self.y_range;
        if !(y_hi > y_lo) || !(self.x_max > 0.0) {
            return Err(AssetError::validation("wave has an empty plot range"));
        }

        let (w, h) = (
            self.size_in.0 * UNITS_PER_INCH,
            self.size_in.1 * UNITS_PER_INCH,
        );
        let area = Rect::new(w * 0.125, h * 0.12, w * 0.9, h * 0.89);
        let x_pad = self.x_max * 0.05;
        let map = AxisMap::new(Rect::new(-x_pad, y_lo, self.x_max + x_pad, y_hi), area);

        let mut doc = SvgDoc::new(w, h);
        doc.rect(0.0, 0.0, w, h, "#ffffff", None);

        let tick = Stroke::solid("#000000", 0.8);
        let label = TextStyle::sans(13.9);
        for y in [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5] {
            if y < y_lo || y > y_hi {
                continue;
            }
            let p = map.to_canvas(-x_pad, y);
            doc.line(p, Point::new(p.x - 4.0, p.y), tick);
            doc.text(
                Point::new(p.x - 7.0, p.y + 5.0),
                &format!("{y:.1}"),
                label.anchored(Anchor::End),
            );
        }
        let mut x = 0.0;
        while x <= self.x_max {
            let p = map.to_canvas(x, y_lo);
            doc.line(p, Point::new(p.x, p.y + 4.0), tick);
            doc.text(
                Point::new(p.x, p.y + 19.0),
                &format!("{x:.0}"),
                label.anchored(Anchor::Middle),
            );
            x += 2.0;
        }

        doc.path(
            &map.polyline(self.samples_for(idx)),
            Stroke::solid(&self.color, 1.5),
        );
        doc.rect(
            area.x0,
            area.y0,
            area.width(),
            area.height(),
            "none",
            Some(Stroke::solid("#000000", 1.0)),
        );
        doc.text(
            Point::new((area.x0 + area.x1) / 2.0, area.y0 - 8.0),
            &self.title,
            TextStyle::sans(16.7).anchored(Anchor::Middle),
        );
        Ok(doc.finish())
    }

    pub fn render_frame(&self, raster: &Rasterizer, idx: FrameIndex) -> AssetResult<RgbaImage> {
        raster.rasterize(&self.frame_svg(idx)?, self.scale())
    }
}

/// Scoped directory holding intermediate frame files.
///
/// The directory and everything staged in it are removed when the area is dropped, on both the
/// success and the error path.
#[derive(Debug)]
pub struct StagingArea {
    dir: tempfile::TempDir,
    staged: Vec<PathBuf>,
}

impl StagingArea {
    /// Create a fresh, uniquely named staging directory under `parent`.
    pub fn new_in(parent: &Path) -> AssetResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("qci-frames-")
            .tempdir_in(parent)
            .with_context(|| format!("create staging dir under '{}'", parent.display()))?;
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.path().join(format!("frame_{:02}.png", idx.0))
    }

    pub fn stage(&mut self, idx: FrameIndex, img: &RgbaImage) -> AssetResult<PathBuf> {
        let path = self.frame_path(idx);
        crate::raster::save_png(img, &path)?;
        tracing::debug!(frame = idx.0, path = %path.display(), "staged frame");
        self.staged.push(path.clone());
        Ok(path)
    }

    /// Staged frame files in staging order.
    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }

    pub fn load(path: &Path) -> AssetResult<RgbaImage> {
        let img = image::open(path)
            .with_context(|| format!("read staged frame '{}'", path.display()))?;
        Ok(img.to_rgba8())
    }

    /// Remove the staging directory, reporting any removal failure.
    pub fn close(self) -> AssetResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("remove staging dir '{}'", path.display()))?;
        Ok(())
    }
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    fn begin(&mut self, width: u32, height: u32) -> AssetResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> AssetResult<()>;
    fn end(&mut self) -> AssetResult<()>;
}

fn check_order(last: Option<FrameIndex>, idx: FrameIndex) -> AssetResult<()> {
    match last {
        Some(prev) if idx <= prev => Err(AssetError::validation(format!(
            "frame {} pushed after frame {}; frames must be strictly increasing",
            idx.0, prev.0
        ))),
        _ => Ok(()),
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    size: Option<(u32, u32)>,
    frames: Vec<(FrameIndex, RgbaImage)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[(FrameIndex, RgbaImage)] {
        &self.frames
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, width: u32, height: u32) -> AssetResult<()> {
        self.size = Some((width, height));
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> AssetResult<()> {
        check_order(self.frames.last().map(|(i, _)| *i), idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> AssetResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sink that encodes frames into an infinitely looping GIF.
pub struct GifSink {
    out_path: PathBuf,
    delay_ms: u32,
    speed: i32,
    encoder: Option<GifEncoder<File>>,
    size: Option<(u32, u32)>,
    last_idx: Option<FrameIndex>,
    frames_written: usize,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>, delay_ms: u32) -> Self {
        Self {
            out_path: out_path.into(),
            delay_ms,
            speed: 10,
            encoder: None,
            size: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Colour quantization speed, 1 (best) to 30 (fastest).
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, width: u32, height: u32) -> AssetResult<()> {
        if width == 0 || height == 0 {
            return Err(AssetError::validation("gif width/height must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(AssetError::validation(format!(
                "gif frames are limited to 65535x65535, got {width}x{height}"
            )));
        }
        let file = File::create(&self.out_path)
            .with_context(|| format!("create gif '{}'", self.out_path.display()))?;
        let mut encoder = GifEncoder::new_with_speed(file, self.speed);
        encoder.set_repeat(Repeat::Infinite)?;
        self.encoder = Some(encoder);
        self.size = Some((width, height));
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> AssetResult<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(AssetError::encode("gif sink is not started or already finished"));
        };
        check_order(self.last_idx, idx)?;
        if Some(frame.dimensions()) != self.size {
            let (w, h) = frame.dimensions();
            return Err(AssetError::validation(format!(
                "frame size mismatch: got {w}x{h}, expected {:?}",
                self.size
            )));
        }

        let delay = Delay::from_numer_denom_ms(self.delay_ms, 1);
        encoder.encode_frame(Frame::from_parts(frame.clone(), 0, 0, delay))?;
        self.last_idx = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> AssetResult<()> {
        // Dropping the encoder writes the GIF trailer.
        match self.encoder.take() {
            Some(encoder) => {
                drop(encoder);
                Ok(())
            }
            None => Err(AssetError::encode("gif sink is not started or already finished")),
        }
    }
}

/// Render every frame into a staging area under `staging_root`, then feed the staged frames to
/// `sink` in generation order. The staging area is gone when this returns, whatever the outcome.
pub fn render_staged(
    anim: &WaveAnimation,
    raster: &Rasterizer,
    staging_root: &Path,
    sink: &mut dyn FrameSink,
) -> AssetResult<usize> {
    if anim.frame_count == 0 {
        return Err(AssetError::validation("animation needs at least one frame"));
    }

    let mut staging = StagingArea::new_in(staging_root)?;
    for idx in anim.frames() {
        let img = anim.render_frame(raster, idx)?;
        staging.stage(idx, &img)?;
    }

    let mut started = false;
    for (i, path) in staging.staged().iter().enumerate() {
        let img = StagingArea::load(path)?;
        if !started {
            sink.begin(img.width(), img.height())?;
            started = true;
        }
        sink.push_frame(FrameIndex(i as u32), &img)?;
    }
    sink.end()?;

    let count = staging.staged().len();
    staging.close()?;
    Ok(count)
}

/// Render the default wave animation to `out_path` as a looping GIF.
#[tracing::instrument(skip(raster))]
pub fn write_wave_gif(
    raster: &Rasterizer,
    staging_root: &Path,
    out_path: &Path,
) -> AssetResult<usize> {
    let anim = WaveAnimation::default();
    let mut sink = GifSink::new(out_path, anim.delay_ms);
    let frames = render_staged(&anim, raster, staging_root, &mut sink)?;
    tracing::info!(path = %out_path.display(), frames, "wrote wave animation");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_anim() -> WaveAnimation {
        WaveAnimation {
            frame_count: 4,
            samples: 20,
            dpi: 25.0,
            ..WaveAnimation::default()
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn default_matches_fixed_parameters() {
        let anim = WaveAnimation::default();
        assert_eq!(anim.frame_count, 20);
        assert_eq!(anim.samples, 200);
        assert_eq!(anim.delay_ms, 150);
        assert_eq!(anim.phase(FrameIndex(0)), 0.0);
        assert_eq!(anim.phase(FrameIndex(19)), 9.5);
    }

    #[test]
    fn phases_increase_strictly() {
        let anim = WaveAnimation::default();
        let phases: Vec<f64> = anim.frames().map(|i| anim.phase(i)).collect();
        assert_eq!(phases.len(), 20);
        assert!(phases.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn samples_follow_shifted_sine() {
        let anim = WaveAnimation::default();
        let s = anim.samples_for(FrameIndex(3));
        assert_eq!(s.len(), 200);
        assert_eq!(s[0].0, 0.0);
        assert!((s[199].0 - 4.0 * std::f64::consts::PI).abs() < 1e-12);
        assert!((s[0].1 - 1.5f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn frame_size_matches_figure_and_dpi() {
        let anim = WaveAnimation::default();
        let img = anim
            .render_frame(&Rasterizer::without_fonts(), FrameIndex(0))
            .unwrap();
        assert_eq!(img.dimensions(), (480, 320));
    }

    #[test]
    fn in_memory_sink_receives_frames_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let anim = small_anim();
        let mut sink = InMemorySink::new();
        let n = render_staged(&anim, &Rasterizer::without_fonts(), tmp.path(), &mut sink).unwrap();

        assert_eq!(n, 4);
        assert!(sink.is_finished());
        assert_eq!(sink.size(), Some((150, 100)));
        let order: Vec<u32> = sink.frames().iter().map(|(i, _)| i.0).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn sinks_reject_out_of_order_frames() {
        let img = RgbaImage::new(2, 2);
        let mut sink = InMemorySink::new();
        sink.begin(2, 2).unwrap();
        sink.push_frame(FrameIndex(1), &img).unwrap();
        assert!(matches!(
            sink.push_frame(FrameIndex(1), &img),
            Err(AssetError::Validation(_))
        ));
        assert!(sink.push_frame(FrameIndex(0), &img).is_err());
    }

    #[test]
    fn gif_sink_rejects_size_mismatch_and_push_before_begin() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = GifSink::new(tmp.path().join("a.gif"), 150);
        assert!(matches!(
            sink.push_frame(FrameIndex(0), &RgbaImage::new(2, 2)),
            Err(AssetError::Encode(_))
        ));
        sink.begin(2, 2).unwrap();
        assert!(sink.push_frame(FrameIndex(0), &RgbaImage::new(3, 2)).is_err());
        sink.end().unwrap();
        assert!(sink.end().is_err());
    }

    struct FailingSink {
        fail_at: u32,
    }

    impl FrameSink for FailingSink {
        fn begin(&mut self, _: u32, _: u32) -> AssetResult<()> {
            Ok(())
        }

        fn push_frame(&mut self, idx: FrameIndex, _: &RgbaImage) -> AssetResult<()> {
            if idx.0 == self.fail_at {
                return Err(AssetError::encode("boom"));
            }
            Ok(())
        }

        fn end(&mut self) -> AssetResult<()> {
            Ok(())
        }
    }

    #[test]
    fn staging_is_cleaned_when_combining_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = FailingSink { fail_at: 2 };
        let err = render_staged(
            &small_anim(),
            &Rasterizer::without_fonts(),
            tmp.path(),
            &mut sink,
        )
        .unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn staging_area_names_frames_and_removes_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::new_in(tmp.path()).unwrap();
        let p = staging.stage(FrameIndex(7), &RgbaImage::new(2, 2)).unwrap();
        assert!(p.ends_with("frame_07.png"));
        assert!(p.exists());
        let dir = staging.path().to_path_buf();
        drop(staging);
        assert!(!dir.exists());
        assert_eq!(entries(tmp.path()), 0);
    }
}
