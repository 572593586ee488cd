//! The per-frame orchestrator and public interface: owns every stage's
//! state, drives a [`FrameSource`] through one dequeue/analyse/enqueue
//! cycle, and answers the post-frame queries.

use crate::color_class::ColorClasses;
use crate::color_table::ColorTable;
use crate::components::connect_components;
use crate::constants::{COLOR_COUNT, MAX_HEIGHT, MAX_WIDTH};
use crate::encoder::encode_runs;
use crate::error::{Error, Result};
use crate::extract::extract_regions;
use crate::frame_source::FrameSource;
use crate::mask::ActiveMask;
use crate::polar::PolarTables;
use crate::region::{RegionArena, RegionId};
use crate::report::{build_report, BlobTable};
use crate::run::RunArena;
use crate::segmenter::segment;
use crate::sort::{passes_for, sort_regions};
use crate::splitter::separate_regions;

/// The resolution a pipeline is opened at. Bounds `MAX_RUNS`/`MAX_REGIONS`
/// allocation, not just a capture request.
#[derive(Clone, Copy, Debug)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Owns every pipeline stage's state for one open capture session and
/// drives a single [`FrameSource`] through it frame by frame.
pub struct Pipeline<F: FrameSource> {
    source: F,
    resolution: Resolution,

    lut: ColorTable,
    mask: ActiveMask,
    polar: PolarTables,
    colors: ColorClasses,

    runs: RunArena,
    regions: RegionArena,
    segmented: Vec<u8>,
    last_raw: Vec<u8>,

    sorted_heads: Vec<Option<RegionId>>,
    run_overflow: bool,
    region_overflow: bool,
}

impl<F: FrameSource> Pipeline<F> {
    /// Builds an unopened pipeline around a frame source. Use [`Pipeline::open`]
    /// before driving it.
    pub fn new(source: F) -> Self {
        Self {
            source,
            resolution: Resolution { width: 0, height: 0 },
            lut: ColorTable::new(),
            mask: ActiveMask::new(0, 0),
            polar: PolarTables::new(0, 0),
            colors: ColorClasses::new(COLOR_COUNT),
            runs: RunArena::with_capacity(0),
            regions: RegionArena::with_capacity(0),
            segmented: Vec::new(),
            last_raw: Vec::new(),
            sorted_heads: vec![None; COLOR_COUNT],
            run_overflow: false,
            region_overflow: false,
        }
    }

    /// Opens the underlying frame source at `width`x`height`/`fps` and
    /// (re)allocates every per-resolution buffer.
    ///
    /// `width` must be even (the segmenter's YUV 4:2:2 pair decode
    /// requires it) and both dimensions must fit within
    /// `MAX_WIDTH`/`MAX_HEIGHT`.
    /// `MAX_RUNS`/`MAX_REGIONS` are sized `W*H/4 + 1` and `W*H/16 + 1`
    /// respectively, a plausible worst case for alternating-run and
    /// single-pixel-blob frames (the `+1` keeping a minimal resolution
    /// from rounding a formula down to zero capacity), not a hard bound
    /// from the source.
    pub fn open(&mut self, path: &str, width: u32, height: u32, fps: u32) -> Result<()> {
        if width % 2 != 0 {
            return Err(Error::ConfigInvalid(format!(
                "width {} must be even",
                width
            )));
        }
        if width == 0 || height == 0 || width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(Error::ConfigInvalid(format!(
                "resolution {}x{} out of range (max {}x{})",
                width, height, MAX_WIDTH, MAX_HEIGHT
            )));
        }

        self.source.open(path, width, height, fps)?;

        let pixels = (width as usize) * (height as usize);
        self.resolution = Resolution { width, height };
        self.lut = ColorTable::new();
        self.mask = ActiveMask::new(width, height);
        self.polar = PolarTables::new(width, height);
        self.colors = ColorClasses::new(COLOR_COUNT);
        self.runs = RunArena::with_capacity(pixels / 4 + 1);
        self.regions = RegionArena::with_capacity(pixels / 16 + 1);
        self.segmented = vec![0u8; pixels + 1];
        self.last_raw = vec![0u8; 2 * pixels];
        self.sorted_heads = vec![None; COLOR_COUNT];
        self.run_overflow = false;
        self.region_overflow = false;

        log::info!("opened pipeline at {}x{}@{}fps", width, height, fps);
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.source.start()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.source.stop()
    }

    pub fn set_control(&mut self, id: i32, value: i32) -> Result<()> {
        self.source.set_control(id, value)
    }

    pub fn get_control(&self, id: i32) -> Result<i32> {
        self.source.get_control(id)
    }

    /// Sets a color class's minimum blob area; `min_area` of
    /// [`crate::constants::DISABLED_MIN_AREA`] disables the class.
    pub fn set_color_min_area(&mut self, color: u8, min_area: u32) -> Result<()> {
        if !self.colors.set_min_area(color, min_area) {
            return Err(Error::ConfigInvalid(format!(
                "color index {} out of range",
                color
            )));
        }
        log::info!("color {} min_area set to {}", color, min_area);
        Ok(())
    }

    /// Installs a new classification LUT (truncation-tolerant: a
    /// shorter-than-full buffer only overwrites its own length's worth of
    /// entries).
    pub fn set_colors(&mut self, lut: &[u8]) {
        self.lut.install(lut);
        log::info!("installed color lookup table ({} bytes)", lut.len());
    }

    /// Installs a new active-pixel participation mask.
    pub fn set_active_pixels(&mut self, mask: &[u8]) {
        self.mask.install(mask);
        log::info!("installed active-pixel mask ({} bytes)", mask.len());
    }

    /// Installs new polar distance/angle tables.
    pub fn set_locations(&mut self, r_table: &[u16], phi_table: &[u16]) {
        self.polar.install(r_table, phi_table);
        log::info!("installed polar location tables");
    }

    /// Dequeues one frame, runs every stage, and re-enqueues the buffer.
    ///
    /// All-or-nothing on a `DeviceIo` failure: if dequeue fails, no
    /// segmentation state is touched. Run/region capacity overflow is
    /// never an `Err` here — it is logged and left queryable via
    /// [`Pipeline::run_capacity_exceeded`]/[`Pipeline::region_capacity_exceeded`].
    pub fn analyse(&mut self) -> Result<()> {
        if self.resolution.width == 0 {
            return Err(Error::NotOpen);
        }

        let index = self.source.dequeue()?;
        self.last_raw.copy_from_slice(self.source.buffer(index));
        self.source.enqueue(index)?;

        let w = self.resolution.width;
        let h = self.resolution.height;
        let pixels = (w as usize) * (h as usize);

        segment(
            &self.last_raw,
            w,
            h,
            &self.lut,
            &self.mask,
            &mut self.segmented[..pixels],
        );
        encode_runs(&mut self.segmented, w, h, &self.colors, &mut self.runs);
        connect_components(&mut self.runs, &self.colors);
        extract_regions(&mut self.runs, &self.colors, &mut self.regions);

        self.run_overflow = self.runs.overflowed();
        self.region_overflow = self.regions.overflowed();
        if self.run_overflow {
            log::warn!("run capacity exceeded ({} runs)", self.runs.capacity());
        }
        if self.region_overflow {
            log::warn!(
                "region capacity exceeded ({} regions)",
                self.regions.capacity()
            );
        }

        let max_area = separate_regions(&mut self.regions, &mut self.colors);
        let passes = passes_for(max_area);

        for color in 0..self.colors.len() {
            let head = self.colors.get(color as u8).and_then(|c| c.list_head);
            self.sorted_heads[color] = sort_regions(&mut self.regions, head, passes);
        }

        Ok(())
    }

    /// The classified image from the most recent `analyse()` call, one
    /// byte per pixel.
    pub fn get_segmented(&self) -> &[u8] {
        let pixels = (self.resolution.width as usize) * (self.resolution.height as usize);
        &self.segmented[..pixels]
    }

    /// The sorted blob report for one color class, ascending by area.
    pub fn get_blobs(&self, color: u8) -> Result<BlobTable> {
        let head = *self
            .sorted_heads
            .get(color as usize)
            .ok_or_else(|| Error::ConfigInvalid(format!("color index {} out of range", color)))?;
        Ok(build_report(
            &self.regions,
            head,
            self.resolution.width,
            &self.polar,
        ))
    }

    /// Debug capture of the last raw frame as per-pixel `(Y, U, V)`
    /// triples — named for RGB in the external interface, but a
    /// byte-for-byte carry of the original's non-colorimetric output;
    /// see DESIGN.md.
    pub fn image(&self) -> Vec<(u8, u8, u8)> {
        let w = self.resolution.width as usize;
        let h = self.resolution.height as usize;
        let mut out = Vec::with_capacity(w * h);
        for pair in 0..(w * h) / 2 {
            let base = 4 * pair;
            let y0 = self.last_raw[base];
            let u = self.last_raw[base + 1];
            let y1 = self.last_raw[base + 2];
            let v = self.last_raw[base + 3];
            out.push((y0, u, v));
            out.push((y1, u, v));
        }
        out
    }

    pub fn run_capacity_exceeded(&self) -> bool {
        self.run_overflow
    }

    pub fn region_capacity_exceeded(&self) -> bool {
        self.region_overflow
    }

    /// Direct access to the underlying frame source, e.g. to push test
    /// fixtures into a [`crate::frame_source::MemoryFrameSource`] ahead
    /// of `analyse()`.
    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }
}
