use crate::sketch::export;
use crate::sketch::raster::{RasterBuffer, Rgba};
use crate::sketch::render::{stamp_brush, stamp_segment};
use anyhow::Result;

pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 10;

/// Points closer than this (squared distance) to the previous one are
/// dropped to collapse pointer jitter.
const MIN_POINT_DIST_SQ: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchTool {
    Pen,
    /// Stamps in the background color; not true alpha erasure.
    Eraser,
}

/// One pointer-down-to-pointer-up gesture. The color and width are captured
/// when the stroke begins so mid-stroke tool changes do not affect it.
#[derive(Debug, Clone, PartialEq)]
struct StrokeSession {
    points: Vec<(i32, i32)>,
    color: Rgba,
    width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SketchSurface {
    raster: RasterBuffer,
    background: Rgba,
    pen_color: Rgba,
    stroke_width: u32,
    tool: SketchTool,
    session: Option<StrokeSession>,
    locked: bool,
    revision: u64,
}

impl SketchSurface {
    pub fn new(background: Rgba, pen_color: Rgba, stroke_width: u32) -> Self {
        Self {
            raster: RasterBuffer::new(0, 0, background),
            background,
            pen_color,
            stroke_width: stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            tool: SketchTool::Pen,
            session: None,
            locked: false,
            revision: 0,
        }
    }

    /// Reallocate the raster at the given size and fill it with the
    /// background color. Resizing drops whatever was drawn before.
    pub fn configure(&mut self, width: u32, height: u32) {
        self.raster = RasterBuffer::new(width.max(1), height.max(1), self.background);
        self.session = None;
        self.revision += 1;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn pixels(&self) -> &[u8] {
        self.raster.pixels()
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Bumped on every visible mutation; lets the GUI skip texture uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tool(&self) -> SketchTool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: SketchTool) {
        self.tool = tool;
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// While locked (a solve is in flight) stroke input is ignored.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn active_color(&self) -> Rgba {
        match self.tool {
            SketchTool::Pen => self.pen_color,
            SketchTool::Eraser => self.background,
        }
    }

    pub fn begin_stroke(&mut self, point: (i32, i32)) {
        if self.locked || self.session.is_some() {
            return;
        }
        let color = self.active_color();
        let width = self.stroke_width;
        stamp_brush(&mut self.raster, point, color, width);
        self.session = Some(StrokeSession {
            points: vec![point],
            color,
            width,
        });
        self.revision += 1;
    }

    pub fn extend_stroke(&mut self, point: (i32, i32)) {
        if self.locked {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(&last) = session.points.last() else {
            return;
        };
        if !should_append_point(last, point) {
            return;
        }
        stamp_segment(&mut self.raster, last, point, session.color, session.width);
        session.points.push(point);
        self.revision += 1;
    }

    pub fn end_stroke(&mut self) {
        self.session = None;
    }

    /// Fill the raster with the background color. An active stroke session
    /// survives and keeps drawing afterwards.
    pub fn clear(&mut self) {
        self.raster.fill(self.background);
        self.revision += 1;
    }

    /// Encode the current raster as a PNG data URI.
    pub fn export(&self) -> Result<String> {
        export::to_data_uri(&self.raster)
    }

    #[cfg(test)]
    fn session_point_count(&self) -> usize {
        self.session.as_ref().map(|s| s.points.len()).unwrap_or(0)
    }
}

fn should_append_point(last: (i32, i32), point: (i32, i32)) -> bool {
    let dx = point.0 as i64 - last.0 as i64;
    let dy = point.1 as i64 - last.1 as i64;
    dx * dx + dy * dy >= MIN_POINT_DIST_SQ
}
