use crate::sketch::raster::{RasterBuffer, Rgba};

/// Stamp a filled circle centered on `point`. The brush diameter equals the
/// stroke width, so consecutive stamps produce round caps and joins.
pub fn stamp_brush(buffer: &mut RasterBuffer, point: (i32, i32), color: Rgba, width: u32) {
    let radius = width.max(1) as f32 / 2.0;
    let radius_sq = radius * radius;
    let reach = radius.ceil() as i32;
    for y in (point.1 - reach)..=(point.1 + reach) {
        for x in (point.0 - reach)..=(point.0 + reach) {
            let dx = (x - point.0) as f32;
            let dy = (y - point.1) as f32;
            if dx * dx + dy * dy <= radius_sq {
                buffer.set_pixel(x, y, color);
            }
        }
    }
}

/// Stamp the brush along a Bresenham walk from `start` to `end`.
pub fn stamp_segment(
    buffer: &mut RasterBuffer,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgba,
    width: u32,
) {
    let (mut x0, mut y0) = start;
    let (x1, y1) = end;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp_brush(buffer, (x0, y0), color, width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
