/// Character-grid drawing surface for terminal output
use axoplot_core::{Color, DrawingSurface, PixelPoint};
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Character used for polygon outlines and curves
const STROKE_CHAR: char = '+';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

/// A terminal screen treated as a pixel grid, one character per pixel.
///
/// Pixel `(x, y)` covers the unit square `[x, x + 1) x [y, y + 1)`; fills
/// sample each square at its center.
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(Color::BLACK); width * height],
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cells.get_mut(y as usize * self.width + x as usize)
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.ch = STROKE_CHAR;
            cell.fg = color;
        }
    }

    /// Bresenham line between two pixels, both ends included, clipped to
    /// the canvas
    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        let Some((from, to)) = clip_segment(from, to, self.width, self.height) else {
            return;
        };
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, color);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write the whole grid at the top-left of the terminal
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current: Option<(Color, Color)> = None;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some((cell.fg, cell.bg)) {
                    writer.queue(SetForegroundColor(term_color(cell.fg)))?;
                    writer.queue(SetBackgroundColor(term_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Liang-Barsky clip of a segment to the pixel rectangle
/// `[0, width - 1] x [0, height - 1]`; `None` when nothing is visible
fn clip_segment(
    from: PixelPoint,
    to: PixelPoint,
    width: usize,
    height: usize,
) -> Option<(PixelPoint, PixelPoint)> {
    if width == 0 || height == 0 {
        return None;
    }
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    let (x_max, y_max) = ((width - 1) as f64, (height - 1) as f64);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
        if t0 > t1 {
            return None;
        }
    }
    let at = |t: f64| {
        PixelPoint::new(
            (x0 + t * dx).round().clamp(0.0, x_max) as i32,
            (y0 + t * dy).round().clamp(0.0, y_max) as i32,
        )
    };
    Some((at(t0), at(t1)))
}

/// Spans `[start, end)` of pixel columns whose centers lie inside the
/// polygon on row `y` (even-odd rule)
fn scanline_spans(points: &[PixelPoint], y: i32) -> Vec<(i32, i32)> {
    let py = y as f64 + 0.5;
    let mut crossings: Vec<f64> = Vec::new();
    for (k, a) in points.iter().enumerate() {
        let b = points[(k + 1) % points.len()];
        let (ay, by) = (a.y as f64, b.y as f64);
        if (ay <= py) != (by <= py) {
            let t = (py - ay) / (by - ay);
            crossings.push(a.x as f64 + t * (b.x as f64 - a.x as f64));
        }
    }
    crossings.sort_by(|a, b| a.total_cmp(b));
    crossings
        .chunks_exact(2)
        .map(|pair| {
            let start = (pair[0] - 0.5).ceil() as i32;
            let end = (pair[1] - 0.5).ceil() as i32;
            (start, end)
        })
        .collect()
}

impl DrawingSurface for CharCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let rows = y.max(0)..y.saturating_add(height).min(self.height as i32);
        for row in rows {
            for column in x.max(0)..x.saturating_add(width).min(self.width as i32) {
                if let Some(cell) = self.cell_mut(column, row) {
                    *cell = Cell::blank(color);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[PixelPoint], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
        let max_y = points
            .iter()
            .map(|p| p.y)
            .max()
            .unwrap_or(0)
            .min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for (start, end) in scanline_spans(points, y) {
                for x in start.max(0)..end.min(self.width as i32) {
                    if let Some(cell) = self.cell_mut(x, y) {
                        *cell = Cell::blank(color);
                    }
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[PixelPoint], color: Color) {
        match points {
            [] => {}
            [only] => self.plot(only.x, only.y, color),
            _ => {
                for (k, &a) in points.iter().enumerate() {
                    self.line(a, points[(k + 1) % points.len()], color);
                }
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[PixelPoint], color: Color) {
        for segment in points.windows(2) {
            self.line(segment[0], segment[1], color);
        }
    }
}
