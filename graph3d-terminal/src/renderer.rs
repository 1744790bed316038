/// ASCII canvas: orthographic X/Y projection of world space to terminal cells
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use graph3d_core::{LabelAlign, Object};
use std::io::Write;

const SURFACE_FILL: char = '░';
const EDGE_CHAR: char = '#';
const CURVE_CHAR: char = '*';
const GRID_CHAR: char = '·';

/// World units visible along the vertical axis (the axes span -10..10 plus
/// their labels).
const VISIBLE_UNITS: f64 = 24.0;

/// Character canvas with a graph area on the left and an information panel
/// on the right. Z is discarded at projection time.
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    chars: Vec<char>,
    colors: Vec<Color>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            chars: vec![' '; size],
            colors: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.chars.fill(' ');
        self.colors.fill(Color::Reset);
    }

    /// Columns reserved for the graph area; the rest is the side panel.
    fn graph_width(&self) -> usize {
        self.width * 3 / 4
    }

    /// Vertical cells per world unit. Terminal cells are roughly twice as
    /// tall as they are wide, so the horizontal scale doubles this.
    fn unit(&self) -> f64 {
        let fit_w = self.graph_width() as f64 / 2.0;
        let fit_h = self.height as f64;
        fit_w.min(fit_h) / VISIBLE_UNITS
    }

    /// Projects world X/Y onto the graph area, dropping Z.
    fn project(&self, x: f64, y: f64) -> (i32, i32) {
        let unit = self.unit();
        let cx = (self.graph_width() / 2) as f64;
        let cy = (self.height / 2) as f64;
        ((cx + x * unit * 2.0).round() as i32, (cy - y * unit).round() as i32)
    }

    /// Writes one cell, clipped to the graph area.
    fn plot(&mut self, x: i32, y: i32, ch: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.graph_width() || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.chars[idx] = ch;
        self.colors[idx] = color;
    }

    /// Writes one cell anywhere on the canvas (panel text included).
    fn put(&mut self, x: i32, y: i32, ch: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.chars[idx] = ch;
        self.colors[idx] = color;
    }

    fn write_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch, color);
        }
    }

    /// Clips a segment to the graph area (Cohen-Sutherland). Rasterization
    /// must never step through off-screen coordinates: a curve zoomed far
    /// past the viewport projects to endpoints near the i32 range, where
    /// the Bresenham error terms overflow.
    fn clip_to_graph(
        &self,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Option<((i32, i32), (i32, i32))> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const TOP: u8 = 4;
        const BOTTOM: u8 = 8;
        let x_max = self.graph_width() as f64 - 1.0;
        let y_max = self.height as f64 - 1.0;
        let outcode = |x: f64, y: f64| {
            let mut code = 0;
            if x < 0.0 {
                code |= LEFT;
            } else if x > x_max {
                code |= RIGHT;
            }
            if y < 0.0 {
                code |= TOP;
            } else if y > y_max {
                code |= BOTTOM;
            }
            code
        };
        let (mut x1, mut y1) = (f64::from(from.0), f64::from(from.1));
        let (mut x2, mut y2) = (f64::from(to.0), f64::from(to.1));
        let mut c1 = outcode(x1, y1);
        let mut c2 = outcode(x2, y2);
        loop {
            if (c1 | c2) == 0 {
                return Some((
                    (x1.round() as i32, y1.round() as i32),
                    (x2.round() as i32, y2.round() as i32),
                ));
            }
            if (c1 & c2) != 0 {
                return None;
            }
            let out = if c1 != 0 { c1 } else { c2 };
            let (x, y) = if (out & LEFT) != 0 {
                (0.0, y1 + (y2 - y1) * (0.0 - x1) / (x2 - x1))
            } else if (out & RIGHT) != 0 {
                (x_max, y1 + (y2 - y1) * (x_max - x1) / (x2 - x1))
            } else if (out & TOP) != 0 {
                (x1 + (x2 - x1) * (0.0 - y1) / (y2 - y1), 0.0)
            } else {
                (x1 + (x2 - x1) * (y_max - y1) / (y2 - y1), y_max)
            };
            if out == c1 {
                x1 = x;
                y1 = y;
                c1 = outcode(x1, y1);
            } else {
                x2 = x;
                y2 = y;
                c2 = outcode(x2, y2);
            }
        }
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), ch: char, color: Color) {
        let Some((from, to)) = self.clip_to_graph(from, to) else {
            return;
        };
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, ch, color);
            if (x, y) == to {
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

    /// Even-odd scanline fill of a closed polygon in screen coordinates.
    fn fill_polygon(&mut self, pts: &[(i32, i32)], ch: char, color: Color) {
        if pts.len() < 3 {
            return;
        }
        let min_y = pts.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let max_y = pts
            .iter()
            .map(|p| p.1)
            .max()
            .unwrap_or(0)
            .min(self.height as i32 - 1);
        for y in min_y..=max_y {
            let mut crossings = Vec::new();
            for i in 0..pts.len() {
                let (x1, y1) = pts[i];
                let (x2, y2) = pts[(i + 1) % pts.len()];
                if (y1 <= y && y2 > y) || (y2 <= y && y1 > y) {
                    let t = f64::from(y - y1) / f64::from(y2 - y1);
                    crossings.push(f64::from(x1) + t * f64::from(x2 - x1));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks(2) {
                if let [a, b] = pair {
                    // spans are clamped so huge projected polygons stay bounded
                    let lo = (a.round() as i32).max(0);
                    let hi = (b.round() as i32).min(self.graph_width() as i32 - 1);
                    for x in lo..=hi {
                        self.plot(x, y, ch, color);
                    }
                }
            }
        }
    }

    /// Renders one frame: grid, surfaces, edges, curves, labels, and the
    /// side panel.
    pub fn render_world(&mut self, objects: &[Object], status: &str, fps: f32) {
        self.clear();
        self.draw_grid();

        for o in objects {
            let color = color_for(&o.color);
            for s in &o.surfaces {
                let pts: Vec<(i32, i32)> = s
                    .0
                    .iter()
                    .map(|&i| self.project(o.points[i].x, o.points[i].y))
                    .collect();
                self.fill_polygon(&pts, SURFACE_FILL, color);
            }
            for e in &o.edges {
                let from = self.project(o.points[e.0].x, o.points[e.0].y);
                let to = self.project(o.points[e.1].x, o.points[e.1].y);
                self.draw_line(from, to, EDGE_CHAR, color);
            }
        }

        // Plotted curves: a polyline through each non-axes object's points.
        for o in objects.iter().filter(|o| o.name != "axes") {
            let color = color_for(&o.color);
            let mut prev = None;
            for p in &o.points {
                let cur = self.project(p.x, p.y);
                if let Some(prev) = prev {
                    self.draw_line(prev, cur, CURVE_CHAR, color);
                }
                prev = Some(cur);
            }
        }

        for o in objects {
            for p in &o.points {
                if let Some(label) = &p.label {
                    let (x, y) = self.project(p.x, p.y);
                    let offset = match p.align {
                        LabelAlign::Left => 0,
                        LabelAlign::Center => label.chars().count() as i32 / 2,
                        LabelAlign::Right => label.chars().count() as i32,
                    };
                    self.write_text(x - offset, y, label, Color::White);
                }
            }
        }

        self.draw_panel(objects, status, fps);
    }

    fn draw_grid(&mut self) {
        let unit = self.unit();
        let step_y = unit.max(1.0).round() as usize;
        let step_x = (unit * 2.0).max(1.0).round() as usize;
        for y in (0..self.height).step_by(step_y) {
            for x in (0..self.graph_width()).step_by(step_x) {
                self.plot(x as i32, y as i32, GRID_CHAR, Color::DarkGrey);
            }
        }
    }

    fn draw_panel(&mut self, objects: &[Object], status: &str, fps: f32) {
        let x = self.graph_width() as i32 + 2;
        let mut y = 1;
        self.write_text(x, y, "Operation:", Color::Yellow);
        y += 1;
        self.write_text(x, y, status, Color::White);
        y += 2;
        for help in [
            "wasd/arrows/numpad: rotate",
            "+/-: roll",
            "z/x or wheel: zoom",
            "q: quit",
        ] {
            self.write_text(x, y, help, Color::Blue);
            y += 1;
        }
        y += 1;
        for o in objects.iter().filter(|o| o.name != "axes") {
            self.write_text(x, y, &o.name, Color::White);
            y += 1;
            if let Some(eq) = &o.equation {
                self.write_text(x + 2, y, eq, color_for(&o.color));
                y += 1;
            }
            y += 1;
        }
        let fps_line = format!("FPS: {fps:.1}");
        self.write_text(x, self.height as i32 - 2, &fps_line, Color::DarkGrey);
    }

    /// Queues the canvas to the writer, one row at a time.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut last = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.colors[idx];
                if last != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    last = Some(color);
                }
                writer.queue(Print(self.chars[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn char_at(&self, x: usize, y: usize) -> char {
        self.chars[y * self.width + x]
    }
}

/// Maps the object model's colour names onto terminal colours.
pub fn color_for(name: &str) -> Color {
    match name {
        "grey" => Color::DarkGrey,
        "blue" => Color::Blue,
        "red" => Color::Red,
        "green" => Color::Green,
        "darkgoldenrod" => Color::Yellow,
        "chocolate" => Color::DarkYellow,
        // black is unreadable on dark terminals
        "black" => Color::White,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_graph_center() {
        let canvas = AsciiCanvas::new(100, 40);
        let (x, y) = canvas.project(0.0, 0.0);
        assert_eq!((x, y), (37, 20));
    }

    #[test]
    fn projection_discards_z_and_flips_y() {
        let canvas = AsciiCanvas::new(100, 40);
        let (cx, cy) = canvas.project(0.0, 0.0);
        let (_, up) = canvas.project(0.0, 5.0);
        let (right, _) = canvas.project(5.0, 0.0);
        assert!(up < cy);
        assert!(right > cx);
    }

    #[test]
    fn line_covers_endpoints() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.draw_line((1, 1), (8, 5), '#', Color::White);
        assert_eq!(canvas.char_at(1, 1), '#');
        assert_eq!(canvas.char_at(8, 5), '#');
    }

    #[test]
    fn polygon_fill_covers_interior() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.fill_polygon(&[(2, 2), (10, 2), (10, 8), (2, 8)], '░', Color::DarkGrey);
        assert_eq!(canvas.char_at(6, 5), '░');
        assert_eq!(canvas.char_at(1, 5), ' ');
        assert_eq!(canvas.char_at(12, 5), ' ');
    }

    #[test]
    fn graph_plot_is_clipped_to_graph_area() {
        let mut canvas = AsciiCanvas::new(40, 20);
        // graph area is 30 columns wide
        canvas.plot(35, 5, '#', Color::White);
        assert_eq!(canvas.char_at(35, 5), ' ');
        canvas.put(35, 5, 'a', Color::White);
        assert_eq!(canvas.char_at(35, 5), 'a');
    }

    #[test]
    fn label_alignment_offsets() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.write_text(5, 3, "abc", Color::White);
        assert_eq!(canvas.char_at(5, 3), 'a');
        assert_eq!(canvas.char_at(7, 3), 'c');
    }

    #[test]
    fn far_offscreen_line_clips_to_graph_area() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.draw_line((0, 0), (2_000_000_000, 1), '#', Color::White);
        assert_eq!(canvas.char_at(0, 0), '#');
        // graph area ends at column 29
        assert_eq!(canvas.char_at(29, 0), '#');
    }

    #[test]
    fn fully_offscreen_line_draws_nothing() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.draw_line((-50, -10), (-5, -1), '#', Color::White);
        canvas.draw_line((i32::MIN, 5), (-1, 5), '#', Color::White);
        assert!(canvas.chars.iter().all(|&c| c == ' '));
    }

    #[test]
    fn segment_crossing_the_viewport_keeps_its_visible_run() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.draw_line((-100, 10), (100, 10), '#', Color::White);
        assert_eq!(canvas.char_at(0, 10), '#');
        assert_eq!(canvas.char_at(15, 10), '#');
        assert_eq!(canvas.char_at(29, 10), '#');
    }

    #[test]
    fn polygon_spans_are_clamped_to_graph_area() {
        let mut canvas = AsciiCanvas::new(40, 20);
        canvas.fill_polygon(
            &[
                (-1_000_000, 2),
                (1_000_000, 2),
                (1_000_000, 8),
                (-1_000_000, 8),
            ],
            '░',
            Color::DarkGrey,
        );
        assert_eq!(canvas.char_at(0, 5), '░');
        assert_eq!(canvas.char_at(29, 5), '░');
        assert_eq!(canvas.char_at(30, 5), ' ');
    }

    #[test]
    fn color_names_map() {
        assert_eq!(color_for("grey"), Color::DarkGrey);
        assert_eq!(color_for("darkgoldenrod"), Color::Yellow);
        assert_eq!(color_for("chocolate"), Color::DarkYellow);
        assert_eq!(color_for("black"), Color::White);
        assert_eq!(color_for("no-such-colour"), Color::White);
    }
}
