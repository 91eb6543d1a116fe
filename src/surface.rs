//! Braille dot surfaces: each terminal cell holds a 2x4 grid of dots

use crate::color::Rgb;
use crate::terminal::Terminal;

/// Dots fainter than this are not drawn at all
const ALPHA_FLOOR: f32 = 0.06;

/// Bit for each (row, col) dot inside a braille cell
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Anything the beacon overlay can paint on
pub trait Surface {
    /// Drawable size in dots, `None` until the surface has been sized
    fn size(&self) -> Option<(usize, usize)>;
    fn clear(&mut self);
    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgb, alpha: f32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32);
}

/// A transparent dot layer
#[derive(Clone, Debug)]
pub struct DotCanvas {
    width: usize,
    height: usize,
    dots: Vec<Option<Rgb>>,
    background: Rgb,
}

impl DotCanvas {
    pub fn new(background: Rgb) -> Self {
        Self {
            width: 0,
            height: 0,
            dots: Vec::new(),
            background,
        }
    }

    /// Size the canvas to cover `cols` x `rows` terminal cells
    pub fn resize_cells(&mut self, cols: u16, rows: u16) {
        self.width = cols as usize * 2;
        self.height = rows as usize * 4;
        self.dots = vec![None; self.width * self.height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn lit(&self) -> usize {
        self.dots.iter().filter(|d| d.is_some()).count()
    }

    /// Light the dot containing `(x, y)`
    pub fn plot(&mut self, x: f32, y: f32, color: Rgb) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (ix, iy) = (x as usize, y as usize);
        if ix < self.width && iy < self.height {
            self.dots[iy * self.width + ix] = Some(color);
        }
    }

    fn plot_alpha(&mut self, x: f32, y: f32, color: Rgb, alpha: f32) {
        if alpha >= ALPHA_FLOOR {
            let c = color.blend_over(self.background, alpha);
            self.plot(x, y, c);
        }
    }

    /// Visit the centre of every dot within `reach` of `(cx, cy)`
    fn for_dots_near(&self, cx: f32, cy: f32, reach: f32, mut f: impl FnMut(f32, f32, f32)) {
        let x0 = (cx - reach).floor().max(0.0) as usize;
        let y0 = (cy - reach).floor().max(0.0) as usize;
        let x1 = ((cx + reach).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + reach).ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                f(px, py, d);
            }
        }
    }

    /// Braille character and colour for one cell, `None` when the cell is empty.
    /// The brightest dot decides the colour.
    pub fn cell(&self, col: usize, row: usize) -> Option<(u8, Rgb)> {
        let mut bits = 0u8;
        let mut color: Option<Rgb> = None;
        for (dy, row_bits) in DOT_BITS.iter().enumerate() {
            for (dx, bit) in row_bits.iter().enumerate() {
                if let Some(c) = self.get(col * 2 + dx, row * 4 + dy) {
                    bits |= bit;
                    if color.map_or(true, |best| c.luma() > best.luma()) {
                        color = Some(c);
                    }
                }
            }
        }
        color.map(|c| (bits, c))
    }
}

impl Surface for DotCanvas {
    fn size(&self) -> Option<(usize, usize)> {
        (self.width > 0 && self.height > 0).then_some((self.width, self.height))
    }

    fn clear(&mut self) {
        self.dots.fill(None);
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let half = (width / 2.0).max(0.5);
        let mut hits = Vec::new();
        self.for_dots_near(cx, cy, radius + half, |px, py, d| {
            if (d - radius).abs() <= half {
                hits.push((px, py));
            }
        });
        for (px, py) in hits {
            self.plot_alpha(px, py, color, alpha);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let mut hits = vec![(cx, cy)];
        self.for_dots_near(cx, cy, radius, |px, py, d| {
            if d <= radius {
                hits.push((px, py));
            }
        });
        for (px, py) in hits {
            self.plot_alpha(px, py, color, alpha);
        }
    }
}

/// Convert a dot pattern to its braille character
pub fn braille(bits: u8) -> char {
    char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
}

/// Draw `base` with `overlay` composited on top into the terminal buffer.
/// Overlay cells keep the base dots beneath them but take the overlay colour.
pub fn compose(base: &DotCanvas, overlay: &DotCanvas, term: &mut Terminal) {
    let (cols, rows) = term.size();
    for row in 0..rows as usize {
        for col in 0..cols as usize {
            let under = base.cell(col, row);
            let cell = match (under, overlay.cell(col, row)) {
                (Some((b, _)), Some((o, c))) => Some((b | o, c, true)),
                (None, Some((o, c))) => Some((o, c, true)),
                (Some((b, c)), None) => Some((b, c, false)),
                (None, None) => None,
            };
            if let Some((bits, color, bold)) = cell {
                term.set(col as i32, row as i32, braille(bits), Some(color.into()), bold);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn canvas(cols: u16, rows: u16) -> DotCanvas {
        let mut c = DotCanvas::new(Rgb::BLACK);
        c.resize_cells(cols, rows);
        c
    }

    #[test]
    fn unsized_canvas_reports_no_size() {
        let c = DotCanvas::new(Rgb::BLACK);
        assert_eq!(c.size(), None);
        assert_eq!(canvas(10, 5).size(), Some((20, 20)));
    }

    #[test]
    fn plot_ignores_out_of_bounds() {
        let mut c = canvas(2, 1);
        c.plot(-1.0, 0.0, WHITE);
        c.plot(4.0, 0.0, WHITE);
        c.plot(0.0, 4.0, WHITE);
        assert_eq!(c.lit(), 0);
        c.plot(3.9, 3.9, WHITE);
        assert_eq!(c.get(3, 3), Some(WHITE));
    }

    #[test]
    fn cell_packs_braille_bits() {
        let mut c = canvas(1, 1);
        c.plot(0.0, 0.0, WHITE);
        c.plot(1.0, 3.0, WHITE);
        let (bits, _) = c.cell(0, 0).unwrap();
        assert_eq!(bits, 0x01 | 0x80);
        assert_eq!(braille(bits), '\u{2881}');
        assert_eq!(c.cell(0, 1), None);
    }

    #[test]
    fn brightest_dot_wins_cell_colour() {
        let mut c = canvas(1, 1);
        c.plot(0.0, 0.0, Rgb::new(40, 40, 40));
        c.plot(1.0, 1.0, Rgb::new(200, 200, 200));
        assert_eq!(c.cell(0, 0).unwrap().1, Rgb::new(200, 200, 200));
    }

    #[test]
    fn stroke_draws_a_ring_not_a_disc() {
        let mut c = canvas(20, 10);
        c.stroke_circle(20.0, 20.0, 8.0, 1.0, WHITE, 1.0);
        assert!(c.lit() > 20);
        assert_eq!(c.get(20, 20), None);
        assert!(c.get(28, 20).is_some() || c.get(27, 20).is_some());
    }

    #[test]
    fn zero_radius_draws_nothing() {
        let mut c = canvas(4, 2);
        c.stroke_circle(4.0, 4.0, 0.0, 2.0, WHITE, 1.0);
        c.fill_circle(4.0, 4.0, 0.0, WHITE, 1.0);
        assert_eq!(c.lit(), 0);
    }

    #[test]
    fn fill_covers_centre() {
        let mut c = canvas(10, 5);
        c.fill_circle(10.2, 10.7, 2.0, WHITE, 1.0);
        assert_eq!(c.get(10, 10), Some(WHITE));
        assert!(c.lit() >= 9);
    }

    #[test]
    fn alpha_blends_toward_background() {
        let mut c = canvas(4, 2);
        c.fill_circle(2.0, 2.0, 0.4, WHITE, 0.5);
        assert_eq!(c.get(2, 2), Some(Rgb::new(128, 128, 128)));
    }

    #[test]
    fn faint_dots_are_skipped() {
        let mut c = canvas(4, 2);
        c.fill_circle(2.0, 2.0, 2.0, WHITE, 0.01);
        assert_eq!(c.lit(), 0);
    }

    #[test]
    fn clear_empties_everything() {
        let mut c = canvas(4, 2);
        c.fill_circle(4.0, 4.0, 3.0, WHITE, 1.0);
        assert!(c.lit() > 0);
        c.clear();
        assert_eq!(c.lit(), 0);
        assert_eq!(c.size(), Some((8, 8)));
    }

    #[test]
    fn compose_prefers_overlay_colour() {
        let mut term = Terminal::headless(2, 1);
        let mut base = canvas(2, 1);
        let mut overlay = canvas(2, 1);
        base.plot(0.0, 0.0, Rgb::new(50, 50, 50));
        base.plot(2.0, 0.0, Rgb::new(50, 50, 50));
        overlay.plot(1.0, 0.0, Rgb::new(212, 163, 115));

        compose(&base, &overlay, &mut term);

        let first = term.cell(0, 0).unwrap();
        assert_eq!(first.ch, braille(0x01 | 0x08));
        assert_eq!(first.fg, Some(Rgb::new(212, 163, 115).into()));
        assert!(first.bold);
        let second = term.cell(1, 0).unwrap();
        assert_eq!(second.ch, braille(0x01));
        assert!(!second.bold);
    }
}
