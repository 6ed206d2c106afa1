use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::*;

/// Alpha of a pixel that has not been scratched.
pub const OPAQUE: u8 = u8::MAX;

/// Alpha written by the brush.
pub const CLEAR: u8 = 0;

/// Pixels with alpha below this count as revealed, i.e. less than 10% opacity.
pub const REVEALED_ALPHA: u8 = 26;

/// Revealed versus sampled pixel counts for one region of a mask.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub revealed: u64,
    pub sampled: u64,
}

impl Coverage {
    pub fn ratio(self) -> f32 {
        if self.sampled == 0 {
            0.0
        } else {
            self.revealed as f32 / self.sampled as f32
        }
    }
}

/// Per-pixel alpha for one scratchable surface, stored row-major with row `0` at the bottom edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchMask {
    alpha: Array2<u8>,
}

impl ScratchMask {
    pub fn new((width, height): Px2) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidGeometry);
        }
        Ok(Self::opaque((width, height)))
    }

    /// Fully opaque mask, each side at least one pixel.
    pub fn opaque((width, height): Px2) -> Self {
        Self {
            alpha: Array2::from_elem((height.max(1) as usize, width.max(1) as usize), OPAQUE),
        }
    }

    pub fn size(&self) -> Px2 {
        let (rows, cols) = self.alpha.dim();
        (cols as Px, rows as Px)
    }

    pub fn width(&self) -> Px {
        self.size().0
    }

    pub fn height(&self) -> Px {
        self.size().1
    }

    pub fn alpha_at(&self, (x, y): Px2) -> Option<u8> {
        self.alpha.get((y as usize, x as usize)).copied()
    }

    pub fn is_revealed_at(&self, coords: Px2) -> bool {
        self.alpha_at(coords)
            .is_some_and(|alpha| alpha < REVEALED_ALPHA)
    }

    /// Raw alpha rows, for uploading to a texture.
    pub fn alpha(&self) -> &Array2<u8> {
        &self.alpha
    }

    /// Makes every pixel opaque again.
    pub fn reset(&mut self) {
        self.alpha.fill(OPAQUE);
    }

    /// Clears a filled circle centered on `(cx, cy)`, returning how many pixels changed.
    ///
    /// For each column offset `x` in `0..=radius` the half-chord `ceil(sqrt(radius² - x²))` is
    /// filled on all four quadrants. The center may lie outside the mask; anything off the mask
    /// is skipped.
    pub fn erase_circle(&mut self, (cx, cy): (i64, i64), radius: Px) -> usize {
        let (width, height) = self.size();
        let radius = i64::from(radius);
        let mut changed = 0;

        for dx in 0..=radius {
            let half_chord = ceil_sqrt((radius * radius - dx * dx) as u64) as i64;
            for dy in 0..=half_chord {
                for (px, py) in [
                    (cx + dx, cy + dy),
                    (cx - dx, cy + dy),
                    (cx + dx, cy - dy),
                    (cx - dx, cy - dy),
                ] {
                    if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                        continue;
                    }
                    let pixel = &mut self.alpha[(py as usize, px as usize)];
                    if *pixel != CLEAR {
                        *pixel = CLEAR;
                        changed += 1;
                    }
                }
            }
        }

        changed
    }

    /// Counts revealed pixels inside `rect`, clipped to the mask.
    pub fn coverage(&self, rect: PixelRect) -> Coverage {
        let (width, height) = self.size();
        let x0 = rect.x.min(width) as usize;
        let y0 = rect.y.min(height) as usize;
        let x1 = rect.x.saturating_add(rect.width).min(width) as usize;
        let y1 = rect.y.saturating_add(rect.height).min(height) as usize;

        let region = self.alpha.slice(s![y0..y1, x0..x1]);
        Coverage {
            revealed: region
                .iter()
                .filter(|&&alpha| alpha < REVEALED_ALPHA)
                .count() as u64,
            sampled: region.len() as u64,
        }
    }

    pub fn total_coverage(&self) -> Coverage {
        let (width, height) = self.size();
        self.coverage(PixelRect::new(0, 0, width, height))
    }
}

fn ceil_sqrt(n: u64) -> u64 {
    let root = n.isqrt();
    if root * root < n { root + 1 } else { root }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mask_is_fully_opaque() {
        let mask = ScratchMask::new((4, 3)).unwrap();

        assert_eq!(mask.size(), (4, 3));
        assert_eq!(mask.total_coverage(), Coverage { revealed: 0, sampled: 12 });
        assert_eq!(ScratchMask::new((0, 3)), Err(GameError::InvalidGeometry));
    }

    #[test]
    fn ceil_sqrt_rounds_up() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(9), 3);
        assert_eq!(ceil_sqrt(10), 4);
    }

    #[test]
    fn zero_radius_clears_single_pixel() {
        let mut mask = ScratchMask::new((5, 5)).unwrap();

        assert_eq!(mask.erase_circle((2, 2), 0), 1);
        assert!(mask.is_revealed_at((2, 2)));
        assert_eq!(mask.total_coverage().revealed, 1);
    }

    #[test]
    fn circle_is_symmetric_and_bounded() {
        let mut mask = ScratchMask::new((21, 21)).unwrap();

        mask.erase_circle((10, 10), 3);

        for (x, y) in [(13, 10), (7, 10), (10, 13), (10, 7)] {
            assert!(mask.is_revealed_at((x, y)), "{x},{y}");
        }
        assert!(!mask.is_revealed_at((14, 10)));
        assert!(!mask.is_revealed_at((10, 6)));
        assert!(!mask.is_revealed_at((14, 14)));
    }

    #[test]
    fn repeated_stroke_changes_nothing() {
        let mut mask = ScratchMask::new((16, 16)).unwrap();

        let first = mask.erase_circle((8, 8), 4);
        let second = mask.erase_circle((8, 8), 4);

        assert!(first > 0);
        assert_eq!(second, 0);
    }

    #[test]
    fn strokes_off_the_edge_are_clipped() {
        let mut mask = ScratchMask::new((8, 8)).unwrap();

        mask.erase_circle((-2, -2), 3);
        assert!(mask.is_revealed_at((0, 0)));

        let changed = mask.erase_circle((100, 100), 3);
        assert_eq!(changed, 0);
    }

    #[test]
    fn coverage_counts_only_the_requested_rect() {
        let mut mask = ScratchMask::new((10, 10)).unwrap();
        mask.erase_circle((1, 1), 1);

        let left = mask.coverage(PixelRect::new(0, 0, 5, 5));
        let right = mask.coverage(PixelRect::new(5, 5, 5, 5));

        assert_eq!(left.sampled, 25);
        assert!(left.revealed > 0);
        assert_eq!(right, Coverage { revealed: 0, sampled: 25 });
    }

    #[test]
    fn coverage_rect_is_clipped_to_mask() {
        let mask = ScratchMask::new((4, 4)).unwrap();

        let coverage = mask.coverage(PixelRect::new(2, 2, 10, 10));

        assert_eq!(coverage.sampled, 4);
        assert_eq!(Coverage::default().ratio(), 0.0);
    }

    #[test]
    fn reset_restores_opacity() {
        let mut mask = ScratchMask::new((6, 6)).unwrap();
        mask.erase_circle((3, 3), 2);

        mask.reset();

        assert_eq!(mask.total_coverage().revealed, 0);
    }
}
