//! Built-in 8x8 monochrome fill patterns.
//!
//! Pattern 0 is hollow and pattern 1 is solid. Bits set in a pattern row
//! draw the foreground colour; clear bits draw the background colour, or
//! nothing under a transparent raster op. Pixel `(x, y)` uses row `y & 7`,
//! bit `7 - (x & 7)`.

/// Number of the highest valid pattern index.
pub const MAX_PATTERN: usize = 32;

pub const PATTERN_HOLLOW: usize = 0;
pub const PATTERN_SOLID: usize = 1;

/// Row bitmaps, one byte per row, top row first.
const PATTERNS: [[u8; 8]; MAX_PATTERN + 1] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0 hollow
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], // 1 solid
    [0x88, 0x00, 0x22, 0x00, 0x88, 0x00, 0x22, 0x00], // 2 light dots
    [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55], // 3 50% checker
    [0x77, 0xFF, 0xDD, 0xFF, 0x77, 0xFF, 0xDD, 0xFF], // 4 dark dots
    [0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00], // 5 horizontal
    [0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x88], // 6 vertical
    [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01], // 7 diagonal down
    [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80], // 8 diagonal up
    [0xFF, 0x88, 0x88, 0x88, 0xFF, 0x88, 0x88, 0x88], // 9 grid
    [0x81, 0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x81], // 10 cross hatch
    [0x80, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00], // 11 sparse dots
    [0xCC, 0xCC, 0x33, 0x33, 0xCC, 0xCC, 0x33, 0x33], // 12 coarse checker
    [0xF0, 0xF0, 0xF0, 0xF0, 0x0F, 0x0F, 0x0F, 0x0F], // 13 big checker
    [0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00], // 14 thick horizontal
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC], // 15 thick vertical
    [0xC1, 0x83, 0x07, 0x0E, 0x1C, 0x38, 0x70, 0xE0], // 16 thick diagonal
    [0x83, 0xC1, 0xE0, 0x70, 0x38, 0x1C, 0x0E, 0x07], // 17 thick anti-diagonal
    [0x11, 0x22, 0x44, 0x88, 0x11, 0x22, 0x44, 0x88], // 18 fine diagonal
    [0x88, 0x44, 0x22, 0x11, 0x88, 0x44, 0x22, 0x11], // 19 fine anti-diagonal
    [0xFF, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80], // 20 open grid
    [0x08, 0x1C, 0x22, 0xC1, 0x80, 0x01, 0x02, 0x04], // 21 scales
    [0x88, 0x14, 0x22, 0x41, 0x88, 0x00, 0xAA, 0x00], // 22 weave
    [0x40, 0xA0, 0x00, 0x00, 0x04, 0x0A, 0x00, 0x00], // 23 specks
    [0x03, 0x84, 0x48, 0x30, 0x0C, 0x02, 0x01, 0x01], // 24 waves
    [0xF8, 0x74, 0x22, 0x47, 0x8F, 0x17, 0x22, 0x71], // 25 bricks diagonal
    [0xFF, 0x80, 0x80, 0x80, 0xFF, 0x08, 0x08, 0x08], // 26 bricks
    [0xAA, 0x00, 0xAA, 0x00, 0xAA, 0x00, 0xAA, 0x00], // 27 25% dots
    [0x55, 0xFF, 0x55, 0xFF, 0x55, 0xFF, 0x55, 0xFF], // 28 75% dots
    [0x00, 0x44, 0x00, 0x11, 0x00, 0x44, 0x00, 0x11], // 29 12% dots
    [0xEE, 0xDD, 0xBB, 0x77, 0xEE, 0xDD, 0xBB, 0x77], // 30 inverse fine diagonal
    [0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0xFF], // 31 framed
    [0x00, 0x7E, 0x7E, 0x7E, 0x7E, 0x7E, 0x7E, 0x00], // 32 tiles
];

/// Map an index to a valid pattern. Out-of-range indices fall back to solid.
///
/// Returns the index to use and whether it was replaced.
#[inline]
pub fn resolve_pattern(index: usize) -> (usize, bool) {
    if index > MAX_PATTERN {
        (PATTERN_SOLID, true)
    } else {
        (index, false)
    }
}

/// True when `pattern` has its foreground bit set at device pixel `(x, y)`.
#[inline]
pub fn pattern_bit(pattern: usize, x: i32, y: i32) -> bool {
    let rows = &PATTERNS[resolve_pattern(pattern).0];
    let row = rows[(y & 7) as usize];
    row & (0x80 >> (x & 7)) != 0
}

// ============================================================================
// Tests
// ============================================================================
