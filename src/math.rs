//! Fixed-point and table trigonometry.
//!
//! 16.16 fixed-point multiply, divide and square root, and integer sine,
//! cosine and arcsine over angles measured in tenths of a degree.

/// A signed 16.16 fixed-point number.
pub type Fixed = i32;

/// 1.0 in 16.16.
pub const FIXED_ONE: Fixed = 1 << 16;

/// Saturated magnitude returned on fixed-point overflow.
pub const FIXED_MAX: Fixed = 0x7FFF_FFFF;

/// Angles are in tenths of a degree; a full turn is 3600.
pub const FULL_TURN: i32 = 3600;

// ============================================================================
// Fixed-point arithmetic
// ============================================================================

/// Convert an integer to 16.16.
#[inline]
pub fn to_fixed(v: i32) -> Fixed {
    v << 16
}

/// Integer part of a 16.16 value, truncated toward negative infinity.
#[inline]
pub fn fixed_floor(v: Fixed) -> i32 {
    v >> 16
}

#[inline]
fn sign_of(a: i32, b: i32) -> i32 {
    if (a < 0) != (b < 0) {
        -1
    } else {
        1
    }
}

/// Multiply two 16.16 values, truncating the fraction toward zero.
///
/// Products whose magnitude does not fit in 31 bits saturate to
/// `±FIXED_MAX` with the sign of the true product.
pub fn fix_mul(a: Fixed, b: Fixed) -> Fixed {
    let sign = sign_of(a, b);
    let product = (a.unsigned_abs() as u64 * b.unsigned_abs() as u64) >> 16;
    if product >= 0x8000_0000 {
        FIXED_MAX * sign
    } else {
        product as i32 * sign
    }
}

/// Divide two 16.16 values, truncating toward zero.
///
/// A zero operand yields zero. Quotients too large for 16.16 saturate to
/// `±FIXED_MAX`.
pub fn fix_div(a: Fixed, b: Fixed) -> Fixed {
    if a == 0 || b == 0 {
        return 0;
    }
    let sign = sign_of(a, b);
    let quotient = ((a.unsigned_abs() as u64) << 16) / b.unsigned_abs() as u64;
    if quotient > FIXED_MAX as u64 {
        FIXED_MAX * sign
    } else {
        quotient as i32 * sign
    }
}

/// Square root of an unsigned 16.16 value by Newton iteration.
///
/// Starts from 1.0 and runs at most ten passes, stopping once a pass moves
/// the estimate by less than `0x80` (about 0.002).
pub fn fix_sqrt(root: u32) -> Fixed {
    if root == 0 {
        return 0;
    }
    let wide = (root as u64) << 16;
    let mut estimate: u64 = FIXED_ONE as u64;
    let mut next = 0u64;
    for _ in 0..10 {
        next = (estimate + wide / estimate) >> 1;
        if estimate.abs_diff(next) < 0x80 {
            break;
        }
        estimate = next.max(1);
    }
    next.min(FIXED_MAX as u64) as Fixed
}

// ============================================================================
// Trigonometry
// ============================================================================

/// sin(0..=90 degrees) in unsigned 0.16, one entry per whole degree.
const SIN_TABLE: [u16; 91] = [
    0x0000, 0x0478, 0x08EF, 0x0D66, 0x11DC, 0x1650, 0x1AC2, 0x1F33, 0x23A1, 0x280C, //
    0x2C74, 0x30D9, 0x353A, 0x3996, 0x3DEF, 0x4242, 0x4690, 0x4AD9, 0x4F1C, 0x5358, //
    0x578F, 0x5BBE, 0x5FE6, 0x6407, 0x6820, 0x6C31, 0x7039, 0x7439, 0x782F, 0x7C1C, //
    0x8000, 0x83DA, 0x87A9, 0x8B6D, 0x8F27, 0x92D6, 0x9679, 0x9A11, 0x9D9C, 0xA11B, //
    0xA48E, 0xA7F3, 0xAB4C, 0xAE97, 0xB1D5, 0xB505, 0xB827, 0xBB3A, 0xBE3F, 0xC135, //
    0xC41B, 0xC6F3, 0xC9BB, 0xCC73, 0xCF1C, 0xD1B4, 0xD43C, 0xD6B3, 0xD91A, 0xDB6F, //
    0xDDB4, 0xDFE7, 0xE209, 0xE419, 0xE617, 0xE804, 0xE9DE, 0xEBA6, 0xED5C, 0xEEFF, //
    0xF090, 0xF20E, 0xF378, 0xF4D0, 0xF615, 0xF747, 0xF865, 0xF970, 0xFA68, 0xFB4C, //
    0xFC1C, 0xFCD9, 0xFD82, 0xFE18, 0xFE99, 0xFF07, 0xFF60, 0xFFA6, 0xFFD8, 0xFFF6, //
    0xFFFF,
];

/// Reduce an angle in tenths of a degree into `[0, 3600)`.
#[inline]
pub fn normalize_angle(tenths: i32) -> i32 {
    tenths.rem_euclid(FULL_TURN)
}

/// Sine of an angle in tenths of a degree, as 16.16.
///
/// The angle is folded into the first quadrant, looked up by whole degree
/// and linearly interpolated on the tenths digit. sin(90°) is `0xFFFF`.
pub fn isin(tenths: i32) -> Fixed {
    let mut angle = normalize_angle(tenths);
    let mut sign = 1;
    if angle > 2700 {
        angle = FULL_TURN - angle;
        sign = -1;
    } else if angle > 1800 {
        angle -= 1800;
        sign = -1;
    } else if angle > 900 {
        angle = 1800 - angle;
    }

    let whole = (angle / 10) as usize;
    let frac = angle % 10;
    let mut result = SIN_TABLE[whole] as i32;
    if frac != 0 && whole < 90 {
        result += frac * (SIN_TABLE[whole + 1] as i32 - result) / 10;
    }
    result * sign
}

/// Cosine of an angle in tenths of a degree, as 16.16.
pub fn icos(tenths: i32) -> Fixed {
    if tenths == 0 {
        0xFFFF
    } else {
        isin(tenths + 900)
    }
}

/// Arcsine of a value in `[0, 1]` (low 16 bits of a 16.16), in tenths of a
/// degree within `[0, 900]`.
pub fn iasin(value: Fixed) -> i32 {
    let target = (value & 0xFFFF) as u32;
    let mut i = 1usize;
    while i < 90 && (SIN_TABLE[i] as u32) < target {
        i += 1;
    }
    let above = SIN_TABLE[i] as u32;
    let below = SIN_TABLE[i - 1] as u32;
    let mut back = 10 * above.saturating_sub(target);
    if back != 0 {
        back /= above - below;
    }
    (i as i32) * 10 - back as i32
}

// ============================================================================
// Tests
// ============================================================================
