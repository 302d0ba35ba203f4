//! Color types and palette downgrading.

use crate::error::{Result, WeftError};

/// A terminal color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Reset to the terminal's default color.
    Reset,
    /// 256-color palette index (0-15 named, 16-231 cube, 232-255 gray ramp).
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard black (palette 0).
    pub const BLACK: Self = Self::Indexed(0);
    /// Standard red (palette 1).
    pub const RED: Self = Self::Indexed(1);
    /// Standard green (palette 2).
    pub const GREEN: Self = Self::Indexed(2);
    /// Standard yellow (palette 3).
    pub const YELLOW: Self = Self::Indexed(3);
    /// Standard blue (palette 4).
    pub const BLUE: Self = Self::Indexed(4);
    /// Standard magenta (palette 5).
    pub const MAGENTA: Self = Self::Indexed(5);
    /// Standard cyan (palette 6).
    pub const CYAN: Self = Self::Indexed(6);
    /// Standard white (palette 7).
    pub const WHITE: Self = Self::Indexed(7);

    /// Parse a hex color string like `"#rrggbb"` or `"#rgb"`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        match hex.len() {
            6 => {
                let r = parse_channel(&hex[0..2])?;
                let g = parse_channel(&hex[2..4])?;
                let b = parse_channel(&hex[4..6])?;
                Ok(Self::Rgb(r, g, b))
            }
            3 => {
                let r = parse_channel(&hex[0..1])?;
                let g = parse_channel(&hex[1..2])?;
                let b = parse_channel(&hex[2..3])?;
                Ok(Self::Rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(WeftError::Render(format!(
                "invalid hex color length: expected 3 or 6, got {}",
                hex.len()
            ))),
        }
    }

    /// Downgrade this color to the given support level.
    ///
    /// True color terminals pass RGB through; 256-color terminals map
    /// RGB onto the 6x6x6 cube or the 24-step gray ramp; 16-color
    /// terminals also fold palette indices down to 0-15.
    pub fn downgrade(self, support: ColorSupport) -> Color {
        match support {
            ColorSupport::TrueColor => self,
            ColorSupport::Extended256 => match self {
                Color::Rgb(r, g, b) => Color::Indexed(rgb_to_256(r, g, b)),
                other => other,
            },
            ColorSupport::Basic16 => match self {
                Color::Rgb(r, g, b) => Color::Indexed(rgb_to_16(r, g, b)),
                Color::Indexed(i) => Color::Indexed(index_to_16(i)),
                Color::Reset => Color::Reset,
            },
        }
    }
}

/// Level of color support available on the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSupport {
    /// 16 ANSI colors.
    Basic16,
    /// 256 color palette.
    Extended256,
    /// 24-bit true color.
    TrueColor,
}

fn parse_channel(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|e| WeftError::Render(format!("invalid hex color: {e}")))
}

/// Map an 8-bit channel value onto the 6-level cube axis (0, 95, 135, 175, 215, 255).
fn cube_index(val: u8) -> u8 {
    if val < 48 {
        0
    } else if val < 115 {
        1
    } else {
        ((u16::from(val) - 35) / 40) as u8
    }
}

/// The channel value a cube axis index renders as.
fn cube_value(idx: u8) -> u8 {
    if idx == 0 { 0 } else { 55 + 40 * idx }
}

/// Map RGB to the nearest 256-color palette index.
///
/// Chooses between the 6x6x6 color cube (16-231) and the 24-step
/// grayscale ramp (232-255), whichever is closer in RGB space.
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    let ri = cube_index(r);
    let gi = cube_index(g);
    let bi = cube_index(b);
    let cube = 16 + 36 * ri + 6 * gi + bi;
    let cube_dist = dist(r, cube_value(ri)) + dist(g, cube_value(gi)) + dist(b, cube_value(bi));

    // Grayscale ramp: 232 + i renders as 8 + 10*i, i in 0..24.
    let avg = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
    let gray_idx = if avg <= 8 {
        0
    } else {
        (((avg - 8) + 5) / 10).min(23) as u8
    };
    let gray_val = 8 + 10 * gray_idx;
    let gray_dist = dist(r, gray_val) + dist(g, gray_val) + dist(b, gray_val);

    if gray_dist < cube_dist {
        232 + gray_idx
    } else {
        cube
    }
}

/// Map RGB to the nearest of the 16 standard ANSI colors.
pub fn rgb_to_16(r: u8, g: u8, b: u8) -> u8 {
    const BASIC: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];

    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (i, &(cr, cg, cb)) in BASIC.iter().enumerate() {
        let d = dist(r, cr) + dist(g, cg) + dist(b, cb);
        if d < best_dist {
            best_dist = d;
            best = i as u8;
        }
    }
    best
}

/// Fold a 256-color index down to 0-15.
fn index_to_16(idx: u8) -> u8 {
    match idx {
        0..=15 => idx,
        16..=231 => {
            let i = idx - 16;
            let r = cube_value(i / 36);
            let g = cube_value((i / 6) % 6);
            let b = cube_value(i % 6);
            rgb_to_16(r, g, b)
        }
        _ => {
            let gray = 8 + 10 * (idx - 232);
            rgb_to_16(gray, gray, gray)
        }
    }
}

fn dist(a: u8, b: u8) -> u32 {
    let d = i32::from(a) - i32::from(b);
    (d * d) as u32
}
