use crate::foundation::error::{PairframeError, PairframeResult};

/// Straight-alpha RGBA8 color parsed from a caption option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB`, or `#RRGGBBAA` (leading `#` optional, case-insensitive).
pub fn parse_hex(s: &str) -> PairframeResult<Rgba8> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);

    if !digits.is_ascii() {
        return Err(invalid(s));
    }

    fn nibble(c: u8) -> Option<u8> {
        (c as char).to_digit(16).map(|d| d as u8)
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        if !pair.bytes().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u8::from_str_radix(pair, 16).ok()
    }

    let parsed = match digits.len() {
        3 | 4 => {
            let mut out = [255u8; 4];
            for (i, c) in digits.bytes().enumerate() {
                let n = nibble(c).ok_or_else(|| invalid(s))?;
                out[i] = n * 17;
            }
            Some(Rgba8 {
                r: out[0],
                g: out[1],
                b: out[2],
                a: out[3],
            })
        }
        6 | 8 => {
            let a = if digits.len() == 8 {
                hex_byte(&digits[6..8])
            } else {
                Some(255)
            };
            match (
                hex_byte(&digits[0..2]),
                hex_byte(&digits[2..4]),
                hex_byte(&digits[4..6]),
                a,
            ) {
                (Some(r), Some(g), Some(b), Some(a)) => Some(Rgba8 { r, g, b, a }),
                _ => None,
            }
        }
        _ => None,
    };

    parsed.ok_or_else(|| invalid(s))
}

fn invalid(s: &str) -> PairframeError {
    PairframeError::validation(format!(
        "color \"{s}\" must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(parse_hex("#000000").unwrap(), Rgba8::BLACK);
        assert_eq!(parse_hex("#FFFFFF").unwrap(), Rgba8::WHITE);
        assert_eq!(parse_hex("ff8000").unwrap(), Rgba8::opaque(255, 128, 0));
        assert_eq!(parse_hex("#f80").unwrap(), Rgba8::opaque(255, 136, 0));
        assert_eq!(
            parse_hex("#11223380").unwrap(),
            Rgba8 {
                r: 0x11,
                g: 0x22,
                b: 0x33,
                a: 0x80
            }
        );
        assert_eq!(parse_hex("#0008").unwrap().a, 0x88);
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "red", "#ééé", "#+1+2+3", "#+1+2+3+4"] {
            assert!(parse_hex(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
