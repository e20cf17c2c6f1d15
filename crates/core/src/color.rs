use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rrggbb`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_u32)
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

/// The 20-color categorical palette used for tiles and legend swatches.
pub const CATEGORY20: [Color; 20] = [
    Color::from_u32(0x1f77b4),
    Color::from_u32(0xaec7e8),
    Color::from_u32(0xff7f0e),
    Color::from_u32(0xffbb78),
    Color::from_u32(0x2ca02c),
    Color::from_u32(0x98df8a),
    Color::from_u32(0xd62728),
    Color::from_u32(0xff9896),
    Color::from_u32(0x9467bd),
    Color::from_u32(0xc5b0d5),
    Color::from_u32(0x8c564b),
    Color::from_u32(0xc49c94),
    Color::from_u32(0xe377c2),
    Color::from_u32(0xf7b6d2),
    Color::from_u32(0x7f7f7f),
    Color::from_u32(0xc7c7c7),
    Color::from_u32(0xbcbd22),
    Color::from_u32(0xdbdb8d),
    Color::from_u32(0x17becf),
    Color::from_u32(0x9edae5),
];

pub trait ColorScale {
    fn color(&mut self, key: &str) -> Color;
}

/// Hands out palette entries in first-seen order, wrapping around once the
/// palette is exhausted. A key keeps its color for the life of the scale.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    range: Vec<Color>,
    domain: Vec<String>,
    index: HashMap<String, usize>,
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::new(CATEGORY20.to_vec())
    }
}

impl OrdinalScale {
    pub fn new(range: Vec<Color>) -> Self {
        let range = if range.is_empty() { vec![Color::BLACK] } else { range };
        Self { range, domain: Vec::new(), index: HashMap::new() }
    }

    /// Look up without assigning.
    pub fn peek(&self, key: &str) -> Option<Color> {
        self.index.get(key).map(|i| self.range[i % self.range.len()])
    }
}

impl ColorScale for OrdinalScale {
    fn color(&mut self, key: &str) -> Color {
        let i = match self.index.get(key) {
            Some(i) => *i,
            None => {
                let i = self.domain.len();
                self.domain.push(key.to_owned());
                self.index.insert(key.to_owned(), i);
                i
            }
        };
        self.range[i % self.range.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order_and_stable() {
        let mut scale = OrdinalScale::default();
        assert_eq!(scale.color("Wii"), CATEGORY20[0]);
        assert_eq!(scale.color("DS"), CATEGORY20[1]);
        assert_eq!(scale.color("Wii"), CATEGORY20[0]);
        assert_eq!(scale.peek("DS"), Some(CATEGORY20[1]));
        assert_eq!(scale.peek("PS4"), None);
    }

    #[test]
    fn wraps_after_palette() {
        let mut scale = OrdinalScale::default();
        for i in 0..20 {
            scale.color(&format!("k{i}"));
        }
        assert_eq!(scale.color("k20"), CATEGORY20[0]);
        assert_eq!(scale.color("k21"), CATEGORY20[1]);
    }

    #[test]
    fn hex_roundtrip() {
        assert_eq!(CATEGORY20[2].to_hex(), "#ff7f0e");
        assert_eq!(Color::parse("#1f77b4"), Some(CATEGORY20[0]));
        assert_eq!(Color::parse("1f77b4"), None);
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#+12345"), None);
        assert_eq!(Color::parse("#-12345"), None);
    }
}
