use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ShellError;

/// Packed `0xAARRGGBB` colour, the layout platform window APIs take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Argb(pub u32);

impl Argb {
    pub const CHROME_DARK: Argb = Argb(0xFF14_1414);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Argb(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Parses `#RRGGBB` or `#AARRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self, ShellError> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || ShellError::InvalidColor(hex.to_string());
        if !matches!(s.len(), 6 | 8) || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let v = u32::from_str_radix(s, 16).map_err(|_| bad())?;
        if s.len() == 6 {
            Ok(Argb(0xFF00_0000 | v))
        } else {
            Ok(Argb(v))
        }
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn to_hex(self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            format!("#{:08X}", self.0)
        }
    }
}

impl Default for Argb {
    fn default() -> Self {
        Argb::CHROME_DARK
    }
}

impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Argb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
