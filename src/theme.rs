use std::fmt;
use std::str::FromStr;

use raylib::prelude::*;

use crate::error::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Green,
    Purple,
    Teal,
    Blue,
    Amber,
    Rose,
    Slate,
}

const SHADES: [u16; 4] = [100, 300, 500, 700];

impl Family {
    fn parse(name: &str) -> Option<Family> {
        match name {
            "green" => Some(Family::Green),
            "purple" => Some(Family::Purple),
            "teal" => Some(Family::Teal),
            "blue" => Some(Family::Blue),
            "amber" => Some(Family::Amber),
            "rose" => Some(Family::Rose),
            "slate" => Some(Family::Slate),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Family::Green => "green",
            Family::Purple => "purple",
            Family::Teal => "teal",
            Family::Blue => "blue",
            Family::Amber => "amber",
            Family::Rose => "rose",
            Family::Slate => "slate",
        }
    }

    // Tailwind palette, shades 100 / 300 / 500 / 700
    fn palette(self) -> [u32; 4] {
        match self {
            Family::Green  => [0xdcfce7, 0x86efac, 0x22c55e, 0x15803d],
            Family::Purple => [0xf3e8ff, 0xd8b4fe, 0xa855f7, 0x7e22ce],
            Family::Teal   => [0xccfbf1, 0x5eead4, 0x14b8a6, 0x0f766e],
            Family::Blue   => [0xdbeafe, 0x93c5fd, 0x3b82f6, 0x1d4ed8],
            Family::Amber  => [0xfef3c7, 0xfcd34d, 0xf59e0b, 0xb45309],
            Family::Rose   => [0xffe4e6, 0xfda4af, 0xf43f5e, 0xbe123c],
            Family::Slate  => [0xf1f5f9, 0xcbd5e1, 0x64748b, 0x334155],
        }
    }
}

/// A theme token as written in a deck: `green-100`, `bg-purple-300` or `#fffdfa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Palette { family: Family, shade: u16 },
    Hex(u32),
}

impl Token {
    pub const fn palette(family: Family, shade: u16) -> Token {
        Token::Palette { family, shade }
    }

    pub fn color(&self) -> Color {
        let rgb = match *self {
            Token::Palette { family, shade } => {
                let slot = SHADES.iter().position(|s| *s == shade).unwrap_or(0);
                family.palette()[slot]
            }
            Token::Hex(rgb) => rgb,
        };
        rgb_color(rgb)
    }

    /// Same family, different shade. Hex tokens are returned unchanged.
    pub fn shade(&self, shade: u16) -> Token {
        match *self {
            Token::Palette { family, .. } if SHADES.contains(&shade) => Token::Palette { family, shade },
            other => other,
        }
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(TokenError::MalformedHex(s.to_string()));
            }
            return u32::from_str_radix(hex, 16)
                .map(Token::Hex)
                .map_err(|_| TokenError::MalformedHex(s.to_string()));
        }

        let name = trimmed.strip_prefix("bg-").unwrap_or(trimmed);
        let (family, shade) = name
            .rsplit_once('-')
            .ok_or_else(|| TokenError::UnknownFamily(s.to_string()))?;
        let family = Family::parse(family).ok_or_else(|| TokenError::UnknownFamily(s.to_string()))?;
        let shade: u16 = shade.parse().map_err(|_| TokenError::UnknownShade(s.to_string()))?;
        if !SHADES.contains(&shade) {
            return Err(TokenError::UnknownShade(s.to_string()));
        }
        Ok(Token::Palette { family, shade })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Palette { family, shade } => write!(f, "{}-{}", family.name(), shade),
            Token::Hex(rgb) => write!(f, "#{:06x}", rgb),
        }
    }
}

pub fn rgb_color(rgb: u32) -> Color {
    Color::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
}

pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Ink used for narrative text and demo labels.
pub const INK: Color = Color::new(0x1f, 0x29, 0x37, 255);
pub const MUTED_INK: Color = Color::new(0x64, 0x74, 0x8b, 255);
pub const SURFACE: Color = Color::new(0xff, 0xff, 0xff, 255);
