//! 차트 색상 모델.
//!
//! `#rrggbb` / `#rrggbbaa` 문자열과 상호 변환되는 RGBA 색상,
//! 시리즈 선 그라디언트, 범례 항목.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// RGBA8 색상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 두 색상 사이 선형 보간 (`t`는 [0, 1]로 클램프)
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// `[r, g, b, a]` 배열
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation {
            field: "color".to_string(),
            message: format!("'{s}'은(는) #rrggbb 또는 #rrggbbaa 형식이어야 함"),
        };

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// 시리즈 선 그라디언트: 플롯 상단(high)에서 하단(low)으로 보간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGradient {
    /// 플롯 상단 색상
    pub high: Color,
    /// 플롯 하단 색상
    pub low: Color,
}

impl ColorGradient {
    pub const fn new(high: Color, low: Color) -> Self {
        Self { high, low }
    }

    /// `t`(0 = 상단, 1 = 하단) 위치의 색상
    pub fn at(&self, t: f64) -> Color {
        self.high.lerp(self.low, t)
    }
}

/// 범례 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// 시리즈 이름 (예: "CPU 0", "used")
    pub label: String,
    /// 시리즈 그라디언트
    pub gradient: ColorGradient,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, gradient: ColorGradient) -> Self {
        Self {
            label: label.into(),
            gradient,
        }
    }
}
