//! CSS-style color values.
//!
//! Hosting UIs hand colors over the same way a stylesheet would, so the
//! config accepts `#38bdf8`, `rgba(120, 180, 255, 0.7)` or
//! `hsla(200, 70%, 60%, 0.15)` and stores them as straight-alpha RGBA in
//! `[0, 1]`.
//!
//! ```ignore
//! use driftweb::color::parse_color;
//!
//! let sky = parse_color("#38bdf8")?;
//! let mist = parse_color("hsla(200, 70%, 60%, 0.15)")?;
//! ```

use glam::{Vec3, Vec4};

use crate::error::ColorError;

/// Fully transparent black.
pub const TRANSPARENT: Vec4 = Vec4::ZERO;

/// Parse a CSS color string into straight-alpha RGBA.
pub fn parse_color(input: &str) -> Result<Vec4, ColorError> {
    let text = input.trim().to_ascii_lowercase();

    if text == "transparent" {
        return Ok(TRANSPARENT);
    }
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex, input);
    }

    let open = text
        .find('(')
        .ok_or_else(|| ColorError::Syntax(input.to_string()))?;
    let body = text[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| ColorError::Syntax(input.to_string()))?;
    let args: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    match &text[..open] {
        "rgb" | "rgba" => {
            let (channels, alpha) = split_alpha(&args, input)?;
            let r = channel(channels[0])?;
            let g = channel(channels[1])?;
            let b = channel(channels[2])?;
            Ok(Vec4::new(r, g, b, alpha))
        }
        "hsl" | "hsla" => {
            let (channels, alpha) = split_alpha(&args, input)?;
            let hue = number(channels[0].trim_end_matches("deg"))?;
            let saturation = percent(channels[1])?;
            let lightness = percent(channels[2])?;
            Ok(hsl_to_rgb(hue, saturation, lightness).extend(alpha))
        }
        _ => Err(ColorError::Syntax(input.to_string())),
    }
}

/// Format a color as a CSS `rgba(...)` string.
pub fn to_css(color: Vec4) -> String {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE);
    format!(
        "rgba({}, {}, {}, {})",
        (c.x * 255.0).round() as u8,
        (c.y * 255.0).round() as u8,
        (c.z * 255.0).round() as u8,
        c.w
    )
}

/// Scale a color's alpha, leaving RGB untouched.
#[inline]
pub fn fade(color: Vec4, factor: f32) -> Vec4 {
    Vec4::new(color.x, color.y, color.z, color.w * factor.clamp(0.0, 1.0))
}

fn parse_hex(hex: &str, input: &str) -> Result<Vec4, ColorError> {
    let digit = |c: char| {
        c.to_digit(16)
            .map(|d| d as f32)
            .ok_or_else(|| ColorError::Component(input.to_string()))
    };
    let chars: Vec<char> = hex.chars().collect();
    match chars.len() {
        3 | 4 => {
            let mut out = [1.0f32; 4];
            for (slot, c) in out.iter_mut().zip(&chars) {
                *slot = digit(*c)? * 17.0 / 255.0;
            }
            Ok(Vec4::from_array(out))
        }
        6 | 8 => {
            let mut out = [1.0f32; 4];
            for (slot, pair) in out.iter_mut().zip(chars.chunks(2)) {
                *slot = (digit(pair[0])? * 16.0 + digit(pair[1])?) / 255.0;
            }
            Ok(Vec4::from_array(out))
        }
        _ => Err(ColorError::Syntax(input.to_string())),
    }
}

fn split_alpha<'a>(args: &'a [&'a str], input: &str) -> Result<(&'a [&'a str], f32), ColorError> {
    match args.len() {
        3 => Ok((args, 1.0)),
        4 => {
            let alpha = if args[3].ends_with('%') {
                percent(args[3])?
            } else {
                number(args[3])?
            };
            Ok((&args[..3], alpha.clamp(0.0, 1.0)))
        }
        found => Err(ColorError::Arity {
            input: input.to_string(),
            expected: 4,
            found,
        }),
    }
}

fn number(s: &str) -> Result<f32, ColorError> {
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ColorError::Component(s.to_string()))
}

fn percent(s: &str) -> Result<f32, ColorError> {
    let value = number(s.trim_end_matches('%'))?;
    Ok((value / 100.0).clamp(0.0, 1.0))
}

fn channel(s: &str) -> Result<f32, ColorError> {
    if s.ends_with('%') {
        percent(s)
    } else {
        Ok((number(s)? / 255.0).clamp(0.0, 1.0))
    }
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    Vec3::new(r + m, g + m, b + m)
}

/// Serde adapter storing colors as CSS strings.
///
/// Use with `#[serde(with = "crate::color::css")]` on `Vec4` fields.
pub mod css {
    use glam::Vec4;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Vec4, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_css(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec4, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_color(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 0.01
    }

    #[test]
    fn test_hex_forms() {
        let sky = parse_color("#38bdf8").unwrap();
        assert!(close(sky, Vec4::new(56.0 / 255.0, 189.0 / 255.0, 248.0 / 255.0, 1.0)));

        let short = parse_color("#fff").unwrap();
        assert!(close(short, Vec4::ONE));

        let with_alpha = parse_color("#ff000080").unwrap();
        assert!((with_alpha.w - 128.0 / 255.0).abs() < 0.001);
    }

    #[test]
    fn test_rgba() {
        let c = parse_color("rgba(120, 180, 255, 0.7)").unwrap();
        assert!(close(c, Vec4::new(120.0 / 255.0, 180.0 / 255.0, 1.0, 0.7)));

        let opaque = parse_color("rgb(255 0 0)").unwrap();
        assert_eq!(opaque.w, 1.0);
    }

    #[test]
    fn test_hsla() {
        // hsl(200, 70%, 60%) is roughly rgb(82, 177, 224)
        let c = parse_color("hsla(200, 70%, 60%, 0.15)").unwrap();
        assert!(close(c, Vec4::new(82.0 / 255.0, 177.0 / 255.0, 224.0 / 255.0, 0.15)));

        let red = parse_color("hsl(0, 100%, 50%)").unwrap();
        assert!(close(red, Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_transparent_and_errors() {
        assert_eq!(parse_color(" Transparent ").unwrap(), TRANSPARENT);
        assert!(matches!(parse_color("chartreuse"), Err(ColorError::Syntax(_))));
        assert!(matches!(parse_color("#12"), Err(ColorError::Syntax(_))));
        assert!(matches!(parse_color("rgb(1, 2)"), Err(ColorError::Arity { found: 2, .. })));
        assert!(matches!(parse_color("rgb(a, 2, 3)"), Err(ColorError::Component(_))));
    }

    #[test]
    fn test_css_output_reparses() {
        let original = parse_color("rgba(120, 180, 255, 0.18)").unwrap();
        let text = to_css(original);
        assert_eq!(text, "rgba(120, 180, 255, 0.18)");
        assert!(close(parse_color(&text).unwrap(), original));
    }

    #[test]
    fn test_fade() {
        let c = fade(Vec4::new(0.2, 0.4, 0.6, 0.5), 0.5);
        assert_eq!(c, Vec4::new(0.2, 0.4, 0.6, 0.25));
        assert_eq!(fade(c, 3.0).w, 0.25);
    }
}
