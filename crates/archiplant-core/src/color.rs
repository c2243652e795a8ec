//! Color handling for Archiplant models
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Model colors are always emitted as `#RRGGBB`, which is
//! the form both PlantUML and the XML export understand.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string.
    ///
    /// Accepts CSS color strings such as `"#ff0000"`, `"rgb(255, 0, 0)"` and
    /// `"red"`, plus bare hex digits (`"FF0000"`, `"f00"`) as users commonly
    /// write them in JSON payloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use archiplant_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let bare = Color::new("FF0000").unwrap();
    /// assert_eq!(red, bare);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        let candidate = if is_bare_hex(trimmed) {
            format!("#{trimmed}")
        } else {
            trimmed.to_string()
        };

        match DynamicColor::from_str(&candidate) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as an uppercase `#RRGGBB` string. Alpha is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use archiplant_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#FF0000");
    /// ```
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn is_bare_hex(s: &str) -> bool {
    matches!(s.len(), 3 | 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("steelblue").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_bare_hex() {
        assert_eq!(Color::new("4ECDC4").unwrap().to_hex(), "#4ECDC4");
        assert_eq!(Color::new("fff").unwrap().to_hex(), "#FFFFFF");
    }

    #[test]
    fn test_color_named_to_hex() {
        assert_eq!(Color::new("blue").unwrap().to_hex(), "#0000FF");
        assert_eq!(Color::new(" #abcdef ").unwrap().to_hex(), "#ABCDEF");
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("#FF0000").unwrap();
        let color3 = Color::new("blue").unwrap();

        let mut set = HashSet::new();
        set.insert(color1.to_hex());
        assert!(set.contains(&color2.to_hex()));
        assert!(!set.contains(&color3.to_hex()));
    }
}
