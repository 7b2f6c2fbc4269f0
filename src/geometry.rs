use serde::{Deserialize, Deserializer};

/// Axis-aligned rectangle in screen units (one terminal cell per unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Closed bounds check: the right and bottom edges count as inside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !(x < self.x || x > self.x + self.w || y < self.y || y > self.y + self.h)
    }

    /// Offset that centres an item of `w` x `h` inside this rectangle.
    pub fn centered(&self, w: i32, h: i32) -> Rect {
        Rect {
            x: self.x + (self.w - w) / 2,
            y: self.y + (self.h - h) / 2,
            w,
            h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<Rgba> for crossterm::style::Color {
    fn from(c: Rgba) -> Self {
        crossterm::style::Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

/// Deserialize a colour from a string, see [`parse_color`].
pub fn deserialize_color<'de, D>(deserializer: D) -> Result<Rgba, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

/// Parse a colour string.
/// Supports:
/// - Named colours: "black", "white", "red", "green", "blue", "purple", "orange"
/// - Hex colours: "#FF6600", "#f60"
/// - RGB tuples: "255,165,0"
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "black" => return Some(Rgba::BLACK),
        "white" => return Some(Rgba::WHITE),
        "red" => return Some(Rgba::rgb(255, 40, 10)),
        "green" => return Some(Rgba::rgb(50, 255, 100)),
        "blue" => return Some(Rgba::rgb(0, 20, 50)),
        "purple" => return Some(Rgba::rgb(160, 102, 198)),
        "orange" => return Some(Rgba::rgb(255, 165, 0)),
        _ => {}
    }

    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Rgba::rgb(r, g, b));
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            return Some(Rgba::rgb(r, g, b));
        }
        return None;
    }

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Rgba::rgb(r, g, b));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive_on_every_edge() {
        let rect = Rect::new(10, 10, 50, 50);
        assert!(rect.contains(10, 10));
        assert!(rect.contains(60, 60));
        assert!(rect.contains(60, 10));
        assert!(!rect.contains(9, 10));
        assert!(!rect.contains(10, 61));
        assert!(!rect.contains(61, 30));
    }

    #[test]
    fn test_touching_rects_share_border() {
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        assert!(left.contains(10, 5));
        assert!(right.contains(10, 5));
    }

    #[test]
    fn test_centered() {
        let rect = Rect::new(4, 2, 20, 5);
        assert_eq!(rect.centered(6, 1), Rect::new(11, 4, 6, 1));
        // Wider than the container: truncates towards zero like the offset math.
        assert_eq!(rect.centered(23, 1), Rect::new(3, 4, 23, 1));
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#FF6600"), Some(Rgba::rgb(255, 102, 0)));
        assert_eq!(parse_color("#f60"), Some(Rgba::rgb(255, 102, 0)));
        assert_eq!(parse_color("255, 102, 0"), Some(Rgba::rgb(255, 102, 0)));
        assert_eq!(parse_color("WHITE"), Some(Rgba::WHITE));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("256,0,0"), None);
        assert_eq!(parse_color("mauve"), None);
        assert_eq!(parse_color("#ééé"), None);
    }
}
