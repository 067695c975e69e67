use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA colour packed into a signed 32-bit integer, red in the high byte.
///
/// Opaque white is `-1`, opaque red is `0xFF0000FF`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(i32);

impl Color {
    pub const WHITE: Color = Color(-1);

    /// Build from individual components.
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        let packed = u32::from_be_bytes([red, green, blue, alpha]);
        Self(packed as i32)
    }

    /// Wrap an already packed value.
    pub fn from_packed(value: i32) -> Self {
        Self(value)
    }

    pub fn packed(&self) -> i32 {
        self.0
    }

    pub fn red(&self) -> u8 {
        self.bytes()[0]
    }

    pub fn green(&self) -> u8 {
        self.bytes()[1]
    }

    pub fn blue(&self) -> u8 {
        self.bytes()[2]
    }

    pub fn alpha(&self) -> u8 {
        self.bytes()[3]
    }

    fn bytes(&self) -> [u8; 4] {
        (self.0 as u32).to_be_bytes()
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color(r={}, g={}, b={}, a={})",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_pack_big_endian() {
        let red = Color::new(255, 0, 0, 255);
        assert_eq!(red.packed() as u32, 0xFF0000FF);
        assert_eq!(red.red(), 255);
        assert_eq!(red.green(), 0);
        assert_eq!(red.alpha(), 255);
    }

    #[test]
    fn white_is_minus_one() {
        assert_eq!(Color::new(255, 255, 255, 255), Color::WHITE);
        assert_eq!(Color::WHITE.packed(), -1);
    }

    #[test]
    fn debug_shows_components() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(format!("{c:?}"), "Color(r=1, g=2, b=3, a=4)");
    }
}
