//! Geometry and placement vocabulary shared by triggers and the overlay.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PerchError;

/// Axis-aligned bounding box in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Which side of the trigger the tooltip prefers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment along the chosen side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// A side plus alignment, written `top` or `top-start` style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
}

impl Placement {
    pub fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// The side component, discarding alignment.
    pub fn resolved_side(&self) -> Side {
        self.side
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.align {
            Align::Center => f.write_str(self.side.as_str()),
            align => write!(f, "{}-{}", self.side.as_str(), align.as_str()),
        }
    }
}

impl FromStr for Placement {
    type Err = PerchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, align) = match s.split_once('-') {
            Some((side, align)) => (side, Some(align)),
            None => (s, None),
        };

        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            other => return Err(PerchError::config(format!("Unknown placement side '{other}'"))),
        };
        let align = match align {
            None => Align::Center,
            Some("start") => Align::Start,
            Some("end") => Align::End,
            // `top-center` is not produced by Display but reads unambiguously
            Some("center") => Align::Center,
            Some(other) => {
                return Err(PerchError::config(format!("Unknown placement alignment '{other}'")))
            }
        };

        Ok(Self { side, align })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_placement_omits_alignment() {
        assert_eq!(Placement::new(Side::Top, Align::Center).to_string(), "top");
        assert_eq!(Placement::new(Side::Left, Align::End).to_string(), "left-end");
    }

    #[test]
    fn test_parse_placement() {
        let placement: Placement = "bottom-start".parse().unwrap();
        assert_eq!(placement, Placement::new(Side::Bottom, Align::Start));
        assert_eq!(placement.resolved_side(), Side::Bottom);

        let placement: Placement = "right".parse().unwrap();
        assert_eq!(placement.align, Align::Center);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("middle".parse::<Placement>().is_err());
        assert!("top-sideways".parse::<Placement>().is_err());
    }

    #[test]
    fn test_side_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Bottom).unwrap(), "\"bottom\"");
        let align: Align = serde_json::from_str("\"end\"").unwrap();
        assert_eq!(align, Align::End);
    }
}
