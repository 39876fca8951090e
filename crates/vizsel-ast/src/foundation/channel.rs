//! Encoding channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An encoding channel of a unit view.
///
/// Declaration order is the canonical order scales are assembled in, so the
/// derived `Ord` is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
    X2,
    Y2,
    Size,
    Shape,
    Color,
    Fill,
    Stroke,
    Opacity,
    Text,
    Tooltip,
    Detail,
    Key,
    Order,
    Href,
    Row,
    Column,
}

impl Channel {
    /// Channels that own a scale.
    pub const SCALE_CHANNELS: [Channel; 8] = [
        Channel::X,
        Channel::Y,
        Channel::Size,
        Channel::Shape,
        Channel::Color,
        Channel::Fill,
        Channel::Stroke,
        Channel::Opacity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::X2 => "x2",
            Channel::Y2 => "y2",
            Channel::Size => "size",
            Channel::Shape => "shape",
            Channel::Color => "color",
            Channel::Fill => "fill",
            Channel::Stroke => "stroke",
            Channel::Opacity => "opacity",
            Channel::Text => "text",
            Channel::Tooltip => "tooltip",
            Channel::Detail => "detail",
            Channel::Key => "key",
            Channel::Order => "order",
            Channel::Href => "href",
            Channel::Row => "row",
            Channel::Column => "column",
        }
    }

    pub fn is_scale_channel(self) -> bool {
        Self::SCALE_CHANNELS.contains(&self)
    }

    /// x or y.
    pub fn is_xy(self) -> bool {
        matches!(self, Channel::X | Channel::Y)
    }

    /// The other positional channel, if this is one.
    pub fn opposite(self) -> Option<Channel> {
        match self {
            Channel::X => Some(Channel::Y),
            Channel::Y => Some(Channel::X),
            _ => None,
        }
    }

    /// Size signal a positional channel is clamped to.
    pub fn size_signal(self) -> Option<&'static str> {
        match self {
            Channel::X => Some("width"),
            Channel::Y => Some("height"),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown encoding channel '{}'", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::from(s)).map_err(|_| UnknownChannel(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mut channels = vec![Channel::Opacity, Channel::Color, Channel::Y, Channel::X];
        channels.sort();
        assert_eq!(
            channels,
            vec![Channel::X, Channel::Y, Channel::Color, Channel::Opacity]
        );
    }

    #[test]
    fn test_round_trip_names() {
        for channel in Channel::SCALE_CHANNELS {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert_eq!("x2".parse::<Channel>().unwrap(), Channel::X2);
        assert!("latitude".parse::<Channel>().is_err());
    }

    #[test]
    fn test_scale_channels() {
        assert!(Channel::Color.is_scale_channel());
        assert!(!Channel::Tooltip.is_scale_channel());
        assert!(!Channel::X2.is_scale_channel());
        assert_eq!(Channel::X.opposite(), Some(Channel::Y));
    }
}
