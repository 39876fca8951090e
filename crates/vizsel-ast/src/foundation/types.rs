//! Scale, field and mark kinds.

use serde::{Deserialize, Serialize};

use super::Channel;

/// Scale type of a resolved scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleType {
    Linear,
    Log,
    Pow,
    Sqrt,
    Time,
    Utc,
    Sequential,
    Quantile,
    Quantize,
    Threshold,
    BinLinear,
    BinOrdinal,
    Ordinal,
    Band,
    Point,
}

impl ScaleType {
    /// Whether the scale maps a continuous input domain.
    pub fn has_continuous_domain(self) -> bool {
        matches!(
            self,
            ScaleType::Linear
                | ScaleType::Log
                | ScaleType::Pow
                | ScaleType::Sqrt
                | ScaleType::Time
                | ScaleType::Utc
                | ScaleType::Sequential
                | ScaleType::Quantile
                | ScaleType::Quantize
                | ScaleType::Threshold
                | ScaleType::BinLinear
        )
    }

    pub fn is_bin_scale(self) -> bool {
        matches!(self, ScaleType::BinLinear | ScaleType::BinOrdinal)
    }

    /// Whether an interval selection can drive this scale's domain by zooming
    /// and panning.
    pub fn supports_scale_binding(self) -> bool {
        self.has_continuous_domain() && !self.is_bin_scale()
    }
}

/// Measurement type of an encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Temporal,
    Ordinal,
    #[default]
    Nominal,
}

/// Mark type of a unit view. Only consulted for default scale types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Area,
    Bar,
    Circle,
    Geoshape,
    Line,
    #[default]
    Point,
    Rect,
    Rule,
    Square,
    Text,
    Tick,
    Trail,
}

/// Default scale type for a field encoded on `channel`.
pub fn default_scale_type(channel: Channel, field_type: FieldType, mark: Mark, binned: bool) -> ScaleType {
    match field_type {
        FieldType::Quantitative if binned && !channel.is_xy() => ScaleType::BinOrdinal,
        FieldType::Quantitative => ScaleType::Linear,
        FieldType::Temporal => ScaleType::Time,
        FieldType::Ordinal | FieldType::Nominal if channel.is_xy() => match mark {
            Mark::Bar | Mark::Rect => ScaleType::Band,
            _ => ScaleType::Point,
        },
        FieldType::Ordinal | FieldType::Nominal => ScaleType::Ordinal,
    }
}
