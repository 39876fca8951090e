//! Foundation types shared by every pass: channels, field paths, scale and
//! mark kinds.

mod channel;
mod field;
mod types;

pub use channel::{Channel, UnknownChannel};
pub use field::{string_value, FieldPath};
pub use types::{default_scale_type, FieldType, Mark, ScaleType};
