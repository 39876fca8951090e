//! Non-fatal compile diagnostics.
//!
//! Every condition the compiler can work around is recorded as a
//! [`CompileWarning`] instead of aborting. A [`Diagnostics`] value is created
//! per compile invocation, threaded by `&mut` through the passes and handed
//! back with the result; nothing is shared between invocations.
//!
//! # Warning Codes
//!
//! - `CannotProjectOnChannelWithoutField`: a selection projects a channel the
//!   unit does not encode with a field; the channel is skipped
//! - `ScaleBindingsContinuous`: a `bind: scales` selection targets a missing,
//!   discrete or binned scale; that scale is left unbound
//! - `UnsupportedScaleBinding`: `bind: scales` on a selection that cannot
//!   drive scales (not an interval, or not globally resolved)
//! - `IntervalChannelUnsupported`: an interval selection projects a channel
//!   other than x or y; the projection is dropped
//! - `SelectionDomainMultipleFields`: a selection domain names neither a field
//!   nor an encoding and the selection has several projections
//!
//! # Usage
//!
//! ```
//! use vizsel_resolve::diagnostics::{CompileWarning, Diagnostics, WarningCode};
//! use vizsel_ast::Channel;
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.push(CompileWarning::cannot_project_without_field("unit", "grid", Channel::X));
//! assert_eq!(diagnostics.count(WarningCode::CannotProjectOnChannelWithoutField), 1);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::warn;
use vizsel_ast::{Channel, FieldPath};

/// A diagnostic that does not stop compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    /// Warning code for filtering/identification
    pub code: WarningCode,
    /// Human-readable message
    pub message: String,
    /// Name of the view the warning was raised on
    pub view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

/// Warning codes for categorization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WarningCode {
    /// A projected channel has no field on the unit view.
    CannotProjectOnChannelWithoutField,

    /// Scale bindings need a scale with an unbinned, continuous domain.
    ScaleBindingsContinuous,

    /// `bind: scales` is only honoured for globally resolved interval
    /// selections.
    UnsupportedScaleBinding,

    /// Interval selections only capture x and y.
    IntervalChannelUnsupported,

    /// A selection domain had to pick one of several projected fields.
    SelectionDomainMultipleFields,
}

impl CompileWarning {
    fn new(code: WarningCode, view: &str, message: String) -> Self {
        Self {
            code,
            message,
            view: view.to_string(),
            selection: None,
            channel: None,
        }
    }

    fn for_selection(mut self, selection: &str) -> Self {
        self.selection = Some(selection.to_string());
        self
    }

    fn on_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn cannot_project_without_field(view: &str, selection: &str, channel: Channel) -> Self {
        Self::new(
            WarningCode::CannotProjectOnChannelWithoutField,
            view,
            format!(
                "Cannot project selection \"{}\" on encoding channel \"{}\", which has no field.",
                selection, channel
            ),
        )
        .for_selection(selection)
        .on_channel(channel)
    }

    pub fn scale_bindings_continuous(view: &str, selection: &str, channel: Channel) -> Self {
        Self::new(
            WarningCode::ScaleBindingsContinuous,
            view,
            format!(
                "Scale bindings are currently only supported for scales with unbinned, continuous domains; selection \"{}\" is not bound to the \"{}\" scale.",
                selection, channel
            ),
        )
        .for_selection(selection)
        .on_channel(channel)
    }

    pub fn unsupported_scale_binding(view: &str, selection: &str) -> Self {
        Self::new(
            WarningCode::UnsupportedScaleBinding,
            view,
            format!(
                "Scale bindings require an interval selection with \"global\" resolution; selection \"{}\" is not bound.",
                selection
            ),
        )
        .for_selection(selection)
    }

    pub fn interval_channel_unsupported(view: &str, selection: &str, channel: Option<Channel>) -> Self {
        let warning = Self::new(
            WarningCode::IntervalChannelUnsupported,
            view,
            format!(
                "Interval selections only support x and y encoding channels; selection \"{}\" drops its {} projection.",
                selection,
                channel.map_or_else(|| "field-only".to_string(), |c| format!("\"{}\"", c))
            ),
        )
        .for_selection(selection);
        match channel {
            Some(channel) => warning.on_channel(channel),
            None => warning,
        }
    }

    pub fn selection_domain_multiple_fields(view: &str, selection: &str, field: &FieldPath) -> Self {
        Self::new(
            WarningCode::SelectionDomainMultipleFields,
            view,
            format!(
                "A \"field\" or \"encoding\" must be specified when using selection \"{}\" as a scale domain. Using \"{}\".",
                selection, field
            ),
        )
        .for_selection(selection)
    }
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{:?}] in '{}': {}", self.code, self.view, self.message)
    }
}

/// Warnings collected during one compile invocation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<CompileWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning. Warnings are also logged via `tracing::warn!` for
    /// immediate visibility.
    pub fn push(&mut self, warning: CompileWarning) {
        warn!(
            code = ?warning.code,
            view = %warning.view,
            "{}",
            warning.message
        );
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Number of warnings with the given code.
    pub fn count(&self, code: WarningCode) -> usize {
        self.warnings.iter().filter(|w| w.code == code).count()
    }

    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.warnings
    }
}

/// Formats warnings one per line.
pub fn format_warnings(warnings: &[CompileWarning]) -> String {
    let mut out = String::new();
    for warning in warnings {
        out.push_str(&warning.to_string());
        out.push('\n');
    }
    out
}
