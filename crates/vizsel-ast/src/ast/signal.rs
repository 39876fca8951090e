//! Signal definitions handed to the reactive runtime.
//!
//! Serialization is the wire contract: optional keys are omitted entirely
//! rather than written as `null`, and a push signal carries nothing but its
//! name and `push: "outer"`.

use serde::Serialize;
use serde_json::Value;

use super::scale::SignalRef;

/// Event source of a signal handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Events {
    /// An event selector string such as `"click"`.
    Selector(String),
    /// Fire when another signal changes.
    Signal(SignalRef),
    /// Fire when any of several signals change.
    Signals(Vec<SignalRef>),
}

/// One `on` handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnEvent {
    pub events: Events,
    pub update: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

impl OnEvent {
    pub fn new(events: Events, update: impl Into<String>) -> Self {
        Self {
            events,
            update: update.into(),
            force: false,
        }
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// A signal that owns its value in the scope it is declared in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSignal {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on: Vec<OnEvent>,
}

impl NewSignal {
    /// A bare declaration: the name only.
    pub fn declare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            update: None,
            on: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_update(mut self, update: impl Into<String>) -> Self {
        self.update = Some(update.into());
        self
    }

    pub fn with_on(mut self, handler: OnEvent) -> Self {
        self.on.push(handler);
        self
    }
}

/// Target scope of a push signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Push {
    Outer,
}

/// A signal whose value lives in an enclosing scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushSignal {
    pub name: String,
    pub push: Push,
}

impl PushSignal {
    pub fn outer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            push: Push::Outer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Signal {
    New(NewSignal),
    Push(PushSignal),
}

impl Signal {
    pub fn name(&self) -> &str {
        match self {
            Signal::New(signal) => &signal.name,
            Signal::Push(signal) => &signal.name,
        }
    }

    pub fn update(&self) -> Option<&str> {
        match self {
            Signal::New(signal) => signal.update.as_deref(),
            Signal::Push(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Signal::New(signal) => signal.value.as_ref(),
            Signal::Push(_) => None,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, Signal::Push(_))
    }
}

impl From<NewSignal> for Signal {
    fn from(signal: NewSignal) -> Self {
        Signal::New(signal)
    }
}

impl From<PushSignal> for Signal {
    fn from(signal: PushSignal) -> Self {
        Signal::Push(signal)
    }
}
