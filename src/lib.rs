//! Companion library panel for the step templates catalog view.
//!
//! Watches DOM insertion notifications for the step-templates view, injects
//! a "Library" panel next to the existing content, and relays a small
//! request/response protocol with the host extension process to fill the
//! panel with importable templates.
//!
//! Everything is an explicit instance over an injected [`dom::Document`]
//! handle and an injected [`protocol::HostPort`], so both sides can be
//! test-doubled. See [`bridge::PanelBridge`] for the event pump.

pub mod bridge;
pub mod config;
pub mod detector;
pub mod dom;
pub mod fragments;
pub mod panel;
pub mod protocol;

pub use bridge::{PageEvent, PanelBridge};
pub use config::PanelConfig;
pub use detector::ViewDetector;
pub use dom::{Document, DomNode, Element, NodeSpec, Selector};
pub use panel::PanelController;
pub use protocol::{HostMessage, HostPort, OutboundMessage, RecordingPort, TemplateRecord};
