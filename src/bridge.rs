//! Single-threaded event pump tying view detection to the panel.
//!
//! DOM insertion notifications and inbound host messages share one queue,
//! so they are processed strictly in arrival order, one per event-loop
//! turn, each to completion. There is no cancellation and no timeout: a
//! host that never answers simply leaves the panel showing its heading.

use crate::config::PanelConfig;
use crate::detector::ViewDetector;
use crate::dom::{Document, DomNode};
use crate::panel::PanelController;
use crate::protocol::HostPort;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// One event-loop turn's worth of input.
#[derive(Debug)]
pub enum PageEvent {
    /// A node was inserted into the document.
    Inserted(DomNode),
    /// The host process sent a message.
    Host(Value),
}

/// Explicit instance wiring the detector and controller to an injected
/// document handle and messaging port. No process-wide state.
pub struct PanelBridge<P: HostPort> {
    detector: ViewDetector,
    controller: PanelController<P>,
    /// Whether the inbound-message listener is attached. Set on the first
    /// view detection and never cleared: re-detections reuse the existing
    /// listener instead of stacking duplicates.
    listening: bool,
}

impl<P: HostPort> PanelBridge<P> {
    pub fn new(document: Document, port: P, config: PanelConfig) -> Result<Self, String> {
        Ok(Self {
            detector: ViewDetector::from_config(&config)?,
            controller: PanelController::new(document, port, config)?,
            listening: false,
        })
    }

    pub fn controller(&self) -> &PanelController<P> {
        &self.controller
    }

    /// Process one event to completion. A single event produces at most one
    /// complete DOM mutation before control returns.
    pub fn handle(&mut self, event: PageEvent) {
        match event {
            PageEvent::Inserted(node) => self.on_insertion(node),
            PageEvent::Host(message) => self.on_host_message(message),
        }
    }

    fn on_insertion(&mut self, node: DomNode) {
        if !self.detector.classify(&node) {
            return;
        }
        let DomNode::Element(view) = node else {
            return;
        };
        info!("setting up step templates library listing");
        self.controller.inject(&view);
        if self.listening {
            debug!("message listener already attached; not attaching another");
        } else {
            self.listening = true;
        }
    }

    fn on_host_message(&mut self, message: Value) {
        if !self.listening {
            debug!("host message before first view detection; no listener attached");
            return;
        }
        self.controller.on_message(message);
    }

    /// Drain `events` until the channel closes.
    pub async fn run(&mut self, events: &mut UnboundedReceiver<PageEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
    }
}
