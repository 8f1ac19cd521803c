//! Panel lifecycle: injection, message rendering, import activation.
//!
//! The controller owns no template data. Each inbound record is projected
//! into a DOM fragment and forgotten; the panel is re-located by its fixed
//! id on every message, so renders always land in the current panel and
//! never in a stale one left behind by a view swap.

use crate::config::PanelConfig;
use crate::dom::{Document, Element, Selector};
use crate::fragments;
use crate::protocol::{HostMessage, HostPort, OutboundMessage, TemplateRecord};
use serde_json::Value;
use tracing::{debug, warn};

/// Index at which status banners are inserted: directly after the heading.
const BANNER_POSITION: usize = 1;

pub struct PanelController<P: HostPort> {
    document: Document,
    port: P,
    config: PanelConfig,
    content_selector: Selector,
}

impl<P: HostPort> PanelController<P> {
    pub fn new(document: Document, port: P, config: PanelConfig) -> Result<Self, String> {
        let content_selector = Selector::parse(&config.content_selector)?;
        Ok(Self {
            document,
            port,
            config,
            content_selector,
        })
    }

    /// Inject the panel into a freshly detected view and request the
    /// template list: shrink the existing content block's grid width, append
    /// the panel as its sibling in the same row, post one
    /// `get-library-templates`. A view without the expected content block is
    /// skipped without error.
    pub fn inject(&self, view: &Element) {
        let Some(content) = view.query(&self.content_selector) else {
            warn!("detected view has no content block; skipping panel injection");
            return;
        };
        let Some(row) = content.parent() else {
            warn!("content block has no row container; skipping panel injection");
            return;
        };
        content.remove_class(&self.config.content_width_from);
        content.add_class(&self.config.content_width_to);
        row.append_child(&fragments::library_container(&self.config));
        self.port.post(&OutboundMessage::GetLibraryTemplates);
    }

    /// Handle one inbound host message. Dispatch is by shape in fixed
    /// priority order; see [`HostMessage::classify`]. Status banners stack
    /// newest-first at the top of the panel, template entries accumulate at
    /// the tail in arrival order.
    pub fn on_message(&self, message: Value) {
        match HostMessage::classify(message) {
            HostMessage::ImportUnauthorized => self.insert_banner(fragments::error_banner()),
            HostMessage::ImportSuccessful => self.insert_banner(fragments::success_banner()),
            HostMessage::Template(template) => self.append_template(&template),
        }
    }

    /// Activate an entry's action control: post the import command for the
    /// locator baked into the control. Fire-and-forget — no DOM change here;
    /// the outcome arrives later as a panel-wide status banner.
    pub fn activate(&self, control: &Element) {
        let Some(template_name) = control.attr(fragments::DOWNLOAD_URL_ATTR) else {
            warn!("activated control carries no download locator; ignoring");
            return;
        };
        self.port
            .post(&OutboundMessage::ImportTemplate { template_name });
    }

    /// Activate the action control of the entry named `name`. Returns false
    /// when no such entry is rendered.
    pub fn activate_by_name(&self, name: &str) -> bool {
        let Some(panel) = self.panel() else {
            return false;
        };
        for entry in panel.children() {
            if let Some(control) = fragments::action_control(&entry)
                && control.attr(fragments::TEMPLATE_NAME_ATTR).as_deref() == Some(name)
            {
                self.activate(&control);
                return true;
            }
        }
        false
    }

    /// The current panel, located by fixed id on every call.
    pub fn panel(&self) -> Option<Element> {
        self.document.element_by_id(&self.config.panel_id)
    }

    fn insert_banner(&self, banner: Element) {
        match self.panel() {
            Some(panel) => panel.insert_child_at(BANNER_POSITION, &banner),
            None => warn!("no panel in document; dropping status banner"),
        }
    }

    fn append_template(&self, template: &TemplateRecord) {
        debug!(name = %template.name, "adding template to library listing");
        match self.panel() {
            Some(panel) => {
                panel.append_child(&fragments::template_entry(template, &self.config));
            }
            None => warn!("no panel in document; dropping template entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RecordingPort;
    use serde_json::json;

    fn step_templates_view() -> Element {
        let view = Element::new("div");
        view.add_class("ng-scope");
        view.add_class("container-fluid");
        let row = Element::new("div");
        row.add_class("row-fluid");
        let content = Element::new("div");
        content.add_class("span12");
        let heading = Element::new("h3");
        heading.set_text("Step templates");
        content.append_child(&heading);
        row.append_child(&content);
        view.append_child(&row);
        view
    }

    fn controller() -> (PanelController<RecordingPort>, Document, Element, RecordingPort) {
        let document = Document::new();
        let view = step_templates_view();
        document.root().append_child(&view);
        let port = RecordingPort::new();
        let controller =
            PanelController::new(document.clone(), port.clone(), PanelConfig::default()).unwrap();
        (controller, document, view, port)
    }

    fn template(name: &str) -> Value {
        json!({ "Name": name, "DownloadUrl": format!("https://host.example/{name}") })
    }

    #[test]
    fn test_inject_effect_counts() {
        let (controller, document, view, port) = controller();
        controller.inject(&view);

        // Exactly one panel, next to the shrunk content block.
        let panel = document.element_by_id("library-templates").unwrap();
        assert!(panel.has_class("span5"));
        let row = panel.parent().unwrap();
        assert_eq!(row.child_count(), 2);
        let content = row.children()[0].clone();
        assert!(!content.has_class("span12"));
        assert!(content.has_class("span7"));

        // Exactly one outbound list request.
        assert_eq!(port.sent(), vec![OutboundMessage::GetLibraryTemplates]);
    }

    #[test]
    fn test_inject_without_content_block_is_a_noop() {
        let (controller, document, _, port) = controller();
        let bare = Element::new("div");
        document.root().append_child(&bare);
        controller.inject(&bare);
        assert!(document.element_by_id("library-templates").is_none());
        assert!(port.sent().is_empty());
    }

    #[test]
    fn test_banner_at_top_templates_at_tail() {
        let (controller, _, view, _) = controller();
        controller.inject(&view);

        controller.on_message(template("T1"));
        controller.on_message(template("T2"));
        controller.on_message(json!({ "templateImportUnauthorized": true }));
        controller.on_message(template("T3"));

        let panel = controller.panel().unwrap();
        let children = panel.children();
        assert_eq!(children[0].tag(), "h3");
        assert!(children[1].has_class("alert-error"));
        let names: Vec<String> = children[2..]
            .iter()
            .map(|entry| {
                fragments::action_control(entry)
                    .and_then(|c| c.attr(fragments::TEMPLATE_NAME_ATTR))
                    .unwrap()
            })
            .collect();
        assert_eq!(names, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn test_repeated_banners_stack_newest_first() {
        let (controller, _, view, _) = controller();
        controller.inject(&view);

        controller.on_message(json!({ "templateImportUnauthorized": true }));
        controller.on_message(json!({ "templateImportSuccessful": true }));

        let children = controller.panel().unwrap().children();
        assert_eq!(children[0].tag(), "h3");
        assert!(children[1].has_class("alert-success"));
        assert!(children[2].has_class("alert-error"));
    }

    #[test]
    fn test_banner_before_any_entry_still_lands_after_heading() {
        let (controller, _, view, _) = controller();
        controller.inject(&view);
        controller.on_message(json!({ "templateImportSuccessful": true }));
        let children = controller.panel().unwrap().children();
        assert_eq!(children.len(), 2);
        assert!(children[1].has_class("alert-success"));
    }

    #[test]
    fn test_description_placeholder() {
        let (controller, _, view, _) = controller();
        controller.inject(&view);
        controller.on_message(json!({ "Name": "Bare", "DownloadUrl": "u" }));
        controller.on_message(json!({
            "Name": "Described", "Description": "Does things.", "DownloadUrl": "u"
        }));

        let children = controller.panel().unwrap().children();
        assert!(children[1].text_content().contains("No description provided."));
        assert!(children[2].text_content().contains("Does things."));
    }

    #[test]
    fn test_activation_posts_import_and_leaves_dom_alone() {
        let (controller, _, view, port) = controller();
        controller.inject(&view);
        controller.on_message(template("Ping"));

        let panel = controller.panel().unwrap();
        let before = panel.child_count();
        assert!(controller.activate_by_name("Ping"));

        assert_eq!(
            port.sent(),
            vec![
                OutboundMessage::GetLibraryTemplates,
                OutboundMessage::ImportTemplate {
                    template_name: "https://host.example/Ping".into()
                }
            ]
        );
        assert_eq!(panel.child_count(), before);
    }

    #[test]
    fn test_activation_of_unknown_entry_posts_nothing() {
        let (controller, _, view, port) = controller();
        controller.inject(&view);
        assert!(!controller.activate_by_name("Ghost"));
        assert_eq!(port.sent(), vec![OutboundMessage::GetLibraryTemplates]);
    }

    #[test]
    fn test_messages_never_land_in_a_stale_panel() {
        let (controller, document, view, _) = controller();
        controller.inject(&view);
        let stale = controller.panel().unwrap();

        // The page framework replaces the whole view subtree.
        view.remove_from_parent();
        let fresh_view = step_templates_view();
        document.root().append_child(&fresh_view);
        controller.inject(&fresh_view);

        controller.on_message(template("T1"));
        let current = controller.panel().unwrap();
        assert!(!current.same_node(&stale));
        assert_eq!(current.child_count(), 2); // heading + entry
        assert_eq!(stale.child_count(), 1); // heading only
    }

    #[test]
    fn test_message_without_panel_is_dropped() {
        let (controller, _, _, _) = controller();
        // No inject happened; nothing to render into, nothing to panic over.
        controller.on_message(template("T1"));
        assert!(controller.panel().is_none());
    }
}
