//! DOM fragments the panel injects.
//!
//! Everything here builds element trees directly; template names and
//! descriptions are stored as node text, never parsed as markup, so host
//! data cannot smuggle structure into the page.

use crate::config::PanelConfig;
use crate::dom::{Element, Selector};
use crate::protocol::TemplateRecord;

/// Attribute on an entry's action control carrying the download locator.
pub const DOWNLOAD_URL_ATTR: &str = "data-download-url";
/// Attribute on an entry's action control carrying the template name.
pub const TEMPLATE_NAME_ATTR: &str = "data-template-name";

fn element(tag: &str, classes: &[&str]) -> Element {
    let el = Element::new(tag);
    for class in classes {
        el.add_class(class);
    }
    el
}

/// The panel container: fixed id, grid width, static heading. Injected once
/// per detected view activation.
pub fn library_container(config: &PanelConfig) -> Element {
    let container = element("div", &[config.panel_width_class.as_str()]);
    container.set_id(&config.panel_id);
    let heading = Element::new("h3");
    heading.set_text(&config.panel_heading);
    container.append_child(&heading);
    container
}

fn dismissible_banner(kind_class: &str, strong_text: &str, body: &str) -> Element {
    let banner = element("div", &["alert", kind_class]);
    let close = element("button", &["close"]);
    close.set_attr("type", "button");
    close.set_attr("data-dismiss", "alert");
    close.set_text("\u{d7}");
    banner.append_child(&close);
    let strong = Element::new("strong");
    strong.set_text(strong_text);
    banner.append_child(&strong);
    let message = Element::new("span");
    message.set_text(body);
    banner.append_child(&message);
    banner
}

pub fn error_banner() -> Element {
    dismissible_banner(
        "alert-error",
        "Problem!",
        " It seems you are not authorized to import templates.",
    )
}

pub fn success_banner() -> Element {
    dismissible_banner("alert-success", "Success!", " The template has been imported.")
}

/// One list entry for a template: action control plus name heading plus
/// description (placeholder when the host sent none). The action control
/// carries the download locator so activation can be resolved later without
/// retaining the record.
pub fn template_entry(template: &TemplateRecord, config: &PanelConfig) -> Element {
    let entry = element("a", &["octo-list-group-item"]);
    let body = Element::new("div");

    let heading = element("h4", &["octo-list-group-item-heading"]);
    heading.set_text(&template.name);
    let action = element("button", &["btn-small", "btn-success"]);
    action.set_attr("type", "button");
    action.set_attr(DOWNLOAD_URL_ATTR, &template.download_url);
    action.set_attr(TEMPLATE_NAME_ATTR, &template.name);
    action.append_child(&element("i", &["icon-arrow-down", "icon-white"]));
    heading.append_child(&action);
    body.append_child(&heading);

    let description = Element::new("p");
    description.set_text(
        template
            .description
            .as_deref()
            .unwrap_or(&config.missing_description),
    );
    body.append_child(&description);

    entry.append_child(&body);
    entry
}

/// The action control inside a rendered entry, if any.
pub fn action_control(entry: &Element) -> Option<Element> {
    let selector = Selector::parse("button.btn-success").ok()?;
    entry.query(&selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_container_shape() {
        let cfg = PanelConfig::default();
        let panel = library_container(&cfg);
        assert_eq!(panel.id().as_deref(), Some("library-templates"));
        assert!(panel.has_class("span5"));
        assert_eq!(panel.child_count(), 1);
        assert_eq!(panel.children()[0].tag(), "h3");
        assert_eq!(panel.children()[0].text(), "Library");
    }

    #[test]
    fn test_banners_carry_their_message() {
        assert!(error_banner().has_class("alert-error"));
        assert!(error_banner().text_content().contains("not authorized"));
        assert!(success_banner().has_class("alert-success"));
        assert!(success_banner().text_content().contains("has been imported"));
    }

    #[test]
    fn test_entry_description_placeholder() {
        let cfg = PanelConfig::default();
        let without = TemplateRecord {
            name: "Ping".into(),
            description: None,
            download_url: "u".into(),
        };
        let entry = template_entry(&without, &cfg);
        assert!(entry.text_content().contains("No description provided."));

        let with = TemplateRecord {
            description: Some("Checks a host.".into()),
            ..without
        };
        let entry = template_entry(&with, &cfg);
        assert!(entry.text_content().contains("Checks a host."));
        assert!(!entry.text_content().contains("No description provided."));
    }

    #[test]
    fn test_entry_action_control_carries_locator() {
        let cfg = PanelConfig::default();
        let entry = template_entry(
            &TemplateRecord {
                name: "Ping".into(),
                description: None,
                download_url: "https://host.example/templates/7".into(),
            },
            &cfg,
        );
        let control = action_control(&entry).expect("entry should have an action control");
        assert_eq!(
            control.attr(DOWNLOAD_URL_ATTR).as_deref(),
            Some("https://host.example/templates/7")
        );
        assert_eq!(control.attr(TEMPLATE_NAME_ATTR).as_deref(), Some("Ping"));
    }
}
