//! View detection over the mutation stream.
//!
//! The page framework re-renders views by inserting whole subtrees, so the
//! mutation stream is the only signal that the step-templates view exists.
//! The stream also carries text nodes and unrelated elements; everything
//! that is not the target view is ignored without error.

use crate::config::PanelConfig;
use crate::dom::{DomNode, Element, Selector};

/// Classifies inserted nodes. Stateless; classification is pure and
/// side-effect free.
pub struct ViewDetector {
    view_tag: String,
    view_classes: Vec<String>,
    heading_selector: Selector,
    heading_text: String,
}

impl ViewDetector {
    pub fn from_config(config: &PanelConfig) -> Result<Self, String> {
        Ok(Self {
            view_tag: config.view_tag.clone(),
            view_classes: config.view_classes.clone(),
            heading_selector: Selector::parse(&config.heading_selector)?,
            heading_text: config.heading_text.clone(),
        })
    }

    /// True iff `node` is the step-templates view: an element with the
    /// expected tag, carrying every required class, containing a descendant
    /// matching the structural heading selector whose text equals the
    /// expected heading exactly.
    pub fn classify(&self, node: &DomNode) -> bool {
        match node.as_element() {
            Some(el) => self.classify_element(el),
            None => false,
        }
    }

    fn classify_element(&self, el: &Element) -> bool {
        el.tag() == self.view_tag
            && self.view_classes.iter().all(|class| el.has_class(class))
            && el
                .query(&self.heading_selector)
                .is_some_and(|heading| heading.text_content() == self.heading_text)
    }
}
