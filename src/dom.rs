//! Minimal retained DOM the panel operates on.
//!
//! The embedding page owns the real document; this module models just enough
//! of it for the view detector and panel controller: element handles with
//! tag/class/attribute/text state, parent/child links, id lookup, and a
//! fixed descendant selector. Handles are `Rc`-based clones of the same
//! underlying node — the whole system is single-threaded and event-driven,
//! so no locking is involved.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

struct ElementData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    /// Direct text content of this element (not including descendants).
    text: String,
    children: Vec<Element>,
    parent: Weak<RefCell<ElementData>>,
}

/// Handle to a DOM element. Cloning the handle aliases the same node.
#[derive(Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementData>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementData {
                tag: tag.to_string(),
                id: None,
                classes: Vec::new(),
                attrs: HashMap::new(),
                text: String::new(),
                children: Vec::new(),
                parent: Weak::new(),
            })),
        }
    }

    /// True when both handles alias the same underlying node.
    pub fn same_node(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.inner.borrow().id.clone()
    }

    pub fn set_id(&self, id: &str) {
        self.inner.borrow_mut().id = Some(id.to_string());
    }

    // --- classes ---

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        let mut data = self.inner.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.clone()
    }

    // --- attributes ---

    pub fn set_attr(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.inner.borrow().attrs.get(name).cloned()
    }

    // --- text ---

    pub fn set_text(&self, text: &str) {
        self.inner.borrow_mut().text = text.to_string();
    }

    /// Direct text of this element only.
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Text of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.inner.borrow().text);
        for child in self.children() {
            child.collect_text(out);
        }
    }

    // --- tree structure ---

    pub fn parent(&self) -> Option<Element> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Element { inner })
    }

    pub fn children(&self) -> Vec<Element> {
        self.inner.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Append `child` as the last child, moving it out of any previous parent.
    pub fn append_child(&self, child: &Element) {
        self.insert_child_at(self.child_count(), child);
    }

    /// Insert `child` at `index`, clamped to the current child count
    /// (insert-before-a-missing-reference appends, as in the page DOM).
    /// The child is moved out of any previous parent first.
    pub fn insert_child_at(&self, index: usize, child: &Element) {
        if self.same_node(child) {
            return;
        }
        child.remove_from_parent();
        let mut data = self.inner.borrow_mut();
        let index = index.min(data.children.len());
        data.children.insert(index, child.clone());
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
    }

    /// Detach this element from its parent, if it has one.
    pub fn remove_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent
                .inner
                .borrow_mut()
                .children
                .retain(|c| !c.same_node(self));
            self.inner.borrow_mut().parent = Weak::new();
        }
    }

    // --- queries ---

    /// First descendant (self excluded) matching `selector`, depth-first.
    pub fn query(&self, selector: &Selector) -> Option<Element> {
        self.query_steps(&selector.steps)
    }

    fn query_steps(&self, steps: &[SelectorStep]) -> Option<Element> {
        let (first, rest) = steps.split_first()?;
        for child in self.children() {
            if child.matches_step(first) {
                if rest.is_empty() {
                    return Some(child);
                }
                if let Some(found) = child.query_steps(rest) {
                    return Some(found);
                }
            }
            if let Some(found) = child.query_steps(steps) {
                return Some(found);
            }
        }
        None
    }

    fn matches_step(&self, step: &SelectorStep) -> bool {
        let data = self.inner.borrow();
        if let Some(tag) = &step.tag {
            if &data.tag != tag {
                return false;
            }
        }
        step.classes
            .iter()
            .all(|class| data.classes.iter().any(|c| c == class))
    }

    /// This element or the first descendant carrying `id`, depth-first.
    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        if self.id().as_deref() == Some(id) {
            return Some(self.clone());
        }
        for child in self.children() {
            if let Some(found) = child.find_by_id(id) {
                return Some(found);
            }
        }
        None
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let data = self.inner.borrow();
        write!(f, "{:indent$}{}", "", data.tag, indent = depth * 2)?;
        if let Some(id) = &data.id {
            write!(f, "#{id}")?;
        }
        for class in &data.classes {
            write!(f, ".{class}")?;
        }
        if !data.text.is_empty() {
            write!(f, " {:?}", data.text)?;
        }
        writeln!(f)?;
        for child in &data.children {
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented outline of the element subtree, one node per line.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        write!(f, "<{}", data.tag)?;
        if let Some(id) = &data.id {
            write!(f, " #{id}")?;
        }
        if !data.classes.is_empty() {
            write!(f, " .{}", data.classes.join("."))?;
        }
        write!(f, ">")
    }
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

/// One node as delivered by a "node inserted" notification. Mutation streams
/// routinely carry text nodes and unrelated elements, so non-elements are a
/// first-class case the detector must ignore.
#[derive(Clone, Debug)]
pub enum DomNode {
    Element(Element),
    Text(String),
}

impl DomNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Handle to the page document. Cloning aliases the same tree.
#[derive(Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: Element::new("body"),
        }
    }

    pub fn root(&self) -> Element {
        self.root.clone()
    }

    /// Fixed-id lookup over the live tree. Always resolves to the current
    /// node carrying the id, never a detached one.
    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.root.find_by_id(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Descendant selector over `tag.class` steps, e.g. `div.span12 h3`.
#[derive(Debug, Clone)]
pub struct Selector {
    steps: Vec<SelectorStep>,
}

#[derive(Debug, Clone)]
struct SelectorStep {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a whitespace-separated chain of `tag.class.class` steps.
    pub fn parse(input: &str) -> Result<Selector, String> {
        let mut steps = Vec::new();
        for token in input.split_whitespace() {
            let mut tag = None;
            let mut classes = Vec::new();
            for (i, part) in token.split('.').enumerate() {
                if i == 0 {
                    if !part.is_empty() {
                        tag = Some(part.to_string());
                    }
                } else if part.is_empty() {
                    return Err(format!("Failed to parse selector \"{input}\": empty class"));
                } else {
                    classes.push(part.to_string());
                }
            }
            if tag.is_none() && classes.is_empty() {
                return Err(format!("Failed to parse selector \"{input}\": empty step"));
            }
            steps.push(SelectorStep { tag, classes });
        }
        if steps.is_empty() {
            return Err("Failed to parse selector: empty input".to_string());
        }
        Ok(Selector { steps })
    }
}

// ---------------------------------------------------------------------------
// JSON node specs (replay scripts, test fixtures)
// ---------------------------------------------------------------------------

/// Declarative element tree, deserializable from replay scripts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Materialize the spec into a fresh element subtree.
    pub fn build(&self) -> Element {
        let tag = if self.tag.is_empty() { "div" } else { &self.tag };
        let el = Element::new(tag);
        if let Some(id) = &self.id {
            el.set_id(id);
        }
        for class in &self.classes {
            el.add_class(class);
        }
        if let Some(text) = &self.text {
            el.set_text(text);
        }
        for child in &self.children {
            el.append_child(&child.build());
        }
        el
    }
}
