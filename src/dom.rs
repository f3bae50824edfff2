//! The helper surface: selection, tree edits, classes, styles, and the
//! listener lifecycle, all delegated through the [`DomHost`] seam.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::events::{Callback, EventTypes, ListenerError, ListenerId, ListenerRegistry};
use crate::host::DomHost;

/// Simple-selector parts understood by [`Simply::find_parent`]:
/// `#id`, `.class`, or a bare tag name.
static SELECTOR_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[#.]?[a-z0-9_-]+").expect("selector part pattern"));

enum SelectorPart {
    Id(String),
    Class(String),
    Tag(String),
}

fn parse_selector_parts(selector: &str) -> Vec<SelectorPart> {
    SELECTOR_PART
        .find_iter(selector)
        .map(|m| {
            let part = m.as_str();
            match part.as_bytes()[0] {
                b'#' => SelectorPart::Id(part[1..].to_string()),
                b'.' => SelectorPart::Class(part[1..].to_string()),
                _ => SelectorPart::Tag(part.to_string()),
            }
        })
        .collect()
}

/// The library's entry point: a handle to the host environment plus the
/// listener registry for bookkeeping. An explicit value rather than a
/// process-wide singleton, so independent instances (and their registries)
/// can coexist.
pub struct Simply<H: DomHost> {
    host: Rc<H>,
    events: RefCell<ListenerRegistry<H>>,
}

impl<H: DomHost> Simply<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            events: RefCell::new(ListenerRegistry::new(Rc::clone(&host))),
            host,
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    // -- selection --

    /// Select nodes by CSS selector, rooted at `root` (or the document).
    ///
    /// A selector that is a lone `#id` with no descendant part short-circuits
    /// to the host's id lookup instead of a full query.
    pub fn select(&self, selector: &str, root: Option<&H::Node>) -> Vec<H::Node> {
        if let Some(id) = selector.strip_prefix('#') {
            if !selector.contains(' ') {
                return self.host.node_by_id(id).into_iter().collect();
            }
        }
        self.host.query(selector, root)
    }

    pub fn element_by_id(&self, id: &str) -> Option<H::Node> {
        self.host.node_by_id(id)
    }

    /// Walk ancestors of `node` until one matches every part of the simple
    /// selector (`#id`, `.class`, tag name, or a combination).
    pub fn find_parent(&self, node: &H::Node, selector: &str) -> Option<H::Node> {
        let parts = parse_selector_parts(selector);

        let mut current = self.host.parent(node);
        while let Some(candidate) = current {
            let matches = parts.iter().all(|part| match part {
                SelectorPart::Id(id) => self.host.element_id(&candidate).as_deref() == Some(id),
                SelectorPart::Class(class) => self.host.has_class(&candidate, class),
                SelectorPart::Tag(tag) => self.host.tag_name(&candidate).eq_ignore_ascii_case(tag),
            });
            if matches {
                return Some(candidate);
            }
            current = self.host.parent(&candidate);
        }
        None
    }

    // -- creation and tree edits --

    /// Start building an element; finish with [`ElementBuilder::build`].
    pub fn element(&self, tag: &str) -> ElementBuilder<'_, H> {
        ElementBuilder {
            simply: self,
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn text(&self, text: &str) -> H::Node {
        self.host.create_text(text)
    }

    /// Append each child to `parent` in order.
    pub fn append(&self, parent: &H::Node, children: &[H::Node]) {
        for child in children {
            self.host.append_child(parent, child);
        }
    }

    /// Remove every child of `node`.
    pub fn remove_children(&self, node: &H::Node) {
        while let Some(child) = self.host.first_child(node) {
            self.host.remove_child(node, &child);
        }
    }

    // -- classes --

    /// Add one or more classes; `classes` may be space-delimited.
    pub fn add_class(&self, node: &H::Node, classes: &str) {
        for class in classes.split_whitespace() {
            self.host.add_class(node, class);
        }
    }

    /// List form of [`Simply::add_class`]; each item may itself be
    /// space-delimited.
    pub fn add_class_list<I, S>(&self, node: &H::Node, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in classes {
            self.add_class(node, entry.as_ref());
        }
    }

    pub fn remove_class(&self, node: &H::Node, classes: &str) {
        for class in classes.split_whitespace() {
            self.host.remove_class(node, class);
        }
    }

    pub fn remove_class_list<I, S>(&self, node: &H::Node, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in classes {
            self.remove_class(node, entry.as_ref());
        }
    }

    pub fn has_class(&self, node: &H::Node, class: &str) -> bool {
        self.host.has_class(node, class)
    }

    // -- styles --

    /// Computed value of a single style property.
    pub fn style(&self, node: &H::Node, property: &str) -> Option<String> {
        self.host.computed_style(node, property)
    }

    /// Bulk inline-style write.
    pub fn set_styles(&self, node: &H::Node, styles: &[(&str, &str)]) {
        for (property, value) in styles {
            self.host.set_style(node, property, value);
        }
    }

    // -- listener lifecycle --

    pub fn attach(
        &self,
        target: &H::Node,
        event_types: impl Into<EventTypes>,
        callback: Callback<H>,
        capture: bool,
    ) -> Result<ListenerId, ListenerError> {
        self.events
            .borrow_mut()
            .attach(target, event_types, callback, capture)
    }

    pub fn detach(&self, id: &ListenerId) -> Result<(), ListenerError> {
        self.events.borrow_mut().detach(id)
    }

    pub fn detach_many<I>(&self, ids: I) -> Result<(), ListenerError>
    where
        I: IntoIterator<Item = ListenerId>,
    {
        self.events.borrow_mut().detach_many(ids)
    }

    pub fn detach_all(&self) {
        self.events.borrow_mut().detach_all();
    }

    pub fn listener_count(&self) -> usize {
        self.events.borrow().len()
    }

    // -- event helpers --

    pub fn cancel_event(&self, event: &mut H::Event) {
        self.host.prevent_default(event);
    }

    pub fn stop_event(&self, event: &mut H::Event) {
        self.host.stop_propagation(event);
    }

    pub fn event_target(&self, event: &H::Event) -> Option<H::Node> {
        self.host.event_target(event)
    }

    /// Ambient current event, for legacy hosts whose handlers are invoked
    /// without an event argument.
    pub fn current_event(&self) -> Option<H::Event> {
        self.host.current_event()
    }

    // -- scheduling --

    /// Fire-and-forget: run `task` after the current execution turn. FIFO
    /// relative to other deferred tasks only.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.host.defer(Box::new(task));
    }

    // -- device probe --

    /// Read the device string from the `content` computed style of a hidden
    /// probe element, creating and inserting the probe before the body's
    /// first child when it does not exist yet.
    pub fn device(&self, probe_id: &str) -> Option<String> {
        let probe = match self.host.node_by_id(probe_id) {
            Some(node) => node,
            None => {
                let node = self
                    .element("div")
                    .attr("id", probe_id)
                    .style("display", "none")
                    .build();
                let body = self.host.body();
                let first = self.host.first_child(&body);
                self.host.insert_before(&body, &node, first.as_ref());
                node
            }
        };
        self.host
            .computed_style(&probe, "content")
            .map(|value| value.replace('"', ""))
    }
}

/// Builder for element creation with classes, attributes and inline styles
/// applied in one step.
pub struct ElementBuilder<'a, H: DomHost> {
    simply: &'a Simply<H>,
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
}

impl<H: DomHost> ElementBuilder<'_, H> {
    /// Add classes; space-delimited strings are split.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.push(classes.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.push((property.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> H::Node {
        let host = self.simply.host();
        let node = host.create_element(&self.tag);
        for classes in &self.classes {
            self.simply.add_class(&node, classes);
        }
        for (name, value) in &self.attrs {
            host.set_attribute(&node, name, value);
        }
        for (property, value) in &self.styles {
            host.set_style(&node, property, value);
        }
        node
    }
}
