//! In-memory `DomHost` fixture. A deliberately small tree-and-listener table
//! standing in for a real document: enough selector support for the helper
//! tests, listener storage with pointer-identity removal, and a FIFO
//! deferred-task queue.

// Each integration test binary compiles its own copy and uses a subset.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use simply::host::{DeferredTask, DomHost, NativeListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct MemoryEvent {
    pub event_type: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

struct ListenerSlot {
    event_type: String,
    listener: NativeListener<MemoryEvent>,
    capture: bool,
}

#[derive(Default)]
struct NodeData {
    tag: String,
    text: Option<String>,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    inline_styles: HashMap<String, String>,
    computed_styles: HashMap<String, String>,
    children: Vec<usize>,
    parent: Option<usize>,
    listeners: Vec<ListenerSlot>,
}

struct DomState {
    nodes: Vec<NodeData>,
    root: usize,
    body: usize,
}

pub struct MemoryDom {
    state: RefCell<DomState>,
    capture_supported: bool,
    deferred: RefCell<VecDeque<DeferredTask>>,
    ambient: RefCell<Option<MemoryEvent>>,
}

impl MemoryDom {
    pub fn new() -> Rc<Self> {
        Self::with_capture_support(true)
    }

    /// A host without capture-phase support (the on-prefixed-binding kind).
    pub fn legacy() -> Rc<Self> {
        Self::with_capture_support(false)
    }

    fn with_capture_support(capture_supported: bool) -> Rc<Self> {
        let mut nodes = Vec::new();
        nodes.push(NodeData {
            tag: "html".to_string(),
            ..NodeData::default()
        });
        nodes.push(NodeData {
            tag: "body".to_string(),
            parent: Some(0),
            ..NodeData::default()
        });
        nodes[0].children.push(1);
        Rc::new(Self {
            state: RefCell::new(DomState {
                nodes,
                root: 0,
                body: 1,
            }),
            capture_supported,
            deferred: RefCell::new(VecDeque::new()),
            ambient: RefCell::new(None),
        })
    }

    // -- test hooks --

    /// Dispatch an event at `node`, invoking every listener registered for
    /// `event_type` on it. The fixture leaves `current_target` unset, so the
    /// legacy-host patching path is observable.
    pub fn dispatch(&self, node: NodeId, event_type: &str) -> MemoryEvent {
        let listeners: Vec<NativeListener<MemoryEvent>> = {
            let state = self.state.borrow();
            state.nodes[node.0]
                .listeners
                .iter()
                .filter(|slot| slot.event_type == event_type)
                .map(|slot| Rc::clone(&slot.listener))
                .collect()
        };

        let mut event = MemoryEvent {
            event_type: event_type.to_string(),
            target: Some(node),
            ..MemoryEvent::default()
        };
        for listener in listeners {
            listener(&mut event);
        }
        event
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.state.borrow().nodes[node.0].listeners.len()
    }

    pub fn total_listeners(&self) -> usize {
        self.state
            .borrow()
            .nodes
            .iter()
            .map(|data| data.listeners.len())
            .sum()
    }

    /// Capture flags of the listeners registered for `event_type` on `node`,
    /// in registration order.
    pub fn capture_flags(&self, node: NodeId, event_type: &str) -> Vec<bool> {
        self.state.borrow().nodes[node.0]
            .listeners
            .iter()
            .filter(|slot| slot.event_type == event_type)
            .map(|slot| slot.capture)
            .collect()
    }

    pub fn text_of(&self, node: NodeId) -> Option<String> {
        self.state.borrow().nodes[node.0].text.clone()
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.state.borrow().nodes[node.0].children.len()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.borrow().nodes[node.0]
            .children
            .iter()
            .copied()
            .map(NodeId)
            .collect()
    }

    pub fn set_computed_style(&self, node: NodeId, property: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .computed_styles
            .insert(property.to_string(), value.to_string());
    }

    pub fn set_ambient_event(&self, event: MemoryEvent) {
        *self.ambient.borrow_mut() = Some(event);
    }

    /// Run deferred tasks in FIFO order until the queue drains.
    pub fn run_deferred(&self) {
        loop {
            let task = self.deferred.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    fn matches(&self, data: &NodeData, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            data.attrs.iter().any(|(name, value)| name == "id" && value == id)
        } else if let Some(class) = selector.strip_prefix('.') {
            data.classes.iter().any(|c| c == class)
        } else {
            data.tag.eq_ignore_ascii_case(selector)
        }
    }

    fn collect_matches(&self, selector: &str, from: usize, out: &mut Vec<NodeId>) {
        let children: Vec<usize> = self.state.borrow().nodes[from].children.clone();
        for child in children {
            let matched = {
                let state = self.state.borrow();
                self.matches(&state.nodes[child], selector)
            };
            if matched {
                out.push(NodeId(child));
            }
            self.collect_matches(selector, child, out);
        }
    }
}

impl DomHost for MemoryDom {
    type Node = NodeId;
    type Event = MemoryEvent;

    fn node_by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.state.borrow();
        state
            .nodes
            .iter()
            .position(|data| {
                data.attrs
                    .iter()
                    .any(|(name, value)| name == "id" && value == id)
            })
            .map(NodeId)
    }

    /// Supports single simple selectors only: `#id`, `.class`, or a tag name.
    fn query(&self, selector: &str, root: Option<&NodeId>) -> Vec<NodeId> {
        let from = root.map(|node| node.0).unwrap_or(self.state.borrow().root);
        let mut out = Vec::new();
        self.collect_matches(selector, from, &mut out);
        out
    }

    fn create_element(&self, tag: &str) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        NodeId(state.nodes.len() - 1)
    }

    fn create_text(&self, text: &str) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(NodeData {
            tag: "#text".to_string(),
            text: Some(text.to_string()),
            ..NodeData::default()
        });
        NodeId(state.nodes.len() - 1)
    }

    fn body(&self) -> NodeId {
        NodeId(self.state.borrow().body)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut state = self.state.borrow_mut();
        state.nodes[parent.0].children.push(child.0);
        state.nodes[child.0].parent = Some(parent.0);
    }

    fn insert_before(&self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        let mut state = self.state.borrow_mut();
        let position = reference
            .and_then(|r| state.nodes[parent.0].children.iter().position(|c| *c == r.0))
            .unwrap_or(state.nodes[parent.0].children.len());
        state.nodes[parent.0].children.insert(position, child.0);
        state.nodes[child.0].parent = Some(parent.0);
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) {
        let mut state = self.state.borrow_mut();
        state.nodes[parent.0].children.retain(|c| *c != child.0);
        state.nodes[child.0].parent = None;
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.state.borrow().nodes[node.0]
            .children
            .first()
            .copied()
            .map(NodeId)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.state.borrow().nodes[node.0].parent.map(NodeId)
    }

    fn element_id(&self, node: &NodeId) -> Option<String> {
        self.state.borrow().nodes[node.0]
            .attrs
            .iter()
            .find(|(name, _)| name == "id")
            .map(|(_, value)| value.clone())
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.state.borrow().nodes[node.0].tag.clone()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        let attrs = &mut state.nodes[node.0].attrs;
        match attrs.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.state.borrow_mut().nodes[node.0]
            .classes
            .retain(|c| c != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.state.borrow().nodes[node.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    /// Computed values set through the test hook win; otherwise the inline
    /// style is the computed value, the way a real engine resolves it.
    fn computed_style(&self, node: &NodeId, property: &str) -> Option<String> {
        let state = self.state.borrow();
        let data = &state.nodes[node.0];
        data.computed_styles
            .get(property)
            .or_else(|| data.inline_styles.get(property))
            .cloned()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .inline_styles
            .insert(property.to_string(), value.to_string());
    }

    fn supports_capture(&self) -> bool {
        self.capture_supported
    }

    fn add_native_listener(
        &self,
        node: &NodeId,
        event_type: &str,
        listener: NativeListener<MemoryEvent>,
        capture: bool,
    ) {
        self.state.borrow_mut().nodes[node.0]
            .listeners
            .push(ListenerSlot {
                event_type: event_type.to_string(),
                listener,
                capture,
            });
    }

    fn remove_native_listener(
        &self,
        node: &NodeId,
        event_type: &str,
        listener: &NativeListener<MemoryEvent>,
        capture: bool,
    ) {
        let mut state = self.state.borrow_mut();
        let listeners = &mut state.nodes[node.0].listeners;
        if let Some(position) = listeners.iter().position(|slot| {
            slot.event_type == event_type
                && slot.capture == capture
                && Rc::ptr_eq(&slot.listener, listener)
        }) {
            listeners.remove(position);
        }
    }

    fn patch_current_target(&self, event: &mut MemoryEvent, target: &NodeId) {
        event.current_target = Some(*target);
    }

    fn prevent_default(&self, event: &mut MemoryEvent) {
        event.default_prevented = true;
    }

    fn stop_propagation(&self, event: &mut MemoryEvent) {
        event.propagation_stopped = true;
    }

    fn event_target(&self, event: &MemoryEvent) -> Option<NodeId> {
        event.target
    }

    fn current_event(&self) -> Option<MemoryEvent> {
        self.ambient.borrow().clone()
    }

    fn defer(&self, task: DeferredTask) {
        self.deferred.borrow_mut().push_back(task);
    }
}

/// Install a test subscriber once so `RUST_LOG` filtering works when
/// debugging a failing test.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
