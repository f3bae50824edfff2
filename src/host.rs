use std::rc::Rc;

/// Normalized listener closure handed to the host event system.
///
/// The registry resolves every callback shape into one of these at attach
/// time; removal matches by `Rc` pointer identity.
pub type NativeListener<E> = Rc<dyn Fn(&mut E)>;

/// Deferred task scheduled by [`DomHost::defer`].
pub type DeferredTask = Box<dyn FnOnce()>;

/// The DOM-like environment the library runs against.
///
/// The library never owns or reimplements the document tree; everything it
/// does is a thin call through this seam. Hosts are expected to use interior
/// mutability (the execution model is single-threaded and non-preemptive, so
/// plain `RefCell` state is enough).
pub trait DomHost: 'static {
    /// Opaque handle to a node. Node lifetime is owned by the host; handles
    /// are cheap to clone.
    type Node: Clone + 'static;
    /// Host event object passed to listeners.
    type Event: 'static;

    // -- lookup --

    /// Node lookup by element id.
    fn node_by_id(&self, id: &str) -> Option<Self::Node>;

    /// CSS-selector query rooted at `root` (or the document when `None`),
    /// returning matches in document order. Selector strings pass through
    /// verbatim; the host owns selector semantics.
    fn query(&self, selector: &str, root: Option<&Self::Node>) -> Vec<Self::Node>;

    // -- creation and tree structure --

    fn create_element(&self, tag: &str) -> Self::Node;
    fn create_text(&self, text: &str) -> Self::Node;

    /// The document body, used as the insertion root for probe elements.
    fn body(&self) -> Self::Node;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);
    fn remove_child(&self, parent: &Self::Node, child: &Self::Node);
    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    // -- element introspection --

    /// The element's `id` attribute, if any.
    fn element_id(&self, node: &Self::Node) -> Option<String>;
    fn tag_name(&self, node: &Self::Node) -> String;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    // -- classes --

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    // -- styles --

    /// Computed value of a single style property.
    fn computed_style(&self, node: &Self::Node, property: &str) -> Option<String>;
    /// Inline style write.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    // -- events --

    /// Whether the host supports capture-phase registration. Hosts returning
    /// `false` are legacy on-prefixed-binding hosts: the capture flag is
    /// ignored and object callbacks get the current target patched onto the
    /// event before dispatch.
    fn supports_capture(&self) -> bool {
        true
    }

    fn add_native_listener(
        &self,
        node: &Self::Node,
        event_type: &str,
        listener: NativeListener<Self::Event>,
        capture: bool,
    );

    /// Removal must match the listener registered with the same
    /// (node, event type, capture) triple by `Rc` pointer identity.
    fn remove_native_listener(
        &self,
        node: &Self::Node,
        event_type: &str,
        listener: &NativeListener<Self::Event>,
        capture: bool,
    );

    /// Set the event's current target. Invoked before `handle_event`
    /// dispatch on legacy hosts.
    fn patch_current_target(&self, event: &mut Self::Event, target: &Self::Node);

    fn prevent_default(&self, event: &mut Self::Event);
    fn stop_propagation(&self, event: &mut Self::Event);
    fn event_target(&self, event: &Self::Event) -> Option<Self::Node>;

    /// Ambient current event for hosts whose handlers are invoked without an
    /// event argument. Hosts with per-call event parameters leave this alone.
    fn current_event(&self) -> Option<Self::Event> {
        None
    }

    // -- scheduling --

    /// Schedule `task` to run after the current execution turn. FIFO
    /// relative to other deferred tasks; no other ordering guarantee.
    fn defer(&self, task: DeferredTask);
}
