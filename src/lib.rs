//! Host-agnostic DOM convenience helpers: element selection, listener
//! bookkeeping, class and style access, markup/script separation, and
//! platform sniffing, all behind the [`host::DomHost`] seam.

pub mod dom;
pub mod events;
pub mod host;
pub mod html;
pub mod platform;
pub mod util;

// Re-export commonly used types
pub use dom::{ElementBuilder, Simply};
pub use events::{
    Callback, EventTypes, HandlerObject, ListenerError, ListenerId, ListenerRegistry,
};
pub use host::{DeferredTask, DomHost, NativeListener};
pub use html::{separate_js, SeparatedHtml};
pub use platform::{Client, Platform};
