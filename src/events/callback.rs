use std::rc::Rc;

use crate::host::{DomHost, NativeListener};

use super::{ListenerError, ListenerId};

/// Plain handler closure: `f(event, target, id)`.
pub type HandlerFn<E, N> = Rc<dyn Fn(&mut E, &N, &ListenerId)>;

/// An object exposing named handler methods, the receiver side of the
/// object-plus-method-name callback shapes.
pub trait HandlerObject<H: DomHost> {
    /// Whether `name` resolves to a callable method on this receiver.
    fn has_method(&self, name: &str) -> bool;

    /// Invoke the named method as `receiver.name(event, target, id)`. Only
    /// called with names that passed [`HandlerObject::has_method`] at attach
    /// time.
    fn call_method(&self, name: &str, event: &mut H::Event, target: &H::Node, id: &ListenerId);

    /// Conventional dispatch used when the object itself is the callback.
    fn handle_event(&self, _event: &mut H::Event) {}
}

/// The four callback shapes accepted by attach.
///
/// Shapes are resolved once, at attach time, into a single normalized
/// [`NativeListener`] closure; no runtime shape inspection happens on the
/// dispatch path.
pub enum Callback<H: DomHost> {
    /// Plain function, called as `f(event, target, id)`.
    Function(HandlerFn<H::Event, H::Node>),
    /// Named method on a receiver, validated at attach time. Fails with
    /// [`ListenerError::InvalidReference`] when the name does not resolve.
    Method {
        receiver: Rc<dyn HandlerObject<H>>,
        name: String,
    },
    /// Free function invoked with the receiver as its first argument.
    Bound {
        receiver: Rc<dyn HandlerObject<H>>,
        #[allow(clippy::type_complexity)]
        func: Rc<dyn Fn(&dyn HandlerObject<H>, &mut H::Event, &H::Node, &ListenerId)>,
    },
    /// Bare object dispatched through its `handle_event` method. On legacy
    /// hosts the event's current target is patched on before dispatch.
    Object(Rc<dyn HandlerObject<H>>),
}

impl<H: DomHost> Callback<H> {
    pub fn function(f: impl Fn(&mut H::Event, &H::Node, &ListenerId) + 'static) -> Self {
        Callback::Function(Rc::new(f))
    }

    pub fn method<R>(receiver: Rc<R>, name: impl Into<String>) -> Self
    where
        R: HandlerObject<H> + 'static,
    {
        Callback::Method {
            receiver,
            name: name.into(),
        }
    }

    pub fn bound<R>(
        receiver: Rc<R>,
        func: impl Fn(&dyn HandlerObject<H>, &mut H::Event, &H::Node, &ListenerId) + 'static,
    ) -> Self
    where
        R: HandlerObject<H> + 'static,
    {
        Callback::Bound {
            receiver,
            func: Rc::new(func),
        }
    }

    pub fn object<R>(receiver: Rc<R>) -> Self
    where
        R: HandlerObject<H> + 'static,
    {
        Callback::Object(receiver)
    }

    /// Collapse the shape into the normalized invocation closure for one
    /// (target, id) binding. Method names that do not resolve fail here,
    /// before any native registration happens.
    pub(crate) fn resolve(
        self,
        host: &Rc<H>,
        target: &H::Node,
        id: &ListenerId,
    ) -> Result<NativeListener<H::Event>, ListenerError> {
        let target = target.clone();
        let id = id.clone();
        match self {
            Callback::Function(f) => Ok(Rc::new(move |event| f(event, &target, &id))),
            Callback::Method { receiver, name } => {
                if !receiver.has_method(&name) {
                    return Err(ListenerError::InvalidReference { method: name });
                }
                Ok(Rc::new(move |event| {
                    receiver.call_method(&name, event, &target, &id)
                }))
            }
            Callback::Bound { receiver, func } => Ok(Rc::new(move |event| {
                func(receiver.as_ref(), event, &target, &id)
            })),
            Callback::Object(receiver) => {
                let host = Rc::clone(host);
                let legacy = !host.supports_capture();
                Ok(Rc::new(move |event| {
                    if legacy {
                        host.patch_current_target(event, &target);
                    }
                    receiver.handle_event(event);
                }))
            }
        }
    }
}
