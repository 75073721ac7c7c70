//! # Listeners
//!
//! A listener is what callers hand to a target: either a plain function or
//! an object with a single "handle event" method ([`EventListener`]).
//!
//! Both shapes are stored behind an `Rc`, and the address of that allocation
//! is the listener's identity ([`ListenerId`]). Cloning a [`Listener`] keeps
//! its identity, so the handle returned by a registration call can later be
//! used to remove exactly that registration.
//!
//! The shape is resolved once, at registration, into a [`HostCallback`]:
//! the uniform closure type the host delivery primitive invokes.

use std::{fmt, rc::Rc};

/// The uniform callback handed to a host delivery primitive.
pub type HostCallback<E> = Rc<dyn Fn(&E)>;

/// Identity of a listener or host callback.
///
/// Two listeners are the same listener iff they share an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        ListenerId(Rc::as_ptr(rc).cast::<()>() as usize)
    }

    /// Identity of a host callback.
    pub fn of_callback<E>(callback: &HostCallback<E>) -> Self {
        Self::of(callback)
    }
}

/// An object that handles events through a single method.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `EventListener` for `{E}`",
    label = "missing `EventListener` implementation",
    note = "Event listeners must implement `handle_event` for `{E}`."
)]
pub trait EventListener<E>: 'static {
    /// Called when a matching event is delivered.
    fn handle_event(&self, event: &E);
}

/// A caller-supplied listener.
pub enum Listener<E> {
    /// A plain function.
    Function(Rc<dyn Fn(&E)>),
    /// An object implementing [`EventListener`].
    Handler(Rc<dyn EventListener<E>>),
}

impl<E: 'static> Listener<E> {
    /// Wrap a function.
    pub fn function(f: impl Fn(&E) + 'static) -> Self {
        Listener::Function(Rc::new(f))
    }

    /// Wrap a handler object.
    ///
    /// To share one handler object between several registrations, build the
    /// listener from an `Rc` with [`Listener::from`] instead.
    pub fn handler(handler: impl EventListener<E>) -> Self {
        Listener::Handler(Rc::new(handler))
    }

    /// Identity of this listener.
    pub fn id(&self) -> ListenerId {
        match self {
            Listener::Function(f) => ListenerId::of(f),
            Listener::Handler(h) => ListenerId::of(h),
        }
    }

    /// Whether `other` is the same listener.
    pub fn same_as(&self, other: &Listener<E>) -> bool {
        self.id() == other.id()
    }

    /// Invoke the listener directly.
    pub fn call(&self, event: &E) {
        match self {
            Listener::Function(f) => f(event),
            Listener::Handler(h) => h.handle_event(event),
        }
    }

    /// Resolve the listener into a uniform callback.
    ///
    /// The function form is returned as is; the handler form is adapted
    /// into a closure calling its handler method.
    pub fn resolve(&self) -> HostCallback<E> {
        match self {
            Listener::Function(f) => Rc::clone(f),
            Listener::Handler(h) => {
                let h = Rc::clone(h);
                Rc::new(move |event: &E| h.handle_event(event))
            }
        }
    }
}

impl<E> Clone for Listener<E> {
    fn clone(&self) -> Self {
        match self {
            Listener::Function(f) => Listener::Function(Rc::clone(f)),
            Listener::Handler(h) => Listener::Handler(Rc::clone(h)),
        }
    }
}

impl<E: 'static> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Listener::Function(_) => "Function",
            Listener::Handler(_) => "Handler",
        };
        f.debug_struct("Listener")
            .field("kind", &kind)
            .field("id", &self.id())
            .finish()
    }
}

/// Listeners compare by identity.
impl<E: 'static> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<E: 'static> Eq for Listener<E> {}

impl<E, H> From<Rc<H>> for Listener<E>
where
    H: EventListener<E>,
{
    fn from(handler: Rc<H>) -> Self {
        Listener::Handler(handler)
    }
}

/// Conversion into a [`Listener`].
///
/// Implemented for closures, for [`Listener`] itself and for `&Listener`,
/// so registration methods accept any of them.
pub trait IntoListener<E> {
    /// Convert into a listener.
    fn into_listener(self) -> Listener<E>;
}

impl<E> IntoListener<E> for Listener<E> {
    fn into_listener(self) -> Listener<E> {
        self
    }
}

impl<E> IntoListener<E> for &Listener<E> {
    fn into_listener(self) -> Listener<E> {
        self.clone()
    }
}

impl<E, F> IntoListener<E> for F
where
    E: 'static,
    F: Fn(&E) + 'static,
{
    fn into_listener(self) -> Listener<E> {
        Listener::function(self)
    }
}
