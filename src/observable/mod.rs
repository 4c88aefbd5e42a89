//! Typed publish/subscribe primitive with a fixed event vocabulary per owner.
//!
//! Each owning component declares a closed set of event kinds at construction.
//! Subscribing to or firing an undeclared kind is a wiring bug and surfaces as
//! [`TourError::UnknownEvent`] immediately. Dispatch is synchronous and runs
//! handlers in subscription order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::error::{Result, TourError};

/// Closed event-kind enums implement this so diagnostics can name events.
pub trait EventKind: Copy + Eq + Hash + 'static {
    fn as_str(&self) -> &'static str;
}

type Handler<P> = Rc<RefCell<dyn FnMut(&P)>>;

struct Registration<P> {
    id: u64,
    handler: Handler<P>,
}

struct Inner<E: EventKind, P> {
    owner: &'static str,
    declared: Vec<E>,
    handlers: HashMap<E, Vec<Registration<P>>>,
    next_id: u64,
    destroyed: bool,
}

impl<E: EventKind, P> Inner<E, P> {
    fn check_alive(&self) {
        if self.destroyed {
            panic!("observable `{}` used after destroy", self.owner);
        }
    }

    fn check_declared(&self, event: E) -> Result<()> {
        if self.declared.contains(&event) {
            Ok(())
        } else {
            Err(TourError::UnknownEvent {
                owner: self.owner.to_string(),
                event: event.as_str().to_string(),
            })
        }
    }
}

/// Handle to a shared handler table. Cloning the handle shares storage, so a
/// component can fire from one clone while subscribers registered through
/// another.
pub struct Observable<E: EventKind, P> {
    inner: Rc<RefCell<Inner<E, P>>>,
}

impl<E: EventKind, P> Clone for Observable<E, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: EventKind, P> Observable<E, P> {
    pub fn new(owner: &'static str, declared: &[E]) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                owner,
                declared: declared.to_vec(),
                handlers: HashMap::new(),
                next_id: 0,
                destroyed: false,
            })),
        }
    }

    /// Bind a handler, returning a disposer capturing only this registration.
    pub fn on(&self, event: E, handler: impl FnMut(&P) + 'static) -> Result<Binding<E, P>> {
        let mut inner = self.inner.borrow_mut();
        inner.check_alive();
        inner.check_declared(event)?;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.entry(event).or_default().push(Registration {
            id,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(Binding {
            inner: Rc::downgrade(&self.inner),
            event,
            id,
        })
    }

    /// Unbind handlers for an event. With an id, removes that registration
    /// only; without, clears every handler bound to the event. Unbinding a
    /// registration that is already gone is a no-op.
    pub fn off(&self, event: E, id: Option<u64>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check_alive();
        inner.check_declared(event)?;
        if let Some(registrations) = inner.handlers.get_mut(&event) {
            match id {
                Some(id) => registrations.retain(|r| r.id != id),
                None => registrations.clear(),
            }
        }
        Ok(())
    }

    /// Invoke all currently-subscribed handlers synchronously, in
    /// subscription order. The handler list is snapshotted first so a handler
    /// may subscribe or unsubscribe without upsetting this dispatch.
    pub fn fire(&self, event: E, payload: &P) -> Result<()> {
        let snapshot: Vec<Handler<P>> = {
            let inner = self.inner.borrow();
            inner.check_alive();
            inner.check_declared(event)?;
            inner
                .handlers
                .get(&event)
                .map(|registrations| {
                    registrations
                        .iter()
                        .map(|r| Rc::clone(&r.handler))
                        .collect()
                })
                .unwrap_or_default()
        };
        for handler in snapshot {
            (handler.borrow_mut())(payload);
        }
        Ok(())
    }

    /// Drop all handler storage. Further use is a programmer error and
    /// panics.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.handlers.clear();
        inner.destroyed = true;
    }

    #[cfg(test)]
    fn handler_count(&self, event: E) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&event)
            .map_or(0, |r| r.len())
    }
}

/// Disposer for a single registration. Disposing is idempotent and releases
/// only the binding it captured, so independent observers tear down in
/// isolation.
#[derive(Debug)]
pub struct Binding<E: EventKind, P> {
    inner: Weak<RefCell<Inner<E, P>>>,
    event: E,
    id: u64,
}

impl<E: EventKind, P> Binding<E, P> {
    pub fn dispose(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.borrow_mut();
            if inner.destroyed {
                return;
            }
            if let Some(registrations) = inner.handlers.get_mut(&self.event) {
                registrations.retain(|r| r.id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Probe {
        Ping,
        Pong,
    }

    impl EventKind for Probe {
        fn as_str(&self) -> &'static str {
            match self {
                Probe::Ping => "ping",
                Probe::Pong => "pong",
            }
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, Observable<Probe, u32>) {
        (
            Rc::new(RefCell::new(Vec::new())),
            Observable::new("probe", &[Probe::Ping]),
        )
    }

    #[test]
    fn fires_handlers_in_subscription_order() {
        let (log, observable) = recorder();
        let first = Rc::clone(&log);
        let second = Rc::clone(&log);
        observable
            .on(Probe::Ping, move |_| first.borrow_mut().push("first"))
            .unwrap();
        observable
            .on(Probe::Ping, move |_| second.borrow_mut().push("second"))
            .unwrap();
        observable.fire(Probe::Ping, &1).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn undeclared_event_is_rejected() {
        let (_, observable) = recorder();
        let err = observable.on(Probe::Pong, |_| {}).unwrap_err();
        assert!(matches!(err, TourError::UnknownEvent { .. }));
        let err = observable.fire(Probe::Pong, &0).unwrap_err();
        assert!(matches!(err, TourError::UnknownEvent { .. }));
    }

    #[test]
    fn disposing_one_binding_leaves_the_other() {
        let (log, observable) = recorder();
        let first = Rc::clone(&log);
        let second = Rc::clone(&log);
        let binding = observable
            .on(Probe::Ping, move |_| first.borrow_mut().push("first"))
            .unwrap();
        observable
            .on(Probe::Ping, move |_| second.borrow_mut().push("second"))
            .unwrap();
        binding.dispose();
        binding.dispose();
        observable.fire(Probe::Ping, &1).unwrap();
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn off_without_id_clears_all_handlers() {
        let (log, observable) = recorder();
        let sink = Rc::clone(&log);
        observable
            .on(Probe::Ping, move |_| sink.borrow_mut().push("hit"))
            .unwrap();
        observable.off(Probe::Ping, None).unwrap();
        observable.fire(Probe::Ping, &1).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(observable.handler_count(Probe::Ping), 0);
    }

    #[test]
    fn handler_may_unsubscribe_during_dispatch() {
        let (log, observable) = recorder();
        let clone = observable.clone();
        let sink = Rc::clone(&log);
        observable
            .on(Probe::Ping, move |_| {
                sink.borrow_mut().push("hit");
                clone.off(Probe::Ping, None).unwrap();
            })
            .unwrap();
        observable.fire(Probe::Ping, &1).unwrap();
        observable.fire(Probe::Ping, &1).unwrap();
        assert_eq!(*log.borrow(), vec!["hit"]);
    }

    #[test]
    #[should_panic(expected = "used after destroy")]
    fn use_after_destroy_panics() {
        let (_, observable) = recorder();
        observable.destroy();
        let _ = observable.fire(Probe::Ping, &1);
    }
}
