//! Named application signals and a listener registry with RAII unsubscription.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Signals raised by the application menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuSignal {
    OpenFile,
    NewFile,
}

impl MenuSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenFile => "menu-open-file",
            Self::NewFile => "menu-new-file",
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut()>>;

struct Entry<S> {
    id: u64,
    signal: S,
    handler: Handler,
}

struct Registry<S> {
    next_id: u64,
    entries: Vec<Entry<S>>,
}

/// Single-threaded signal bus. Cloning shares the same registry.
pub struct EventBus<S> {
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S> Clone for EventBus<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<S: Copy + PartialEq + 'static> Default for EventBus<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy + PartialEq + 'static> EventBus<S> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Subscribe `handler` to `signal`. The subscription lives as long as
    /// the returned `Listener`.
    pub fn listen(&self, signal: S, handler: impl FnMut() + 'static) -> Listener {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            signal,
            handler: Rc::new(RefCell::new(handler)),
        });

        let weak: Weak<RefCell<Registry<S>>> = Rc::downgrade(&self.registry);
        Listener {
            id,
            detach: Some(Box::new(move |id| {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().entries.retain(|e| e.id != id);
                }
            })),
        }
    }

    /// Deliver `signal` to every current listener. Returns how many ran.
    ///
    /// Handlers are collected before any runs, so a handler may subscribe or
    /// unsubscribe without tripping the registry borrow. A handler that is
    /// already running (re-entrant emit) is skipped.
    pub fn emit(&self, signal: S) -> usize {
        let handlers: Vec<Handler> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|e| e.signal == signal)
            .map(|e| Rc::clone(&e.handler))
            .collect();

        let mut delivered = 0;
        for handler in handlers {
            if let Ok(mut run) = handler.try_borrow_mut() {
                (&mut *run)();
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&self, signal: S) -> usize {
        self.registry
            .borrow()
            .entries
            .iter()
            .filter(|e| e.signal == signal)
            .count()
    }
}

/// Subscription guard returned by `EventBus::listen`. Dropping it unsubscribes.
pub struct Listener {
    id: u64,
    detach: Option<Box<dyn FnOnce(u64)>>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
