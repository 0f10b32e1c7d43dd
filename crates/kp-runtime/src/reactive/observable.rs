#![forbid(unsafe_code)]

//! Shared value cell that tells its listeners when it changes.
//!
//! The page keeps exactly one of these: the active section. The scroll-spy
//! tracker and navigation jumps write it, the page listens and turns every
//! change into an `active_section` host log line. Handles are cheap clones
//! of one `Rc`, so writer and listener never need to know about each other.
//!
//! Writing the value that is already stored is silent. Listeners run after
//! the cell is released, so a listener may write the cell again; the nested
//! write notifies on its own.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type Listener<T> = dyn Fn(&T);

struct Slot<T> {
    value: T,
    listeners: Vec<Weak<Listener<T>>>,
}

/// Shared, change-notifying value. Clones alias the same slot.
pub struct Observable<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&self.slot.borrow().value).finish()
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Store `value`. Returns `false`, without notifying, when it equals the
    /// current value.
    pub fn set(&self, value: T) -> bool {
        let listeners = {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return false;
            }
            slot.value = value.clone();
            slot.listeners.retain(|l| l.strong_count() > 0);
            slot.listeners.iter().filter_map(Weak::upgrade).collect::<Vec<_>>()
        };
        trace!(?value, listeners = listeners.len(), "observable set");
        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Call `listener` with every future value. Listening stops when the
    /// returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Listener<T>> = Rc::new(listener);
        self.slot.borrow_mut().listeners.push(Rc::downgrade(&strong));
        Subscription {
            _listener: Box::new(strong),
        }
    }
}

/// Keeps a listener registered while alive.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
