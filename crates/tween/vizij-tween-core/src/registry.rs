//! Element -> Animator association.
//!
//! Entries hold their element weakly and are pruned on lookup once the element
//! is gone, so the registry never extends an element's lifetime.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;

use crate::animator::Animator;
use crate::config::Config;
use crate::style::StyleTarget;
use crate::timing::TimingSource;

/// Builds the timing source for a new animator (capability detection).
pub type TimingFactory = Box<dyn Fn(&Config) -> Rc<dyn TimingSource>>;

struct Entry<E> {
    element: Weak<E>,
    animator: Animator,
}

pub struct Registry<E> {
    cfg: Config,
    timing: TimingFactory,
    entries: RefCell<HashMap<*const E, Entry<E>>>,
}

impl<E: StyleTarget + 'static> Registry<E> {
    pub fn new<F>(cfg: Config, timing: F) -> Self
    where
        F: Fn(&Config) -> Rc<dyn TimingSource> + 'static,
    {
        Self {
            cfg,
            timing: Box::new(timing),
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// The animator for `element`, created on first lookup.
    pub fn take(&self, element: &Rc<E>) -> Animator {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, e| e.element.strong_count() > 0);
        let key = Rc::as_ptr(element);
        if let Some(entry) = entries.get(&key) {
            return entry.animator.clone();
        }
        let animator = Animator::new(element, (self.timing)(&self.cfg), &self.cfg);
        entries.insert(
            key,
            Entry {
                element: Rc::downgrade(element),
                animator: animator.clone(),
            },
        );
        animator
    }

    /// Number of live associations.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|e| e.element.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
