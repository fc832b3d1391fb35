//! Scoped registration of document-level listeners.
//!
//! Widgets that need events from outside their own bounds (a pointer-down
//! anywhere on the page, the last input device used) acquire a listener from
//! a shared [`ListenerRegistry`]. Each acquisition returns a
//! [`ListenerGuard`]; the registration lives exactly as long as the guard, so
//! a widget cannot leak listeners past close or unmount.
//!
//! ```
//! use cascade_core::{ListenerKind, ListenerRegistry, WidgetId};
//!
//! let registry = ListenerRegistry::new();
//! let widget = WidgetId::new(7);
//! {
//!     let _guard = registry.acquire(widget, ListenerKind::PointerDownOutside);
//!     assert_eq!(registry.count(ListenerKind::PointerDownOutside), 1);
//! }
//! assert_eq!(registry.count(ListenerKind::PointerDownOutside), 0);
//! ```

use crate::widget::WidgetId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Kind of document-level listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer-down events landing outside the widget
    PointerDownOutside,
    /// Key-down and pointer-down events used to track input modality
    ModalityTracking,
}

/// Unique ID for a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug)]
struct Registration {
    widget_id: WidgetId,
    kind: ListenerKind,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<ListenerId, Registration>,
    by_widget: HashMap<WidgetId, Vec<ListenerId>>,
}

impl Registry {
    fn remove(&mut self, id: ListenerId) -> bool {
        let Some(registration) = self.listeners.remove(&id) else {
            return false;
        };
        if let Some(ids) = self.by_widget.get_mut(&registration.widget_id) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_widget.remove(&registration.widget_id);
            }
        }
        log::debug!(
            "released {:?} listener {} for widget {}",
            registration.kind,
            id.0,
            registration.widget_id.0
        );
        true
    }
}

/// Shared registry of document-level listeners.
///
/// Cloning yields another handle to the same registry, so a host can route
/// document events to whichever widgets currently hold listeners.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // the registry holds plain data, a panicked holder cannot leave it inconsistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener for `widget_id`, held until the guard is released or dropped.
    #[must_use = "the listener is released as soon as the guard is dropped"]
    pub fn acquire(&self, widget_id: WidgetId, kind: ListenerKind) -> ListenerGuard {
        let id = {
            let mut registry = self.lock();
            let id = ListenerId(registry.next_id);
            registry.next_id += 1;
            registry
                .listeners
                .insert(id, Registration { widget_id, kind });
            registry.by_widget.entry(widget_id).or_default().push(id);
            id
        };
        log::debug!("acquired {kind:?} listener {} for widget {}", id.0, widget_id.0);
        ListenerGuard {
            registry: self.clone(),
            id: Some(id),
        }
    }

    /// Release a registration by ID. Returns `false` if it was already released.
    pub fn release(&self, id: ListenerId) -> bool {
        self.lock().remove(id)
    }

    /// Release every registration held by a widget. Returns how many were removed.
    pub fn release_widget(&self, widget_id: WidgetId) -> usize {
        let mut registry = self.lock();
        let ids = registry.by_widget.remove(&widget_id).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if registry.listeners.remove(&id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("released {removed} listeners for widget {}", widget_id.0);
        }
        removed
    }

    /// Number of live registrations of `kind`.
    #[must_use]
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.lock()
            .listeners
            .values()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Total number of live registrations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Whether `widget_id` currently holds a listener of `kind`.
    #[must_use]
    pub fn has_listener(&self, widget_id: WidgetId, kind: ListenerKind) -> bool {
        let registry = self.lock();
        registry.by_widget.get(&widget_id).is_some_and(|ids| {
            ids.iter()
                .any(|id| registry.listeners.get(id).is_some_and(|r| r.kind == kind))
        })
    }

    /// Widgets holding a listener of `kind`, in ID order.
    #[must_use]
    pub fn subscribers(&self, kind: ListenerKind) -> Vec<WidgetId> {
        let registry = self.lock();
        let mut widgets: Vec<WidgetId> = registry
            .listeners
            .values()
            .filter(|r| r.kind == kind)
            .map(|r| r.widget_id)
            .collect();
        widgets.sort_by_key(|w| w.0);
        widgets.dedup();
        widgets
    }
}

/// Live listener registration. Releases itself on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    registry: ListenerRegistry,
    id: Option<ListenerId>,
}

impl ListenerGuard {
    /// The registration ID, or `None` once released.
    #[must_use]
    pub const fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Whether the registration is still live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Release the registration now. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        self.id.take().is_some_and(|id| self.registry.release(id))
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}
