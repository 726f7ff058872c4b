//! Current-locale owner with explicit change notification
//!
//! Switching language used to flip a page-level direction flag that unrelated
//! widgets inspected. Here the localizer emits a [`LocaleChanged`] event and
//! only components holding a [`Subscription`] hear about it.

use crate::catalog::Catalog;
use crate::format::format_integer;
use crate::locale::{Locale, TextDirection};
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

new_key_type! {
    /// Identifier of a locale-change subscriber
    pub struct SubscriptionId;
}

/// Emitted after the current locale changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaleChanged {
    pub previous: Locale,
    pub locale: Locale,
    pub direction: TextDirection,
}

type Subscriber = Box<dyn FnMut(&LocaleChanged) + Send>;

struct LocalizerInner {
    locale: Locale,
    catalog: Catalog,
    subscribers: SlotMap<SubscriptionId, Option<Subscriber>>,
}

fn lock(inner: &Mutex<LocalizerInner>) -> MutexGuard<'_, LocalizerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared localization state
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct Localizer {
    inner: Arc<Mutex<LocalizerInner>>,
}

impl Localizer {
    pub fn new(catalog: Catalog, locale: Locale) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LocalizerInner {
                locale,
                catalog,
                subscribers: SlotMap::with_key(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocalizerInner> {
        lock(&self.inner)
    }

    pub fn locale(&self) -> Locale {
        self.lock().locale
    }

    pub fn direction(&self) -> TextDirection {
        self.locale().direction()
    }

    /// Switch locale and notify subscribers
    ///
    /// Returns false (and emits nothing) when `locale` is already current.
    pub fn set_locale(&self, locale: Locale) -> bool {
        let (event, targets) = {
            let mut inner = self.lock();
            if inner.locale == locale {
                return false;
            }
            let previous = std::mem::replace(&mut inner.locale, locale);
            let targets: Vec<SubscriptionId> = inner.subscribers.keys().collect();
            (
                LocaleChanged {
                    previous,
                    locale,
                    direction: locale.direction(),
                },
                targets,
            )
        };

        tracing::debug!(
            "locale changed {} -> {} ({:?})",
            event.previous,
            event.locale,
            event.direction
        );

        for id in targets {
            let callback = self
                .lock()
                .subscribers
                .get_mut(id)
                .and_then(|slot| slot.take());
            let Some(mut callback) = callback else {
                continue;
            };

            callback(&event);

            let mut inner = self.lock();
            if let Some(slot) = inner.subscribers.get_mut(id) {
                *slot = Some(callback);
            } else {
                drop(inner);
                drop(callback);
            }
        }
        true
    }

    /// Listen for locale changes until the returned subscription is dropped
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&LocaleChanged) + Send + 'static,
    {
        let id = self.lock().subscribers.insert(Some(Box::new(callback)));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Translate `key` for the current locale
    pub fn translate(&self, key: &str) -> String {
        let inner = self.lock();
        inner.catalog.translate(inner.locale, key).to_string()
    }

    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let inner = self.lock();
        inner
            .catalog
            .translate_with(inner.locale, key, args)
            .into_owned()
    }

    /// Format a whole number for the current locale
    pub fn format_integer(&self, value: u64) -> String {
        format_integer(value, self.locale())
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Catalog::default(), Locale::default())
    }
}

/// Owned locale-change subscription; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<Mutex<LocalizerInner>>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = lock(&inner).subscribers.remove(self.id);
            drop(removed);
        }
    }
}
