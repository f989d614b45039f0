use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use kscw_calendar::CalendarView;
use log::debug;

use crate::query::ViewQuery;

const CAPACITY: usize = 256;

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

#[derive(Clone)]
struct Cached {
    requested_at: Instant,
    view: Arc<CalendarView>,
}

/// Built views keyed by their normalized query.
pub struct ViewCache {
    enabled: bool,
    ttl: Duration,
    inner: quick_cache::sync::Cache<ViewQuery, Cached>,
    /// Serializes the freshness check and the write of `insert`.
    writes: Mutex<()>,
}

impl ViewCache {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: quick_cache::sync::Cache::new(CAPACITY),
            writes: Mutex::new(()),
        })
    }

    pub fn get(&self, key: &ViewQuery) -> Option<Arc<CalendarView>> {
        if !self.enabled {
            return None;
        }

        let cached = self.inner.get(key)?;
        if cached.requested_at.elapsed() < self.ttl {
            return Some(cached.view);
        }

        let _writing = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if self
            .inner
            .get(key)
            .is_some_and(|cached| cached.requested_at.elapsed() >= self.ttl)
        {
            self.inner.remove(key);
        }
        None
    }

    /// Stores a view built for a request issued at `requested_at`.
    ///
    /// Incomplete views are never stored, and a view never replaces one
    /// built for a later request.
    pub fn insert(
        &self,
        key: ViewQuery,
        requested_at: Instant,
        view: CalendarView,
    ) -> Arc<CalendarView> {
        let view = Arc::new(view);
        if !self.enabled || !view.is_complete() {
            return view;
        }

        let _writing = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = self.inner.get(&key) {
            if existing.requested_at > requested_at {
                debug!("Discarding view superseded by a newer request");
                return view;
            }
        }

        self.inner.insert(
            key,
            Cached {
                requested_at,
                view: Arc::clone(&view),
            },
        );

        view
    }
}
