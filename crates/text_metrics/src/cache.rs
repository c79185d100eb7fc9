//! Metrics cache
//!
//! Derived font metrics are expensive to compute with a real font backend,
//! and a layout pass asks for the same faces over and over. The cache is an
//! ordinary value owned by the host application and handed to
//! [`CachedMetrics`] explicitly, so several providers may share one cache
//! and tests can inspect or clear it. Both maps are bounded by a
//! [`CacheConfig`]; the least recently used entries are evicted first.

use crate::font::{FontKey, FontMetrics, FontSpec, TextBounds};
use crate::provider::MetricsProvider;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Size limits of a [`MetricsCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached faces
    pub max_font_entries: usize,
    /// Maximum number of cached string widths
    pub max_width_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_font_entries: 256,
            max_width_entries: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn with_limits(max_fonts: usize, max_widths: usize) -> Self {
        Self {
            max_font_entries: max_fonts,
            max_width_entries: max_widths,
        }
    }
}

/// Map with least-recently-used eviction
#[derive(Debug)]
struct LruMap<K, V> {
    entries: HashMap<K, (V, u64)>,
    /// Last-use tick -> key, oldest first
    order: BTreeMap<u64, K>,
    tick: u64,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Copy> LruMap<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            tick: 0,
            capacity,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let tick = self.next_tick();
        let (value, used) = self.entries.get_mut(key)?;
        self.order.remove(used);
        *used = tick;
        self.order.insert(tick, key.clone());
        Some(*value)
    }

    /// Insert and evict down to capacity; returns the number of evictions
    fn insert(&mut self, key: K, value: V) -> u64 {
        let tick = self.next_tick();
        if let Some((_, old)) = self.entries.insert(key.clone(), (value, tick)) {
            self.order.remove(&old);
        }
        self.order.insert(tick, key);

        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Lazily populated, size-bounded store of font metrics and string widths
#[derive(Debug)]
pub struct MetricsCache {
    config: CacheConfig,
    metrics: Mutex<LruMap<FontKey, FontMetrics>>,
    widths: Mutex<LruMap<(FontKey, String), f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for MetricsCache {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(LruMap::new(config.max_font_entries)),
            widths: Mutex::new(LruMap::new(config.max_width_entries)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache ready to be shared between providers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lookup_or_insert<K: Eq + Hash + Clone, V: Copy>(
        &self,
        map: &Mutex<LruMap<K, V>>,
        key: K,
        compute: impl FnOnce() -> V,
    ) -> V {
        if let Some(value) = map.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        let evicted = map.lock().unwrap_or_else(PoisonError::into_inner).insert(key, value);
        self.evictions.fetch_add(evicted, Ordering::Relaxed);
        value
    }

    fn metrics_or_insert_with(&self, key: FontKey, compute: impl FnOnce() -> FontMetrics) -> FontMetrics {
        self.lookup_or_insert(&self.metrics, key, compute)
    }

    fn width_or_insert_with(&self, key: FontKey, text: &str, compute: impl FnOnce() -> f64) -> f64 {
        self.lookup_or_insert(&self.widths, (key, text.to_string()), compute)
    }

    /// Number of lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to be computed
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of entries dropped to stay within the configured limits
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Number of cached entries (faces and strings)
    pub fn len(&self) -> usize {
        let faces = self.metrics.lock().unwrap_or_else(PoisonError::into_inner).len();
        let strings = self.widths.lock().unwrap_or_else(PoisonError::into_inner).len();
        faces + strings
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry and reset the counters
    pub fn clear(&self) {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.widths.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

/// A provider that memoizes another provider's answers in a [`MetricsCache`]
#[derive(Debug)]
pub struct CachedMetrics<P> {
    inner: P,
    cache: Arc<MetricsCache>,
}

impl<P: MetricsProvider> CachedMetrics<P> {
    pub fn new(inner: P, cache: Arc<MetricsCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<MetricsCache> {
        &self.cache
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MetricsProvider> MetricsProvider for CachedMetrics<P> {
    fn font_metrics(&self, font: &FontSpec) -> FontMetrics {
        self.cache
            .metrics_or_insert_with(font.key(), || self.inner.font_metrics(font))
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> f64 {
        self.cache
            .width_or_insert_with(font.key(), text, || self.inner.text_width(font, text))
    }

    fn text_bounds(&self, font: &FontSpec, text: &str) -> TextBounds {
        self.inner.text_bounds(font, text)
    }

    fn supports(&self, font: &FontSpec, text: &str) -> bool {
        self.inner.supports(font, text)
    }
}
