use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::Error;
use crate::policy::QuantizationPolicy;

/// Statistics per bucket at a single quantisation level.
///
/// Elements can be added one at a time or whole tables merged together, in
/// any order. Nothing here ever limits the number of buckets; that is done by
/// [`Histogram::coarsen`].
#[derive(Clone)]
pub struct Histogram<P: QuantizationPolicy> {
    pub(crate) policy: P,
    pub(crate) level: u32,
    pub(crate) buckets: HashMap<P::Element, P::Statistics>,
}

impl<P: QuantizationPolicy> Histogram<P> {
    /// Creates an empty histogram at level 1.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            level: 1,
            buckets: HashMap::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// The number of distinct buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Statistics of the bucket `element` falls into, if any.
    pub fn get(&self, element: &P::Element) -> Option<&P::Statistics> {
        let key = self.policy.quantize(element, self.level);
        self.buckets.get(&key)
    }

    /// Adds one occurrence of `element`.
    ///
    /// Returns `true` if it opened a new bucket.
    pub fn add(&mut self, element: &P::Element) -> bool {
        let key = self.policy.quantize(element, self.level);
        let stats = self.policy.statistics(element);

        self.insert(key, stats)
    }

    pub fn add_all<'e>(&mut self, elements: impl IntoIterator<Item = &'e P::Element>)
    where
        P::Element: 'e,
    {
        for element in elements {
            self.add(element);
        }
    }

    /// Merges `other` into this histogram.
    ///
    /// Both sides are brought to the coarser of the two levels first.
    pub fn merge(mut self, mut other: Self) -> Result<Self, Error> {
        while self.level < other.level {
            self.double_level()?;
        }
        while other.level < self.level {
            other.double_level()?;
        }

        if self.buckets.len() < other.buckets.len() {
            std::mem::swap(&mut self.buckets, &mut other.buckets);
        }

        for (key, stats) in other.buckets {
            self.insert(key, stats);
        }

        Ok(self)
    }

    /// Doubles the level until at most `max_quanta` buckets remain.
    ///
    /// Only already aggregated bucket keys are re-binned, never the original
    /// elements.
    pub fn coarsen(&mut self, max_quanta: usize) -> Result<(), Error> {
        if max_quanta < 1 {
            return Err(Error::InvalidConfiguration);
        }

        while self.buckets.len() > max_quanta {
            self.double_level()?;
        }

        Ok(())
    }

    fn double_level(&mut self) -> Result<(), Error> {
        let level = self.level.checked_mul(2).ok_or(Error::LevelOverflow)?;
        let before = self.buckets.len();

        let buckets = std::mem::take(&mut self.buckets);
        self.level = level;
        self.buckets.reserve(before);

        for (key, stats) in buckets {
            let key = self.policy.quantize(&key, level);
            self.insert(key, stats);
        }

        log::debug!(
            "level {} -> {}: {} -> {} buckets",
            level / 2,
            level,
            before,
            self.buckets.len()
        );

        Ok(())
    }

    fn insert(&mut self, key: P::Element, stats: P::Statistics) -> bool {
        match self.buckets.entry(key) {
            Entry::Occupied(mut e) => {
                let combined = self.policy.combine(e.get(), &stats);
                e.insert(combined);
                false
            }
            Entry::Vacant(e) => {
                e.insert(stats);
                true
            }
        }
    }
}
