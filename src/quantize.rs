use crate::error::Error;
use crate::histogram::Histogram;
use crate::options::Options;
use crate::policy::QuantizationPolicy;

/// Adaptive quantizer: bins elements by the policy and coarsens the binning
/// whenever there are more buckets than the configured maximum.
#[derive(Clone)]
pub struct Quantizer<P: QuantizationPolicy> {
    max_quanta: usize,
    policy: P,
}

impl<P: QuantizationPolicy> Quantizer<P> {
    pub fn new(options: &Options, policy: P) -> Self {
        Self {
            max_quanta: options.max_quanta(),
            policy,
        }
    }

    /// Quantizes a sequence of elements.
    ///
    /// Accumulation and coarsening are interleaved, so the bucket table never
    /// holds more than `max_quanta + 1` entries.
    pub fn quantize(
        &self,
        elements: impl IntoIterator<Item = P::Element>,
    ) -> Result<Quantization<P>, Error> {
        let mut hist = Histogram::new(self.policy.clone());

        for element in elements {
            if hist.add(&element) {
                hist.coarsen(self.max_quanta)?;
            }
        }

        Ok(Quantization::from_histogram(hist))
    }

    /// Quantizes an already accumulated [`Histogram`]
    pub fn quantize_histogram(&self, mut hist: Histogram<P>) -> Result<Quantization<P>, Error> {
        hist.coarsen(self.max_quanta)?;

        Ok(Quantization::from_histogram(hist))
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    use super::*;

    impl<P> Quantizer<P>
    where
        P: QuantizationPolicy + Send + Sync,
        P::Element: Send + Sync,
        P::Statistics: Send,
    {
        fn chunk_size(len: usize) -> usize {
            len.div_ceil(rayon::current_num_threads()).max(4096)
        }

        /// Quantizes a slice of elements in parallel.
        ///
        /// Each shard is accumulated without coarsening, the shards are merged,
        /// and the merged table is coarsened once.
        pub fn quantize_par(&self, elements: &[P::Element]) -> Result<Quantization<P>, Error> {
            let hist = elements
                .par_chunks(Self::chunk_size(elements.len()))
                .map(|chunk| {
                    let mut hist = Histogram::new(self.policy.clone());
                    hist.add_all(chunk);
                    Ok::<_, Error>(hist)
                })
                .try_reduce_with(Histogram::merge)
                .unwrap_or_else(|| Ok(Histogram::new(self.policy.clone())))?;

            self.quantize_histogram(hist)
        }
    }
}

/// Result of quantization.
///
/// Slots are numbered `0..len()` in ascending order of their bucket keys.
#[derive(Clone)]
pub struct Quantization<P: QuantizationPolicy> {
    policy: P,
    level: u32,
    keys: Vec<P::Element>,
    statistics: Vec<P::Statistics>,
}

impl<P: QuantizationPolicy> Quantization<P> {
    fn from_histogram(hist: Histogram<P>) -> Self {
        let mut slots: Vec<_> = hist.buckets.into_iter().collect();
        slots.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        let (keys, statistics) = slots.into_iter().unzip();

        Self {
            policy: hist.policy,
            level: hist.level,
            keys,
            statistics,
        }
    }

    /// The number of slots
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The final quantisation level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Statistics for every slot, indexed by slot
    pub fn statistics(&self) -> &[P::Statistics] {
        &self.statistics
    }

    pub fn slot_statistics(&self, slot: usize) -> Option<&P::Statistics> {
        self.statistics.get(slot)
    }

    /// The bucket key of `slot`
    pub fn key(&self, slot: usize) -> Option<&P::Element> {
        self.keys.get(slot)
    }

    /// Looks up the slot for `element`.
    ///
    /// Every element that took part in the quantization has a slot. Anything
    /// else may return `None`.
    pub fn query(&self, element: &P::Element) -> Option<usize> {
        let key = self.policy.quantize(element, self.level);
        self.keys.binary_search(&key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rgb::{Rgb8, RgbPolicy};

    fn quantizer(max_quanta: usize) -> Quantizer<RgbPolicy> {
        Quantizer::new(&Options::new(max_quanta).unwrap(), RgbPolicy)
    }

    #[test]
    fn empty_input_has_no_slots() {
        let q = quantizer(4).quantize(Vec::new()).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.level(), 1);
        assert_eq!(q.query(&Rgb8::WHITE), None);
    }

    #[test]
    fn slots_follow_key_order() {
        let q = quantizer(8)
            .quantize([Rgb8::WHITE, Rgb8::RED, Rgb8::BLACK, Rgb8::BLUE])
            .unwrap();

        let keys: Vec<Rgb8> = (0..q.len()).filter_map(|s| q.key(s).copied()).collect();
        assert_eq!(keys, vec![Rgb8::BLACK, Rgb8::BLUE, Rgb8::RED, Rgb8::WHITE]);
        assert_eq!(q.query(&Rgb8::BLACK), Some(0));
        assert_eq!(q.query(&Rgb8::WHITE), Some(3));
        assert_eq!(q.slot_statistics(4), None);
    }

    #[test]
    fn histogram_and_stream_agree() {
        let colors: Vec<Rgb8> = (0..=255u8).map(|v| Rgb8::new(v, v / 2, 255 - v)).collect();

        let mut hist = Histogram::new(RgbPolicy);
        hist.add_all(&colors);

        let streamed = quantizer(10).quantize(colors.iter().copied()).unwrap();
        let batched = quantizer(10).quantize_histogram(hist).unwrap();

        assert_eq!(streamed.level(), batched.level());
        assert_eq!(streamed.statistics(), batched.statistics());
        assert_eq!(streamed.keys, batched.keys);
    }

    #[test]
    fn level_is_a_power_of_two() {
        for max_quanta in [1, 2, 3, 7, 64, 255] {
            let q = quantizer(max_quanta)
                .quantize((0..=255u8).map(|v| Rgb8::new(v, v.wrapping_mul(3), v.wrapping_mul(11))))
                .unwrap();
            assert!(q.level().is_power_of_two());
            assert!(q.len() <= max_quanta);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let colors: Vec<Rgb8> = (0..100_000u32)
            .map(|i| Rgb8::new((i % 251) as u8, (i % 241) as u8, (i / 400) as u8))
            .collect();

        let sequential = quantizer(256).quantize(colors.iter().copied()).unwrap();
        let parallel = quantizer(256).quantize_par(&colors).unwrap();

        assert_eq!(parallel.level(), sequential.level());
        assert_eq!(parallel.keys, sequential.keys);
        assert_eq!(parallel.statistics(), sequential.statistics());
    }
}
