use std::hash::Hash;

/// A [`QuantizationPolicy`] describes to the quantizer the kind of data it is
/// working with: how elements are bucketed at a given level and how the
/// statistics of a bucket are accumulated.
///
/// [`RgbPolicy`](crate::RgbPolicy) is the implementation for 8-bit colours.
pub trait QuantizationPolicy: Clone {
    /// The type of input data to quantise. `Ord` gives slots a stable order.
    type Element: Clone + Eq + Hash + Ord;

    /// Aggregate of every element sharing one bucket.
    type Statistics: Clone;

    /// Quantises `element` to `level`.
    ///
    /// Level 1 must be the identity. For any `l2` that is a multiple of `l1`,
    /// `quantize(quantize(e, l1), l2)` must equal `quantize(e, l2)`.
    fn quantize(&self, element: &Self::Element, level: u32) -> Self::Element;

    /// Statistics for a single occurrence of `element`.
    fn statistics(&self, element: &Self::Element) -> Self::Statistics;

    /// Merges two aggregates. Must be associative and commutative.
    fn combine(&self, l: &Self::Statistics, r: &Self::Statistics) -> Self::Statistics;
}
