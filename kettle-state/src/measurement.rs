//! Computational basis sampling with reproducible random streams
//!
//! This module turns a probability distribution over basis states into
//! aggregated shot counts:
//! - Inverse-transform sampling (CDF + binary search), the default
//! - Alias method for O(1) draws after O(2^n) setup
//! - Chunked shot streams, each seeded from `(seed, chunk)`, so results are
//!   identical whether chunks run sequentially or on rayon workers
//! - Classical-bit mapping for circuits that measure a subset of qubits

use crate::error::{Result, StateError};
use crate::statevector::{format_bitstring, Statevector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Tolerance on |Σp − 1| accepted by the sampler
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Shots drawn from one random stream
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Aggregated measurement outcomes
///
/// Keys are bitstrings with classical bit 0 as the rightmost character.
/// The values always sum to [`shots`](Self::shots).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counts {
    counts: HashMap<String, usize>,
    shots: usize,
}

impl Counts {
    /// Count for a bitstring (0 if never observed)
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Observed frequency of a bitstring (count / shots)
    pub fn probability(&self, bitstring: &str) -> f64 {
        self.get(bitstring) as f64 / self.shots as f64
    }

    /// Total number of shots
    #[inline]
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Number of distinct outcomes observed
    #[inline]
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Check whether a bitstring was observed
    pub fn contains(&self, bitstring: &str) -> bool {
        self.counts.contains_key(bitstring)
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Most frequent outcome, ties broken by the smaller bitstring
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// All outcomes sorted by count (descending), then bitstring
    pub fn sorted(&self) -> Vec<(String, usize)> {
        let mut outcomes: Vec<_> = self.counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        outcomes
    }

    /// Observed frequencies keyed by bitstring, in bitstring order
    pub fn to_probabilities(&self) -> BTreeMap<String, f64> {
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / self.shots as f64))
            .collect()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    /// Take the underlying map
    pub fn into_map(self) -> HashMap<String, usize> {
        self.counts
    }
}

/// Algorithm used to draw basis-state indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingStrategy {
    /// Cumulative distribution with binary search, O(log 2^n) per shot
    #[default]
    InverseTransform,
    /// Walker's alias table, O(1) per shot
    Alias,
}

/// Routing of measured qubits into classical bits
///
/// Each pair is `(qubit, clbit)`. Classical bits without a pair read `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalMapping {
    num_clbits: usize,
    pairs: Vec<(usize, usize)>,
}

impl ClassicalMapping {
    /// Create a mapping into `num_clbits` classical bits
    ///
    /// # Errors
    /// `InvalidParameter` if a pair names a classical bit outside the register.
    pub fn new(num_clbits: usize, pairs: Vec<(usize, usize)>) -> Result<Self> {
        if let Some(&(_, clbit)) = pairs.iter().find(|&&(_, c)| c >= num_clbits) {
            return Err(StateError::invalid_parameter(format!(
                "classical bit {} outside register of {} bits",
                clbit, num_clbits
            )));
        }
        Ok(Self { num_clbits, pairs })
    }

    /// Qubit `i` into classical bit `i` for `n` qubits
    pub fn identity(n: usize) -> Self {
        Self {
            num_clbits: n,
            pairs: (0..n).map(|i| (i, i)).collect(),
        }
    }

    /// Number of classical bits
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// `(qubit, clbit)` pairs
    #[inline]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    fn check_qubits(&self, num_qubits: usize) -> Result<()> {
        if let Some(&(qubit, _)) = self.pairs.iter().find(|&&(q, _)| q >= num_qubits) {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits,
            });
        }
        Ok(())
    }

    /// Classical register contents for a basis-state index
    pub fn key(&self, index: usize) -> String {
        let width = self.num_clbits;
        let mut bits = vec![b'0'; width];
        for &(qubit, clbit) in &self.pairs {
            if (index >> qubit) & 1 == 1 {
                bits[width - 1 - clbit] = b'1';
            }
        }
        bits.into_iter().map(char::from).collect()
    }
}

/// Seeded shot sampler
///
/// # Example
///
/// ```
/// use kettle_state::Sampler;
///
/// let probabilities = [0.5, 0.0, 0.0, 0.5];
/// let sampler = Sampler::new();
///
/// let first = sampler.sample(&probabilities, 500, 42).unwrap();
/// let second = sampler.sample(&probabilities, 500, 42).unwrap();
/// assert_eq!(first, second);
/// assert_eq!(first.get("00") + first.get("11"), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    strategy: SamplingStrategy,
    parallel: bool,
    chunk_size: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Inverse-transform sampler, parallel over chunks
    pub fn new() -> Self {
        Self {
            strategy: SamplingStrategy::InverseTransform,
            parallel: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Select the sampling algorithm
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run shot chunks on rayon workers
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shots per random stream (at least 1)
    ///
    /// Counts depend on the chunk size, so reproducing a result needs the
    /// same chunk size as well as the same seed.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Configured strategy
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Draw `shots` samples, keyed by the full-register bitstring
    ///
    /// # Errors
    /// - `InvalidParameter` for zero shots or a negative/NaN probability
    /// - `InvalidDimension` for an empty or non-power-of-two distribution
    /// - `NotNormalized` if the probabilities do not sum to 1 within
    ///   [`PROBABILITY_TOLERANCE`]
    pub fn sample(&self, probabilities: &[f64], shots: usize, seed: u64) -> Result<Counts> {
        let width = validate_distribution(probabilities)?;
        let indices = self.sample_indices(probabilities, shots, seed)?;
        Ok(aggregate(indices, shots, |index| format_bitstring(index, width)))
    }

    /// Draw `shots` samples, keyed by the classical register in `mapping`
    pub fn sample_mapped(
        &self,
        probabilities: &[f64],
        shots: usize,
        seed: u64,
        mapping: &ClassicalMapping,
    ) -> Result<Counts> {
        let width = validate_distribution(probabilities)?;
        mapping.check_qubits(width)?;
        let indices = self.sample_indices(probabilities, shots, seed)?;
        Ok(aggregate(indices, shots, |index| mapping.key(index)))
    }

    /// Sample a state vector's Born-rule distribution
    pub fn sample_statevector(&self, state: &Statevector, shots: usize, seed: u64) -> Result<Counts> {
        self.sample(&state.probabilities(), shots, seed)
    }

    /// Draw `shots` basis-state indices, aggregated by index
    pub fn sample_indices(
        &self,
        probabilities: &[f64],
        shots: usize,
        seed: u64,
    ) -> Result<HashMap<usize, usize>> {
        if shots == 0 {
            return Err(StateError::invalid_parameter("shots must be positive"));
        }
        validate_distribution(probabilities)?;

        let table = match self.strategy {
            SamplingStrategy::InverseTransform => Table::Cdf(CdfTable::new(probabilities)),
            SamplingStrategy::Alias => Table::Alias(AliasTable::new(probabilities)),
        };

        let chunk_size = self.chunk_size;
        let num_chunks = num_chunks(shots, chunk_size);
        let draw_chunk = |k: usize| {
            let start = k * chunk_size;
            let len = chunk_size.min(shots - start);
            let mut rng = StdRng::seed_from_u64(chunk_seed(seed, k));
            let mut local: HashMap<usize, usize> = HashMap::new();
            for _ in 0..len {
                *local.entry(table.sample(&mut rng)).or_insert(0) += 1;
            }
            local
        };

        let counts = if self.parallel && num_chunks > 1 {
            (0..num_chunks)
                .into_par_iter()
                .map(draw_chunk)
                .reduce(HashMap::new, merge_counts)
        } else {
            (0..num_chunks).map(draw_chunk).fold(HashMap::new(), merge_counts)
        };

        tracing::trace!(
            shots,
            chunks = num_chunks,
            outcomes = counts.len(),
            strategy = ?self.strategy,
            "sampled distribution"
        );
        Ok(counts)
    }
}

/// Number of `chunk_size` chunks covering `shots`, rounding up
#[inline]
fn num_chunks(shots: usize, chunk_size: usize) -> usize {
    shots / chunk_size + usize::from(shots % chunk_size != 0)
}

/// Seed of the random stream for chunk `k`
#[inline]
fn chunk_seed(seed: u64, k: usize) -> u64 {
    seed ^ (k as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn merge_counts(mut a: HashMap<usize, usize>, b: HashMap<usize, usize>) -> HashMap<usize, usize> {
    for (index, count) in b {
        *a.entry(index).or_insert(0) += count;
    }
    a
}

fn aggregate<F>(indices: HashMap<usize, usize>, shots: usize, key: F) -> Counts
where
    F: Fn(usize) -> String,
{
    let mut counts = HashMap::with_capacity(indices.len());
    for (index, count) in indices {
        *counts.entry(key(index)).or_insert(0) += count;
    }
    Counts { counts, shots }
}

/// Check a distribution and return its register width
fn validate_distribution(probabilities: &[f64]) -> Result<usize> {
    let dimension = probabilities.len();
    if dimension == 0 || !dimension.is_power_of_two() {
        return Err(StateError::InvalidDimension { dimension });
    }
    if let Some((index, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| p.is_nan() || **p < 0.0)
    {
        return Err(StateError::invalid_parameter(format!(
            "probability {} at index {} is not a non-negative number",
            p, index
        )));
    }

    let total: f64 = probabilities.iter().sum();
    if !total.is_finite() || (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(StateError::NotNormalized { norm: total.sqrt() });
    }
    Ok(dimension.trailing_zeros() as usize)
}

enum Table {
    Cdf(CdfTable),
    Alias(AliasTable),
}

impl Table {
    #[inline]
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            Table::Cdf(t) => t.sample(rng),
            Table::Alias(t) => t.sample(rng),
        }
    }
}

/// Cumulative distribution for inverse-transform sampling
struct CdfTable {
    cumulative: Vec<f64>,
    /// Last index with non-zero probability
    last: usize,
}

impl CdfTable {
    fn new(probabilities: &[f64]) -> Self {
        let mut running = 0.0;
        let cumulative = probabilities
            .iter()
            .map(|&p| {
                running += p;
                running
            })
            .collect();
        let last = probabilities.iter().rposition(|&p| p > 0.0).unwrap_or(0);
        Self { cumulative, last }
    }

    #[inline]
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let total = self.cumulative[self.cumulative.len() - 1];
        let u = rng.gen::<f64>() * total;
        // first index whose cumulative mass exceeds u; never a zero-width bin
        self.cumulative.partition_point(|&c| c <= u).min(self.last)
    }
}

/// Alias table for O(1) sampling from a discrete probability distribution
///
/// Walker's algorithm: every column holds its own probability mass plus an
/// alias that absorbs the remainder.
struct AliasTable {
    /// Probability threshold for each index
    prob: Vec<f64>,

    /// Alias index for each index
    alias: Vec<usize>,
}

impl AliasTable {
    fn new(probabilities: &[f64]) -> Self {
        let n = probabilities.len();
        let total: f64 = probabilities.iter().sum();

        let mut prob = vec![0.0; n];
        let mut alias = vec![0; n];

        let mut scaled: Vec<f64> = probabilities.iter().map(|&p| p * n as f64 / total).collect();

        let mut small = Vec::new();
        let mut large = Vec::new();
        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while !small.is_empty() && !large.is_empty() {
            let (Some(s), Some(l)) = (small.pop(), large.pop()) else {
                break;
            };

            prob[s] = scaled[s];
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // leftovers hold ≈1 up to rounding
        for i in large.into_iter().chain(small) {
            prob[i] = 1.0;
            alias[i] = i;
        }

        Self { prob, alias }
    }

    #[inline]
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let i = rng.gen_range(0..self.prob.len());
        if rng.gen::<f64>() < self.prob[i] {
            i
        } else {
            self.alias[i]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deterministic_with_seed() {
        let probabilities = [0.1, 0.2, 0.3, 0.4];
        let sampler = Sampler::new();
        let a = sampler.sample(&probabilities, 500, 42).unwrap();
        let b = sampler.sample(&probabilities, 500, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.iter().map(|(_, c)| c).sum::<usize>(), 500);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let probabilities: Vec<f64> = (0..16).map(|i| (i + 1) as f64 / 136.0).collect();
        for strategy in [SamplingStrategy::InverseTransform, SamplingStrategy::Alias] {
            let base = Sampler::new().with_strategy(strategy).with_chunk_size(100);
            let seq = base.with_parallel(false).sample(&probabilities, 2_345, 7).unwrap();
            let par = base.with_parallel(true).sample(&probabilities, 2_345, 7).unwrap();
            assert_eq!(seq, par);
            assert_eq!(seq.shots(), 2_345);
        }
    }

    #[test]
    fn test_zero_probability_never_drawn() {
        let probabilities = [0.0, 0.5, 0.0, 0.5];
        for strategy in [SamplingStrategy::InverseTransform, SamplingStrategy::Alias] {
            let counts = Sampler::new()
                .with_strategy(strategy)
                .sample(&probabilities, 10_000, 3)
                .unwrap();
            assert_eq!(counts.get("00"), 0);
            assert_eq!(counts.get("10"), 0);
            assert_eq!(counts.get("01") + counts.get("11"), 10_000);
        }
    }

    #[test]
    fn test_certain_outcome() {
        let probabilities = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let counts = Sampler::new().sample(&probabilities, 1000, 1).unwrap();
        assert_eq!(counts.get("101"), 1000);
        assert_eq!(counts.num_outcomes(), 1);
        assert_eq!(counts.most_common(), Some(("101", 1000)));
    }

    #[test]
    fn test_frequencies_match_distribution() {
        let probabilities = [0.5, 0.3, 0.15, 0.05];
        for strategy in [SamplingStrategy::InverseTransform, SamplingStrategy::Alias] {
            let counts = Sampler::new()
                .with_strategy(strategy)
                .sample(&probabilities, 20_000, 123)
                .unwrap();
            for (i, &p) in probabilities.iter().enumerate() {
                let freq = counts.probability(&format_bitstring(i, 2));
                assert!((freq - p).abs() < 0.02, "outcome {} frequency {} vs {}", i, freq, p);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let sampler = Sampler::new();
        assert!(matches!(
            sampler.sample(&[0.5, 0.5], 0, 1),
            Err(StateError::InvalidParameter(_))
        ));
        assert!(matches!(
            sampler.sample(&[], 10, 1),
            Err(StateError::InvalidDimension { dimension: 0 })
        ));
        assert!(matches!(
            sampler.sample(&[0.5, 0.25, 0.25], 10, 1),
            Err(StateError::InvalidDimension { dimension: 3 })
        ));
        assert!(matches!(
            sampler.sample(&[1.5, -0.5], 10, 1),
            Err(StateError::InvalidParameter(_))
        ));
        assert!(matches!(
            sampler.sample(&[f64::NAN, 1.0], 10, 1),
            Err(StateError::InvalidParameter(_))
        ));
        assert!(matches!(
            sampler.sample(&[0.5, 0.4], 10, 1),
            Err(StateError::NotNormalized { .. })
        ));
    }

    #[test]
    fn test_mapping_keys() {
        // qubit 2 -> clbit 0, qubit 0 -> clbit 1, clbit 2 unmapped
        let mapping = ClassicalMapping::new(3, vec![(2, 0), (0, 1)]).unwrap();
        assert_eq!(mapping.key(0b101), "011");
        assert_eq!(mapping.key(0b100), "001");
        assert_eq!(mapping.key(0b001), "010");
        assert_eq!(mapping.key(0b010), "000");

        assert_eq!(ClassicalMapping::identity(3).key(0b110), "110");
        assert!(ClassicalMapping::new(1, vec![(0, 1)]).is_err());
    }

    #[test]
    fn test_sample_mapped_merges_outcomes() {
        // uniform over 2 qubits, only qubit 1 measured
        let probabilities = [0.25; 4];
        let mapping = ClassicalMapping::new(1, vec![(1, 0)]).unwrap();
        let counts = Sampler::new()
            .sample_mapped(&probabilities, 4_000, 9, &mapping)
            .unwrap();

        assert_eq!(counts.num_outcomes(), 2);
        assert_eq!(counts.get("0") + counts.get("1"), 4_000);
        assert!((counts.probability("1") - 0.5).abs() < 0.05);

        let bad = ClassicalMapping::new(1, vec![(5, 0)]).unwrap();
        assert!(matches!(
            Sampler::new().sample_mapped(&probabilities, 10, 9, &bad),
            Err(StateError::InvalidQubitIndex { index: 5, num_qubits: 2 })
        ));
    }

    #[test]
    fn test_counts_views() {
        let counts = Sampler::new().sample(&[0.75, 0.25], 1_000, 5).unwrap();
        let sorted = counts.sorted();
        assert_eq!(sorted[0].0, "0");
        let probs = counts.to_probabilities();
        assert_relative_eq!(probs.values().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(counts.contains("1"));
    }

    #[test]
    fn test_alias_table_columns() {
        let table = AliasTable::new(&[0.5, 0.3, 0.15, 0.05]);
        // column mass plus aliased mass reproduces each probability
        let n = table.prob.len() as f64;
        let mut mass = [0.0; 4];
        for i in 0..4 {
            mass[i] += table.prob[i] / n;
            mass[table.alias[i]] += (1.0 - table.prob[i]) / n;
        }
        for (m, p) in mass.iter().zip([0.5, 0.3, 0.15, 0.05]) {
            assert_relative_eq!(*m, p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_num_chunks_rounds_up() {
        assert_eq!(num_chunks(8, 4), 2);
        assert_eq!(num_chunks(10, 4), 3);
        assert_eq!(num_chunks(1, 1024), 1);
        assert_eq!(num_chunks(usize::MAX, 1), usize::MAX);
        assert_eq!(num_chunks(usize::MAX, 1024), usize::MAX / 1024 + 1);
        assert_eq!(num_chunks(usize::MAX, usize::MAX), 1);
    }
}
