//! Controlled off-by-N perturbations of declared integers.
//!
//! Only two values are ever touched: a content stream's `/Length` and the
//! number after `startxref`. The offsets recorded by the serializer are never
//! modified, so the xref table itself always stays truthful.

use crate::sampling::chance;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named probabilities and magnitude for the perturbations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionPolicy {
    /// Chance that a content stream declares a wrong `/Length`.
    pub stream_length_probability: f64,
    /// Chance that `startxref` points next to the `xref` keyword.
    pub startxref_probability: f64,
    /// Size of every perturbation, in bytes. Validated configurations only accept 1.
    pub magnitude: u64,
}

impl Default for CorruptionPolicy {
    fn default() -> Self {
        Self {
            stream_length_probability: 0.2,
            startxref_probability: 0.3,
            magnitude: 1,
        }
    }
}

impl CorruptionPolicy {
    /// Never perturb anything.
    pub fn disabled() -> Self {
        Self {
            stream_length_probability: 0.0,
            startxref_probability: 0.0,
            magnitude: 1,
        }
    }

    /// Perturb every eligible value.
    pub fn forced() -> Self {
        Self {
            stream_length_probability: 1.0,
            startxref_probability: 1.0,
            magnitude: 1,
        }
    }

    pub fn with_stream_length_probability(mut self, probability: f64) -> Self {
        self.stream_length_probability = probability;
        self
    }

    pub fn with_startxref_probability(mut self, probability: f64) -> Self {
        self.startxref_probability = probability;
        self
    }

    /// Declared `/Length` for a stream whose encoded payload is `actual` bytes.
    pub fn stream_length<R: Rng + ?Sized>(&self, actual: usize, rng: &mut R) -> usize {
        if !chance(rng, self.stream_length_probability) {
            return actual;
        }
        perturb(actual as u64, self.magnitude, rng) as usize
    }

    /// Value written after `startxref` when the table starts at `actual`.
    pub fn startxref<R: Rng + ?Sized>(&self, actual: u64, rng: &mut R) -> u64 {
        if !chance(rng, self.startxref_probability) {
            return actual;
        }
        perturb(actual, self.magnitude, rng)
    }
}

/// `value ± magnitude`, falling back to `+` when `-` would underflow.
fn perturb<R: Rng + ?Sized>(value: u64, magnitude: u64, rng: &mut R) -> u64 {
    let magnitude = magnitude.max(1);
    if rng.gen_bool(0.5) && value >= magnitude {
        value - magnitude
    } else {
        value + magnitude
    }
}

/// A declared integer that differs from the true one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drift {
    pub declared: u64,
    pub actual: u64,
}

impl Drift {
    pub fn delta(&self) -> i64 {
        self.declared as i64 - self.actual as i64
    }
}

/// Perturbations applied to one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorruptionReport {
    /// Per content stream object number.
    pub stream_lengths: Vec<(u32, Drift)>,
    pub startxref: Option<Drift>,
}

impl CorruptionReport {
    pub fn is_clean(&self) -> bool {
        self.stream_lengths.is_empty() && self.startxref.is_none()
    }

    pub(crate) fn record_stream(&mut self, object: u32, declared: usize, actual: usize) {
        if declared != actual {
            self.stream_lengths.push((
                object,
                Drift {
                    declared: declared as u64,
                    actual: actual as u64,
                },
            ));
        }
    }

    pub(crate) fn record_startxref(&mut self, declared: u64, actual: u64) {
        if declared != actual {
            self.startxref = Some(Drift { declared, actual });
        }
    }
}
