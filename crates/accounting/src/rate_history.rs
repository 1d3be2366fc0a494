//! Bounded history of exchange rate samples, used to chart the rate and estimate yield.

use std::{collections::VecDeque, time::Duration};

use liquid_stake_params::prelude::ReconcileParams;
use liquid_stake_primitives::{math::mul_div_floor, ExchangeRate, Timestamp};
use serde::{Deserialize, Serialize};

const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

const BPS: u128 = 10_000;

/// The rate observed at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSample {
    /// When the rate was observed.
    pub at: Timestamp,

    /// The observed rate.
    pub rate: ExchangeRate,
}

/// A ring of rate samples.
///
/// A new sample is only kept when the rate moved by more than the threshold since the last one,
/// so a flat rate does not push older history out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateHistory {
    samples: VecDeque<RateSample>,
    capacity: usize,
    threshold: u128,
}

impl RateHistory {
    /// Creates an empty history.
    pub fn new(capacity: usize, threshold: u128) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            threshold,
        }
    }

    /// Creates an empty history sized by the params.
    pub fn from_params(params: &ReconcileParams) -> Self {
        Self::new(
            params.rate_history_capacity,
            u128::from(params.rate_change_threshold),
        )
    }

    /// Records `rate` if it differs enough from the latest sample.
    ///
    /// Returns whether a sample was added.
    pub fn record(&mut self, at: Timestamp, rate: ExchangeRate) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if let Some(latest) = self.samples.back() {
            if latest.rate.abs_diff(rate) <= self.threshold {
                return false;
            }
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(RateSample { at, rate });

        true
    }

    /// Replaces the history with previously persisted samples, keeping the newest ones that fit.
    pub fn restore(&mut self, samples: impl IntoIterator<Item = RateSample>) {
        self.samples.clear();
        for sample in samples {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            if self.capacity > 0 {
                self.samples.push_back(sample);
            }
        }
    }

    /// The samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &RateSample> + '_ {
        self.samples.iter()
    }

    /// The samples as an owned list, oldest first. This is the persisted form.
    pub fn to_vec(&self) -> Vec<RateSample> {
        self.samples.iter().copied().collect()
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&RateSample> {
        self.samples.back()
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Rate growth between the oldest and newest sample, annualized, in basis points.
    ///
    /// Returns `None` with fewer than two samples or when they share a timestamp.
    pub fn annualized_growth_bps(&self) -> Option<u128> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;

        let elapsed = last.at.saturating_duration_since(first.at).as_millis();
        if elapsed == 0 || first.rate.scaled() == 0 {
            return None;
        }

        let gain = last.rate.scaled().saturating_sub(first.rate.scaled());
        let growth_bps = mul_div_floor(gain, BPS, first.rate.scaled())?;
        mul_div_floor(growth_bps, YEAR.as_millis(), elapsed)
    }
}

impl Default for RateHistory {
    fn default() -> Self {
        Self::from_params(&ReconcileParams::default())
    }
}
