//! Typography profiling.
//!
//! Learns a document's body-text size from its leading pages and derives
//! per-document H1/H2/H3 size tiers as ratios of that body size.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{HeadingLevel, Line};
use crate::options::OutlineOptions;

/// Minimum font-size ratios for each heading tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub h1: f32,
    pub h2: f32,
    pub h3: f32,
}

impl TierThresholds {
    /// Threshold for a level.
    pub fn get(&self, level: HeadingLevel) -> f32 {
        match level {
            HeadingLevel::H1 => self.h1,
            HeadingLevel::H2 => self.h2,
            HeadingLevel::H3 => self.h3,
        }
    }
}

impl From<[f32; 3]> for TierThresholds {
    fn from([h1, h2, h3]: [f32; 3]) -> Self {
        Self { h1, h2, h3 }
    }
}

/// A document's learned typographic baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentProfile {
    /// Most frequent (rounded) font size
    pub body_size: f32,
    /// Tier thresholds relative to `body_size`
    pub tiers: TierThresholds,
    /// Rounding unit applied before sizes are compared
    pub precision: f32,
}

impl DocumentProfile {
    /// Font-size ratio of a line size to the body size, on the same
    /// rounding grid the tiers were derived on.
    pub fn ratio(&self, font_size: f32) -> f32 {
        round_size(font_size, self.precision) / self.body_size
    }

    /// Check the profile invariants.
    ///
    /// Thresholds may repeat when a document has fewer than three sizes
    /// above body text, but they never increase and never drop below 1.0.
    pub fn validate(&self) -> Result<()> {
        if !self.body_size.is_finite() || self.body_size <= 0.0 {
            return Err(Error::InvalidProfile(format!(
                "body size {} is not positive",
                self.body_size
            )));
        }

        let TierThresholds { h1, h2, h3 } = self.tiers;
        if !(h1.is_finite() && h2.is_finite() && h3.is_finite()) {
            return Err(Error::InvalidProfile("tier ladder is not finite".into()));
        }
        if !(h1 >= h2 && h2 >= h3 && h3 >= 1.0) {
            return Err(Error::InvalidProfile(format!(
                "tier ladder {:.3}/{:.3}/{:.3} is not descending from above 1.0",
                h1, h2, h3
            )));
        }
        Ok(())
    }
}

/// Round a size to the nearest multiple of `precision`, never below one
/// unit.
pub fn round_size(size: f32, precision: f32) -> f32 {
    (size / precision).round().max(1.0) * precision
}

/// Derives a [`DocumentProfile`] from sampled lines.
#[derive(Debug, Clone)]
pub struct TypographyProfiler {
    precision: f32,
    default_body_size: f32,
    fallback: TierThresholds,
}

impl TypographyProfiler {
    /// Create a profiler from engine options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            precision: options.size_precision,
            default_body_size: options.default_body_size,
            fallback: options.fallback_tiers.into(),
        }
    }

    /// Profile the given lines (normally those of the first few pages).
    pub fn profile<'a, I>(&self, lines: I) -> DocumentProfile
    where
        I: IntoIterator<Item = &'a Line>,
    {
        // Histogram keyed by size in rounding units; BTreeMap keeps keys ascending
        let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
        let mut line_count = 0usize;
        for line in lines {
            // Tiny text still counts as one unit, never as size zero
            let key = ((line.font_size / self.precision).round() as i64).max(1);
            *histogram.entry(key).or_insert(0) += 1;
            line_count += 1;
        }

        let body_key = match histogram
            .iter()
            .fold(None, |best: Option<(i64, usize)>, (&key, &count)| match best {
                // Strictly greater: ties keep the smaller size
                Some((_, best_count)) if count <= best_count => best,
                _ => Some((key, count)),
            }) {
            Some((key, _)) => key,
            None => {
                log::debug!(
                    "No text to profile, using default body size {}",
                    self.default_body_size
                );
                return self.fallback_profile(self.default_body_size);
            }
        };
        let body_size = body_key as f32 * self.precision;

        if line_count < 2 || histogram.len() < 2 {
            log::debug!(
                "Degenerate typography (lines={}, sizes={}), using fallback tiers",
                line_count,
                histogram.len()
            );
            return self.fallback_profile(body_size);
        }

        let larger: Vec<f32> = histogram
            .keys()
            .rev()
            .filter(|&&key| key > body_key)
            .take(3)
            .map(|&key| key as f32 * self.precision / body_size)
            .collect();

        let Some(&smallest) = larger.last() else {
            log::debug!(
                "No size above body size {}, using fallback tiers",
                body_size
            );
            return self.fallback_profile(body_size);
        };

        let ratio_at = |i: usize| larger.get(i).copied().unwrap_or(smallest);
        let profile = DocumentProfile {
            body_size,
            tiers: TierThresholds {
                h1: ratio_at(0),
                h2: ratio_at(1),
                h3: ratio_at(2),
            },
            precision: self.precision,
        };

        log::debug!(
            "Body size {:.1}pt, tiers H1>={:.2} H2>={:.2} H3>={:.2}",
            profile.body_size,
            profile.tiers.h1,
            profile.tiers.h2,
            profile.tiers.h3
        );
        profile
    }

    fn fallback_profile(&self, body_size: f32) -> DocumentProfile {
        DocumentProfile {
            body_size,
            tiers: self.fallback,
            precision: self.precision,
        }
    }
}
