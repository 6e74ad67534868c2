//! This module contains the [`EngineSettings`] structure, which drives
//! the three configuration options of §6.3 plus the interpolation
//! history bound of §5.
//!
//! As with the closed set of record kinds, fields are private and
//! accessed through getter/setter pairs: some combinations are only
//! meaningful together (`sensordepth_only` rewrites the installation
//! record in place, §9's open question on propagation), so direct field
//! manipulation is intentionally not exposed.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// Configuration for a single stream handle. Constructed via
/// [`EngineSettings::default`] and mutated with the setters below.
pub struct EngineSettings {
    pub(crate) ignore_snippets: bool,
    pub(crate) sensordepth_only: bool,
    pub(crate) timestamp_changed: bool,
    pub(crate) interpolation_history_cap: usize,
}

/// Default cap on samples retained per interpolation series (§5: "a few
/// thousand samples").
pub const DEFAULT_INTERPOLATION_HISTORY_CAP: usize = 4096;

impl Default for EngineSettings {
    /// ```
    /// use emdg_core::settings::EngineSettings;
    /// let s = EngineSettings::default();
    /// assert!(!s.ignore_snippets());
    /// assert!(!s.sensordepth_only());
    /// assert!(!s.timestamp_changed());
    /// ```
    fn default() -> Self {
        EngineSettings {
            ignore_snippets: false,
            sensordepth_only: false,
            timestamp_changed: false,
            interpolation_history_cap: DEFAULT_INTERPOLATION_HISTORY_CAP,
        }
    }
}

impl EngineSettings {
    /// SS2 sub-record is never awaited; null snippets are synthesised at
    /// ping completion (§4.5, §6.3).
    pub fn ignore_snippets(&self) -> bool {
        self.ignore_snippets
    }

    /// ```
    /// use emdg_core::settings::EngineSettings;
    /// let mut s = EngineSettings::default();
    /// s.set_ignore_snippets(true);
    /// assert!(s.ignore_snippets());
    /// ```
    pub fn set_ignore_snippets(&mut self, value: bool) {
        self.ignore_snippets = value;
    }

    /// Forces `par_dsh = "IN"` on read, taking sensor depth without heave
    /// augmentation (§6.3). The source propagates this to subsequent
    /// writes; see `DESIGN.md` for the open-question resolution.
    pub fn sensordepth_only(&self) -> bool {
        self.sensordepth_only
    }

    pub fn set_sensordepth_only(&mut self, value: bool) {
        self.sensordepth_only = value;
    }

    /// Replace `png_date`/`png_msec` with caller-supplied `time_d` at
    /// preprocess time (§6.3).
    pub fn timestamp_changed(&self) -> bool {
        self.timestamp_changed
    }

    pub fn set_timestamp_changed(&mut self, value: bool) {
        self.timestamp_changed = value;
    }

    /// Cap on samples retained by each interpolation series before the
    /// oldest is evicted (§5's "bounded... FIFO eviction").
    pub fn interpolation_history_cap(&self) -> usize {
        self.interpolation_history_cap
    }

    /// ```
    /// use emdg_core::settings::EngineSettings;
    /// let mut s = EngineSettings::default();
    /// s.set_interpolation_history_cap(128);
    /// assert_eq!(s.interpolation_history_cap(), 128);
    /// ```
    pub fn set_interpolation_history_cap(&mut self, value: usize) {
        self.interpolation_history_cap = value.max(1);
    }
}
