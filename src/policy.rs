//! Load-factor thresholds and resize factors.

use slotmap::DefaultKey;
use thiserror::Error;

/// Largest bucket count a table will allocate.
pub const MAX_CAPACITY: usize = isize::MAX as usize / core::mem::size_of::<Option<DefaultKey>>();

/// Largest accepted `growth_factor`.
pub const MAX_GROWTH_FACTOR: f64 = 64.0;

/// Errors raised when building a table or a simulation from bad parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("capacity must be at least one bucket")]
    ZeroCapacity,

    #[error("capacity {0} exceeds the largest bucket array")]
    CapacityTooLarge(usize),

    #[error("invalid load-factor policy: {field} = {value}")]
    InvalidPolicy { field: &'static str, value: f64 },

    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// When and by how much a table resizes.
///
/// Growth is checked before a new key is inserted, shrinking after a
/// successful remove.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadFactorPolicy {
    /// Grow when the load after the pending insert would exceed this.
    pub grow_above: f64,
    /// Shrink when the load after a removal drops below this.
    pub shrink_below: f64,
    pub growth_factor: f64,
    pub shrink_factor: f64,
}

impl LoadFactorPolicy {
    pub const fn new() -> Self {
        Self {
            grow_above: 0.7,
            shrink_below: 0.2,
            growth_factor: 2.0,
            shrink_factor: 0.5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("grow_above", self.grow_above),
            ("shrink_below", self.shrink_below),
            ("growth_factor", self.growth_factor),
            ("shrink_factor", self.shrink_factor),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::InvalidPolicy { field, value });
            }
        }
        if self.shrink_below < 0.0 {
            return Err(ConfigError::InvalidPolicy {
                field: "shrink_below",
                value: self.shrink_below,
            });
        }
        if self.grow_above <= self.shrink_below {
            return Err(ConfigError::InvalidPolicy {
                field: "grow_above",
                value: self.grow_above,
            });
        }
        if self.growth_factor <= 1.0 || self.growth_factor > MAX_GROWTH_FACTOR {
            return Err(ConfigError::InvalidPolicy {
                field: "growth_factor",
                value: self.growth_factor,
            });
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ConfigError::InvalidPolicy {
                field: "shrink_factor",
                value: self.shrink_factor,
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn should_grow(&self, len_after: usize, capacity: usize) -> bool {
        load(len_after, capacity) > self.grow_above
    }

    #[inline]
    pub(crate) fn should_shrink(&self, len: usize, capacity: usize, start_capacity: usize) -> bool {
        capacity > start_capacity && load(len, capacity) < self.shrink_below
    }
}

impl Default for LoadFactorPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub(crate) fn load(len: usize, capacity: usize) -> f64 {
    len as f64 / capacity as f64
}
