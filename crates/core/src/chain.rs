// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guarded counter chain
//!
//! A reference resettable resource: a counter wrapped in any number of
//! intermediate layers. Every layer runs a strong guard check before touching
//! its own state, so a reset observed at any depth unwinds the whole call.

use crate::coordination::{GuardError, ResetScope};
use std::sync::atomic::{AtomicU64, Ordering};

/// An operation that runs under a [`ResetScope`] and can be reinitialized
pub trait Resettable: Send + Sync {
    /// Run the operation, returning the innermost counter value
    fn perform(&self, scope: &mut ResetScope<'_>) -> Result<u64, GuardError>;

    /// Reinitialize this layer and everything beneath it
    fn reset(&self);
}

/// Innermost layer holding the counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Layer that checks the guard and delegates inward
#[derive(Debug)]
pub struct Intermediate {
    depth: usize,
    entries: AtomicU64,
    inner: Box<CounterLayer>,
}

impl Intermediate {
    pub fn new(inner: CounterLayer) -> Self {
        Self {
            depth: inner.depth() + 1,
            entries: AtomicU64::new(0),
            inner: Box::new(inner),
        }
    }

    /// Times this layer was entered since the last reset
    pub fn entries(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &CounterLayer {
        &self.inner
    }
}

/// One level of the chain
#[derive(Debug)]
pub enum CounterLayer {
    Base(Counter),
    Wrap(Intermediate),
}

impl CounterLayer {
    /// Build a counter wrapped so the chain has `depth` layers in total.
    ///
    /// A depth of zero is treated as one.
    pub fn chain(depth: usize) -> Self {
        (1..depth.max(1)).fold(CounterLayer::Base(Counter::new()), |inner, _| {
            CounterLayer::Wrap(Intermediate::new(inner))
        })
    }

    /// Number of layers from here down, counting this one
    pub fn depth(&self) -> usize {
        match self {
            CounterLayer::Base(_) => 1,
            CounterLayer::Wrap(layer) => layer.depth,
        }
    }

    /// The innermost counter
    pub fn counter(&self) -> &Counter {
        match self {
            CounterLayer::Base(counter) => counter,
            CounterLayer::Wrap(layer) => layer.inner.counter(),
        }
    }

    /// Entry counts of the intermediate layers, outermost first
    pub fn entries(&self) -> Vec<u64> {
        let mut entries = Vec::new();
        let mut layer = self;
        while let CounterLayer::Wrap(wrap) = layer {
            entries.push(wrap.entries());
            layer = &wrap.inner;
        }
        entries
    }
}

impl Resettable for CounterLayer {
    fn perform(&self, scope: &mut ResetScope<'_>) -> Result<u64, GuardError> {
        scope.check()?;
        match self {
            CounterLayer::Base(counter) => {
                let value = counter.value.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(value, "counter incremented");
                Ok(value)
            }
            CounterLayer::Wrap(layer) => {
                layer.entries.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(depth = layer.depth, "entering layer");
                layer.inner.perform(scope)
            }
        }
    }

    fn reset(&self) {
        match self {
            CounterLayer::Base(counter) => counter.value.store(0, Ordering::Relaxed),
            CounterLayer::Wrap(layer) => {
                layer.entries.store(0, Ordering::Relaxed);
                layer.inner.reset();
            }
        }
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
