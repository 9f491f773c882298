// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::coordination::{ResetCoordinator, ResetState, ResourceWasReset};
use std::sync::Arc;
use std::thread;
use yare::parameterized;

fn guarded_chain(depth: usize) -> (Arc<ResetCoordinator>, Arc<CounterLayer>) {
    let coordinator = Arc::new(ResetCoordinator::default());
    let chain = Arc::new(CounterLayer::chain(depth));
    let target = Arc::clone(&chain);
    coordinator.register_handler(move || target.reset()).unwrap();
    (coordinator, chain)
}

#[parameterized(
    zero_is_single_counter = { 0, 1 },
    single = { 1, 1 },
    four_layers = { 4, 4 },
    deep = { 16, 16 },
)]
fn chain_has_requested_depth(requested: usize, expected: usize) {
    let chain = CounterLayer::chain(requested);
    assert_eq!(chain.depth(), expected);
    assert_eq!(chain.entries().len(), expected - 1);
}

#[test]
fn perform_increments_counter_through_every_layer() {
    let (coordinator, chain) = guarded_chain(4);
    let mut scope = coordinator.lock();

    assert_eq!(chain.perform(&mut scope), Ok(1));
    assert_eq!(chain.perform(&mut scope), Ok(2));
    assert_eq!(chain.counter().value(), 2);
    assert_eq!(chain.entries(), vec![2, 2, 2]);
}

#[test]
fn reset_clears_every_layer() {
    let chain = CounterLayer::chain(3);
    let coordinator = ResetCoordinator::default();
    {
        let mut scope = coordinator.lock();
        chain.perform(&mut scope).unwrap();
    }

    chain.reset();

    assert_eq!(chain.counter().value(), 0);
    assert_eq!(chain.entries(), vec![0, 0]);
}

#[test]
fn pending_reset_aborts_chain_and_next_call_starts_clean() {
    let (coordinator, chain) = guarded_chain(4);
    {
        let mut scope = coordinator.lock();
        for _ in 0..5 {
            chain.perform(&mut scope).unwrap();
        }
    }

    coordinator.trigger_reset();

    let mut scope = coordinator.lock();
    assert_eq!(
        chain.perform(&mut scope),
        Err(GuardError::Reset(ResourceWasReset))
    );
    assert_eq!(chain.counter().value(), 0);
    assert_eq!(chain.perform(&mut scope), Ok(1));
}

/// Layer that fires a reset from another thread right before delegating,
/// so the reset lands in the middle of the chain.
struct Tripwire {
    coordinator: Arc<ResetCoordinator>,
    inner: Arc<CounterLayer>,
}

impl Resettable for Tripwire {
    fn perform(&self, scope: &mut ResetScope<'_>) -> Result<u64, GuardError> {
        scope.check()?;
        let coordinator = Arc::clone(&self.coordinator);
        let controller = thread::spawn(move || coordinator.trigger_reset());
        while self.coordinator.state() != ResetState::ResetRequired {
            thread::yield_now();
        }
        let result = self.inner.perform(scope);
        assert!(controller.join().unwrap());
        result
    }

    fn reset(&self) {
        self.inner.reset();
    }
}

#[test]
fn reset_mid_chain_unwinds_from_inner_layer() {
    let (coordinator, chain) = guarded_chain(3);
    {
        let mut scope = coordinator.lock();
        chain.perform(&mut scope).unwrap();
        chain.perform(&mut scope).unwrap();
    }
    let tripwire = Tripwire {
        coordinator: Arc::clone(&coordinator),
        inner: Arc::clone(&chain),
    };

    let mut scope = coordinator.lock();
    let result = tripwire.perform(&mut scope);

    assert_eq!(result, Err(GuardError::Reset(ResourceWasReset)));
    // Handler ran before the inner layer resumed, and the inner layer
    // did no work after observing the reset.
    assert_eq!(chain.counter().value(), 0);
    assert_eq!(chain.entries(), vec![0, 0]);
    assert_eq!(coordinator.state(), ResetState::Valid);
    assert_eq!(chain.perform(&mut scope), Ok(1));
}
