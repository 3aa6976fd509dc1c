//! Ticker integration tests.
//!
//! These tests schedule chain segments through modules calling
//! `SpellData::schedule` and advance them with `SpellTicker::tick`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_spell::builder::SpellBuilder;
use rust_spell::context::{Caster, ManaPool};
use rust_spell::core::{EntityId, Point};
use rust_spell::modules::{BasicModule, ModuleHandle};
use rust_spell::ring::RingIndex;
use rust_spell::ticker::SpellTicker;

/// Root module that hands its child to the ticker for `ticks` ticks.
fn delay(ticks: u32) -> ModuleHandle {
    Arc::new(BasicModule::new("shape_delay").with_behavior(move |data, ring, _| {
        if let Some(child) = ring.child() {
            data.schedule(child.index(), ticks);
        }
        false
    }))
}

fn counter(id: &str, count: &Arc<AtomicUsize>) -> ModuleHandle {
    let count = Arc::clone(count);
    Arc::new(BasicModule::new(id).with_behavior(move |_, _, _| {
        count.fetch_add(1, Ordering::SeqCst);
        true
    }))
}

// =============================================================================
// Scheduling Tests
// =============================================================================

/// A scheduled ring runs once per tick for its duration, then expires.
#[test]
fn test_scheduled_ring_runs_each_tick() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let chain = builder.compile(&[delay(3), counter("effect_pulse", &count)], &[]).unwrap();

    let mut ticker = SpellTicker::new();
    let ids = ticker.cast(&chain, builder.spell_data());

    assert_eq!(ids.len(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    for expected in 1..=3 {
        assert_eq!(ticker.tick(), 1);
        assert_eq!(count.load(Ordering::SeqCst), expected);
    }
    assert!(ticker.is_empty());
    assert_eq!(ticker.tick(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

/// Scheduled runs continue down the chain from the scheduled ring.
#[test]
fn test_scheduled_ring_runs_descendants() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let chain = builder
        .compile(&[delay(2), counter("a", &first), counter("b", &second)], &[])
        .unwrap();

    let mut ticker = SpellTicker::new();
    ticker.cast(&chain, builder.spell_data());
    ticker.tick();
    ticker.tick();

    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

/// Schedules made during a tick start on the following tick.
#[test]
fn test_schedules_from_tick_deferred() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    // delay -> delay -> pulse: the middle delay schedules the pulse when ticked.
    let chain = builder
        .compile(&[delay(1), delay(1), counter("effect_pulse", &count)], &[])
        .unwrap();

    let mut ticker = SpellTicker::new();
    ticker.cast(&chain, builder.spell_data());

    assert_eq!(ticker.tick(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(ticker.len(), 1);

    assert_eq!(ticker.tick(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(ticker.is_empty());
}

/// Each tick runs on a fresh copy of the snapshot: the caster and origin
/// captured at cast time are visible every tick.
#[test]
fn test_snapshot_context() {
    let seen = Arc::new(AtomicUsize::new(0));
    let observer = {
        let seen = Arc::clone(&seen);
        Arc::new(BasicModule::new("effect_observe").with_behavior(move |data, _, _| {
            if data.caster().map(|c| c.id()) == Some(EntityId::new(9)) && data.origin().is_some() {
                seen.fetch_add(1, Ordering::SeqCst);
            }
            true
        })) as ModuleHandle
    };

    let builder = SpellBuilder::default();
    let chain = builder.compile(&[delay(2), observer], &[]).unwrap();
    let data = builder
        .spell_data()
        .with_caster(Caster::new(EntityId::new(9), ManaPool::new(10.0, 10.0).shared()))
        .with_origin(Point::new(0.0, 70.0, 0.0));

    let mut ticker = SpellTicker::new();
    ticker.cast(&chain, data);
    ticker.tick();
    ticker.tick();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Replacement & Cancellation Tests
// =============================================================================

/// Casting the same chain again resets the existing entry instead of adding one.
#[test]
fn test_recast_replaces_entry() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let chain = builder.compile(&[delay(3), counter("effect_pulse", &count)], &[]).unwrap();

    let mut ticker = SpellTicker::new();
    let first = ticker.cast(&chain, builder.spell_data());
    ticker.tick();
    let second = ticker.cast(&chain, builder.spell_data());

    assert_eq!(first, second);
    assert_eq!(ticker.len(), 1);
    assert_eq!(ticker.remaining(first[0]), Some(3));
}

/// Separately compiled chains with different content are separate entries.
#[test]
fn test_distinct_chains_are_distinct_entries() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let short = builder.compile(&[delay(1), counter("effect_a", &count)], &[]).unwrap();
    let long = builder.compile(&[delay(1), counter("effect_b", &count)], &[]).unwrap();

    let mut ticker = SpellTicker::new();
    ticker.cast(&short, builder.spell_data());
    ticker.cast(&long, builder.spell_data());

    assert_eq!(ticker.len(), 2);
    assert_eq!(ticker.tick(), 2);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// Cancelling by predicate drops matching entries without running them.
#[test]
fn test_cancel_where() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let chain = builder.compile(&[delay(5), counter("effect_pulse", &count)], &[]).unwrap();

    let mut ticker = SpellTicker::new();
    ticker.cast(&chain, builder.spell_data());

    let dropped = ticker.cancel_where(|ring, _| ring.index() == RingIndex::new(1));

    assert_eq!(dropped, 1);
    assert!(ticker.is_empty());
    assert_eq!(ticker.tick(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

/// Cancelling by id leaves other entries alone.
#[test]
fn test_cancel_by_id() {
    let count = Arc::new(AtomicUsize::new(0));
    let builder = SpellBuilder::default();
    let a = builder.compile(&[delay(4), counter("effect_a", &count)], &[]).unwrap();
    let b = builder.compile(&[delay(4), counter("effect_b", &count)], &[]).unwrap();

    let mut ticker = SpellTicker::new();
    let a_ids = ticker.cast(&a, builder.spell_data());
    let b_ids = ticker.cast(&b, builder.spell_data());

    assert!(ticker.cancel(a_ids[0]));
    assert_eq!(ticker.remaining(a_ids[0]), None);
    assert_eq!(ticker.remaining(b_ids[0]), Some(4));
    assert_eq!(ticker.tick(), 1);
}
