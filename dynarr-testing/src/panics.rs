use crate::probe::{Ledger, Probe};
use dynarr::{DynamicArray, Duplicate, Relocate, TransferPolicy};
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

/// An array of `values` whose capacity is exactly its length.
fn full<P>(ledger: &Rc<Ledger>, policy: P, values: &[u32]) -> DynamicArray<Probe, P>
where
    P: TransferPolicy<Probe>,
{
    let mut array = DynamicArray::with_capacity_in(values.len(), policy);
    array.extend(ledger.probes(values.iter().copied()));
    array
}

#[test]
fn duplicate_growth_is_all_or_nothing() {
    let ledger = Ledger::new();
    let mut array = full(&ledger, Duplicate, &[1, 2, 3, 4]);
    let address = array.as_ptr();
    ledger.allow_clones(2);
    let probe = ledger.probe(5);
    let result = catch_unwind(AssertUnwindSafe(|| array.push(probe)));
    assert!(result.is_err());
    assert_eq!(array, [1, 2, 3, 4]);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), address);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn duplicate_reserve_is_all_or_nothing() {
    let ledger = Ledger::new();
    let mut array = full(&ledger, Duplicate, &[1, 2, 3]);
    ledger.allow_clones(1);
    let result = catch_unwind(AssertUnwindSafe(|| array.reserve(10)));
    assert!(result.is_err());
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(array.capacity(), 3);
    assert_eq!(ledger.live(), 3);
}

#[test]
fn relocation_never_clones() {
    let ledger = Ledger::new();
    let mut array = full(&ledger, Relocate, &[1, 2]);
    ledger.allow_clones(0);
    array.push(ledger.probe(3));
    array.insert(0, ledger.probe(0));
    array.reserve(64);
    array.erase(1);
    assert_eq!(array, [0, 2, 3]);
    assert_eq!(ledger.live(), 3);
}

fn emplace_panics_cleanly<P>(policy: P, capacity: usize)
where
    P: TransferPolicy<Probe>,
{
    let ledger = Ledger::new();
    let mut array = DynamicArray::with_capacity_in(capacity, policy);
    array.extend(ledger.probes([1, 2, 3]));
    for position in 0..=3 {
        let result = catch_unwind(AssertUnwindSafe(|| {
            array.emplace(position, || panic!("constructor failed"))
        }));
        assert!(result.is_err());
        assert_eq!(array, [1, 2, 3]);
        assert_eq!(array.capacity(), capacity);
        assert_eq!(ledger.live(), 3);
    }
}

#[test]
fn emplace_panic_while_growing() {
    emplace_panics_cleanly(Relocate, 3);
    emplace_panics_cleanly(Duplicate, 3);
}

#[test]
fn emplace_panic_with_room() {
    emplace_panics_cleanly(Relocate, 8);
    emplace_panics_cleanly(Duplicate, 8);
}

#[test]
fn clone_panic_drops_partial_copy() {
    let ledger = Ledger::new();
    let array = full(&ledger, Relocate, &[1, 2, 3, 4]);
    ledger.allow_clones(3);
    let result = catch_unwind(AssertUnwindSafe(|| array.clone()));
    assert!(result.is_err());
    assert_eq!(ledger.live(), 4);
}

#[test]
fn clone_from_panic_leaves_small_target_untouched() {
    let ledger = Ledger::new();
    let source = full(&ledger, Relocate, &[1, 2, 3, 4]);
    let mut target = full(&ledger, Relocate, &[9]);
    ledger.allow_clones(2);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    assert_eq!(target, [9]);
    assert_eq!(ledger.live(), 5);
}

#[test]
fn duplicate_erase_panic_keeps_every_slot_live() {
    let ledger = Ledger::new();
    let mut array = full(&ledger, Duplicate, &[1, 2, 3, 4]);
    ledger.allow_clones(1);
    let result = catch_unwind(AssertUnwindSafe(|| array.erase(0)));
    assert!(result.is_err());
    assert_eq!(array.len(), 4);
    assert_eq!(array, [2, 2, 3, 4]);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn resize_panic_keeps_built_prefix() {
    let ledger = Ledger::new();
    let mut array = full(&ledger, Relocate, &[1]);
    let mut built = 0;
    let result = catch_unwind(AssertUnwindSafe(|| {
        array.resize_with(5, || {
            if built == 2 {
                panic!("out of values");
            }
            built += 1;
            ledger.probe(0)
        })
    }));
    assert!(result.is_err());
    assert_eq!(array, [1, 0, 0]);
    assert_eq!(array.capacity(), 5);
    assert_eq!(ledger.live(), 3);
}
