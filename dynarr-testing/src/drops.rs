use crate::probe::{Ledger, Probe, SingleDrop};
use dynarr::{DynamicArray, Duplicate, Relocate, TransferPolicy, dyn_array};

fn exercise<P>(policy: P)
where
    P: TransferPolicy<Probe> + Copy,
{
    let ledger = Ledger::new();
    {
        let mut array = DynamicArray::new_in(policy);
        for value in 0..10 {
            array.push(ledger.probe(value));
        }
        assert_eq!(ledger.live(), 10);

        array.insert(3, ledger.probe(100));
        array.erase(0);
        array.pop_back();
        assert_eq!(array.remove(0).value, 1);
        assert_eq!(ledger.live(), array.len() as isize);

        array.truncate(4);
        assert_eq!(array, [2, 100, 3, 4]);
        assert_eq!(ledger.live(), 4);

        let copy = array.clone();
        assert_eq!(ledger.live(), 8);
        drop(copy);

        let mut target = DynamicArray::new_in(policy);
        target.extend(ledger.probes([7, 8, 9, 10, 11, 12]));
        target.clone_from(&array);
        assert_eq!(target, [2, 100, 3, 4]);
        assert_eq!(ledger.live(), 8);

        let mut iter = target.into_iter();
        assert_eq!(iter.next().map(|probe| probe.value), Some(2));
        drop(iter);
        assert_eq!(ledger.live(), 4);

        array.clear();
        assert_eq!(ledger.live(), 0);
        array.push(ledger.probe(1));
    }
    assert_eq!(ledger.live(), 0);
}

#[test]
fn every_element_dropped_once_relocating() {
    exercise(Relocate);
}

#[test]
fn every_element_dropped_once_duplicating() {
    exercise(Duplicate);
}

#[test]
fn growth_keeps_single_ownership() {
    let mut relocating = DynamicArray::new();
    let mut duplicating = DynamicArray::new_in(Duplicate);
    for _ in 0..33 {
        relocating.push(SingleDrop::DEFAULT);
        duplicating.push(SingleDrop::DEFAULT);
    }
    relocating.insert(0, SingleDrop::DEFAULT);
    duplicating.insert(0, SingleDrop::DEFAULT);
    relocating.erase(5);
    duplicating.erase(5);
    assert_eq!(relocating.len(), 33);
    assert_eq!(duplicating.len(), 33);
}

#[test]
fn resize_drops_tail() {
    let ledger = Ledger::new();
    let mut array = DynamicArray::new();
    array.extend(ledger.probes(0..6));
    array.resize_with(2, || unreachable!());
    assert_eq!(array, [0, 1]);
    assert_eq!(ledger.live(), 2);
    array.resize_with(4, || ledger.probe(9));
    assert_eq!(array, [0, 1, 9, 9]);
    assert_eq!(ledger.live(), 4);
}

#[test]
fn repeated_macro_clones_all_but_last() {
    let ledger = Ledger::new();
    let array = dyn_array![ledger.probe(5); 3];
    assert_eq!(array, [5, 5, 5]);
    assert_eq!(ledger.live(), 3);
    let empty = dyn_array![ledger.probe(5); 0];
    assert!(empty.is_empty());
    assert_eq!(ledger.live(), 3);
}
