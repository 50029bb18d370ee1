//! A contiguous growable array built directly on untyped heap memory.
//!
//! [`RawBuffer`] owns a block of uninitialized slots and never constructs or
//! drops a value. [`DynamicArray`] owns one buffer plus a length and is
//! responsible for every value living in it: placement, growth, insertion,
//! erasure, cloning and dropping.
//!
//! When the array grows, its [`TransferPolicy`] decides whether live elements
//! are [relocated](Relocate) bitwise or [duplicated](Duplicate) with
//! [`Clone`], the latter keeping the originals until every clone succeeded.
//!
//! Operations that may allocate come in two flavors: the usual methods
//! (`push`, `reserve`, ...) that panic or abort like the standard
//! collections, and `try_*` methods that return a [`TryReserveError`] and
//! leave the array untouched.

mod borrow_tests;
mod dyn_array;
mod eq_impl;
mod error;
mod index;
mod into_iter;
mod macros;
mod raw_buffer;
#[cfg(feature = "serde")]
mod serde;
mod transfer;

pub use dyn_array::DynamicArray;
pub use error::TryReserveError;
pub use into_iter::IntoIter;
pub use raw_buffer::RawBuffer;
pub use transfer::{Duplicate, Relocate, TransferPolicy};

#[cfg(test)]
mod tests {
    use crate::{DynamicArray, Duplicate, Relocate, TransferPolicy};

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct El {
        foo: u64,
        bar: u8,
        baz: [u32; 2],
    }

    const A: El = El {
        foo: 0,
        bar: 1,
        baz: [2, 3],
    };

    const B: El = El {
        foo: 4,
        bar: 5,
        baz: [6, 7],
    };

    const C: El = El {
        foo: 8,
        bar: 9,
        baz: [10, 11],
    };

    const D: El = El {
        foo: 12,
        bar: 13,
        baz: [14, 15],
    };

    const E: El = El {
        foo: 16,
        bar: 17,
        baz: [18, 19],
    };

    const ELEMENTS: [El; 5] = [A, B, C, D, E];
    const ALL_A: [El; 3] = [A, A, A];

    fn filled<P>(policy: P, elements: &[El]) -> DynamicArray<El, P>
    where
        P: TransferPolicy<El>,
    {
        let mut array = DynamicArray::new_in(policy);
        for element in elements {
            array.push(element.clone());
        }
        array
    }

    #[test]
    pub fn push_and_pop() {
        push_and_pop_with(Relocate);
        push_and_pop_with(Duplicate);
    }

    fn push_and_pop_with<P: TransferPolicy<El>>(policy: P) {
        let mut array = filled(policy, &ELEMENTS);
        for element in ELEMENTS.into_iter().rev() {
            assert_eq!(Some(element), array.pop());
        }
        assert_eq!(None, array.pop());
    }

    #[test]
    pub fn insert() {
        for (index, expected) in [
            (0, [B, A, A, A]),
            (1, [A, B, A, A]),
            (2, [A, A, B, A]),
            (3, [A, A, A, B]),
        ] {
            test_insert(Relocate, index, &expected);
            test_insert(Duplicate, index, &expected);
        }
    }

    fn test_insert<P: TransferPolicy<El> + Copy>(policy: P, index: usize, expected: &[El; 4]) {
        // Exactly full, so the insert has to grow.
        let mut array = DynamicArray::with_capacity_in(3, policy);
        array.extend(ALL_A);
        assert_eq!(array.insert(index, B), index);
        assert_eq!(array, expected);

        // Room to spare, so the insert shifts in place.
        let mut array = DynamicArray::with_capacity_in(4, policy);
        array.extend(ALL_A);
        array.insert(index, B);
        assert_eq!(array, expected);
        assert_eq!(array.capacity(), 4);
    }

    #[test]
    pub fn erase() {
        for (index, expected) in [
            (0, [B, C, D, E]),
            (1, [A, C, D, E]),
            (2, [A, B, D, E]),
            (3, [A, B, C, E]),
            (4, [A, B, C, D]),
        ] {
            test_erase(Relocate, index, &expected);
            test_erase(Duplicate, index, &expected);
        }
    }

    fn test_erase<P: TransferPolicy<El>>(policy: P, index: usize, expected: &[El; 4]) {
        let mut array = filled(policy, &ELEMENTS);
        assert_eq!(array.erase(index), index);
        assert_eq!(array, expected);
        assert_eq!(array.len(), 4);
    }

    #[test]
    pub fn insert_then_erase_restores() {
        for index in 0..=ELEMENTS.len() {
            let mut array = filled(Duplicate, &ELEMENTS);
            array.insert(index, El::default());
            array.erase(index);
            assert_eq!(array, ELEMENTS);
        }
    }

    #[test]
    pub fn scenario() {
        let mut array = DynamicArray::new();
        array.push(1);
        array.push(2);
        array.push(3);
        assert_eq!(array.len(), 3);
        assert_eq!(array, [1, 2, 3]);
        array.insert(1, 9);
        assert_eq!(array, [1, 9, 2, 3]);
        assert_eq!(array.len(), 4);
        array.erase(0);
        assert_eq!(array, [9, 2, 3]);
        assert_eq!(array.len(), 3);
        array.pop_back();
        assert_eq!(array, [9, 2]);
        assert_eq!(array.len(), 2);
    }

    #[test]
    pub fn growth_preserves_order() {
        let mut array = DynamicArray::new_in(Duplicate);
        for i in 0..100 {
            array.push(i.to_string());
        }
        assert!(array.iter().enumerate().all(|(i, s)| *s == i.to_string()));
    }

    #[test]
    pub fn resize_defaults() {
        let mut array = filled(Relocate, &[A, B]);
        array.resize(4);
        assert_eq!(array, [A, B, El::default(), El::default()]);
        array.resize(2);
        assert_eq!(array, [A, B]);
    }

    #[test]
    pub fn clone_is_independent() {
        let mut source = filled(Duplicate, &ELEMENTS);
        let mut copy = source.clone();
        copy[0] = E;
        source.pop_back();
        assert_eq!(copy, [E, B, C, D, E]);
        assert_eq!(source, [A, B, C, D]);
    }

    #[test]
    pub fn take_moves_everything() {
        let mut source = filled(Relocate, &ELEMENTS);
        let address = source.as_ptr();
        let target = source.take();
        assert_eq!(target, ELEMENTS);
        assert_eq!(target.as_ptr(), address);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    pub fn emplace_constructs_in_place() {
        let mut array = filled(Relocate, &[A, C]);
        array.emplace(1, || El {
            foo: 4,
            bar: 5,
            baz: [6, 7],
        });
        assert_eq!(array, [A, B, C]);
    }
}
