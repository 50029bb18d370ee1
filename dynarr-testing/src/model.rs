use dynarr::{DynamicArray, Duplicate, Relocate, TransferPolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Insert(usize, i32),
    Erase(usize),
    PopBack,
    Pop,
    Resize(usize),
    Reserve(usize),
    Truncate(usize),
    Reassign(Vec<i32>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        3 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => Just(Op::PopBack),
        1 => Just(Op::Pop),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => (0usize..96).prop_map(Op::Reserve),
        1 => (0usize..48).prop_map(Op::Truncate),
        1 => prop::collection::vec(any::<i32>(), 0..24).prop_map(Op::Reassign),
    ]
}

/// Applies `ops` to both the array and a `Vec`, checking that they agree
/// after every step.
fn run<P>(policy: P, ops: &[Op]) -> Result<(), TestCaseError>
where
    P: TransferPolicy<i32> + Copy,
{
    let mut array = DynamicArray::new_in(policy);
    let mut model = Vec::new();

    for op in ops {
        let capacity = array.capacity();
        let address = array.as_ptr();
        match op {
            Op::Push(value) => {
                array.push(*value);
                model.push(*value);
            }
            Op::Insert(i, value) => {
                let i = i % (model.len() + 1);
                prop_assert_eq!(array.insert(i, *value), i);
                model.insert(i, *value);
            }
            Op::Erase(i) => {
                if !model.is_empty() {
                    let i = i % model.len();
                    prop_assert_eq!(array.erase(i), i);
                    model.remove(i);
                }
            }
            Op::PopBack => {
                if !model.is_empty() {
                    array.pop_back();
                    model.pop();
                }
            }
            Op::Pop => {
                prop_assert_eq!(array.pop(), model.pop());
            }
            Op::Resize(len) => {
                array.resize(*len);
                model.resize(*len, 0);
                if *len <= capacity {
                    prop_assert_eq!(array.capacity(), capacity);
                }
            }
            Op::Reserve(new_capacity) => {
                array.reserve(*new_capacity);
                if *new_capacity <= capacity {
                    prop_assert_eq!(array.capacity(), capacity);
                    prop_assert_eq!(array.as_ptr(), address);
                } else {
                    prop_assert_eq!(array.capacity(), *new_capacity);
                }
            }
            Op::Truncate(len) => {
                array.truncate(*len);
                model.truncate(*len);
            }
            Op::Reassign(values) => {
                let mut source = DynamicArray::new_in(policy);
                source.extend(values.iter().copied());
                array.clone_from(&source);
                model.clone_from(values);
                if values.len() <= capacity {
                    prop_assert_eq!(array.capacity(), capacity);
                }
            }
        }

        prop_assert!(array.len() <= array.capacity());
        prop_assert_eq!(array.as_slice(), model.as_slice());
    }
    Ok(())
}

proptest! {
    #[test]
    fn relocating_matches_vec(ops in prop::collection::vec(arb_op(), 0..64)) {
        run(Relocate, &ops)?;
    }

    #[test]
    fn duplicating_matches_vec(ops in prop::collection::vec(arb_op(), 0..64)) {
        run(Duplicate, &ops)?;
    }

    #[test]
    fn pushes_preserve_order(values in prop::collection::vec(any::<u64>(), 0..200)) {
        let mut array = DynamicArray::new();
        for value in &values {
            array.push(*value);
        }
        prop_assert_eq!(array.len(), values.len());
        prop_assert_eq!(array, values);
    }

    #[test]
    fn insert_then_erase_is_identity(
        values in prop::collection::vec(any::<i16>(), 0..32),
        position in any::<usize>(),
        inserted in any::<i16>(),
    ) {
        let mut array: DynamicArray<_> = values.iter().copied().collect();
        let position = position % (values.len() + 1);
        array.insert(position, inserted);
        array.erase(position);
        prop_assert_eq!(array, values);
    }

    #[test]
    fn resize_round_trip_keeps_prefix(
        values in prop::collection::vec(any::<i32>(), 0..32),
        extra in 0usize..32,
    ) {
        let mut array: DynamicArray<_> = values.iter().copied().collect();
        array.resize(values.len() + extra);
        prop_assert!(array[values.len()..].iter().all(|&v| v == 0));
        array.resize(values.len());
        prop_assert_eq!(array, values);
    }

    #[test]
    fn clone_is_independent(values in prop::collection::vec(any::<i32>(), 1..32)) {
        let source: DynamicArray<_> = values.iter().copied().collect();
        let mut copy = source.clone();
        copy[0] = copy[0].wrapping_add(1);
        prop_assert_eq!(&source, &values);
        prop_assert_ne!(source, copy);
    }
}
