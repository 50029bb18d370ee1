use dynarr::{DynamicArray, Duplicate, RawBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Empty {}

#[test]
fn unit_struct() {
    let mut array = DynamicArray::<Unit>::new();
    for _ in 0..5 {
        array.push(Unit);
    }
    assert_eq!(array.capacity(), 8);
    for _ in 0..5 {
        assert_eq!(array.pop(), Some(Unit));
    }
    assert_eq!(array.pop(), None);
}

#[test]
fn empty_struct_with_duplicate() {
    let mut array = DynamicArray::new_in(Duplicate);
    for _ in 0..5 {
        array.push(Empty {});
    }
    array.insert(2, Empty {});
    array.erase(0);
    assert_eq!(array.len(), 5);
    assert_eq!(array.into_iter().count(), 5);
}

#[test]
fn unit_resize() {
    let mut array = DynamicArray::<()>::new();
    array.resize(1000);
    assert_eq!(array.len(), 1000);
    assert_eq!(array.capacity(), 1000);
    array.resize(1);
    assert_eq!(array, [()]);
}

#[test]
fn zero_sized_buffer_has_address() {
    let buffer = RawBuffer::<Unit>::allocate(3);
    assert!(buffer.address().is_some());
    assert_eq!(buffer.capacity(), 3);
}
