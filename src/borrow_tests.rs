/// ```
/// use dynarr::RawBuffer;
/// let mut a = RawBuffer::<u8>::allocate(4);
/// let b = a.take();
/// assert_eq!(b.capacity(), 4);
/// ```
mod raw_buffer_cannot_be_cloned {
    /// ```compile_fail
    /// use dynarr::RawBuffer;
    /// let a = RawBuffer::<u8>::allocate(4);
    /// let b = a.clone();
    /// ```
    mod fail {}
}

/// ```
/// use dynarr::dyn_array;
/// let mut array = dyn_array![1, 2];
/// let first = array[0];
/// array.push(3);
/// assert_eq!(first, 1);
/// ```
mod reference_across_push {
    /// ```compile_fail
    /// use dynarr::dyn_array;
    /// let mut array = dyn_array![1, 2];
    /// let first = &array[0];
    /// array.push(3); // May reallocate
    /// println!("{first}");
    /// ```
    mod fail {}
}

/// ```
/// use dynarr::{DynamicArray, Duplicate};
/// #[derive(Clone)]
/// struct Cloneable;
/// let mut array = DynamicArray::new_in(Duplicate);
/// array.push(Cloneable);
/// ```
mod duplicate_requires_clone {
    /// ```compile_fail
    /// use dynarr::{DynamicArray, Duplicate};
    /// struct NotCloneable;
    /// let mut array = DynamicArray::new_in(Duplicate);
    /// array.push(NotCloneable);
    /// ```
    mod fail {}
}

/// ```
/// use dynarr::{DynamicArray, RawBuffer};
/// fn send<T: Send>(_: T) {}
/// send(DynamicArray::<u8>::new());
/// send(RawBuffer::<u8>::new());
/// ```
mod send_follows_element {
    /// ```compile_fail
    /// use dynarr::DynamicArray;
    /// use std::rc::Rc;
    /// fn send<T: Send>(_: T) {}
    /// send(DynamicArray::<Rc<u8>>::new());
    /// ```
    mod fail {}
}
