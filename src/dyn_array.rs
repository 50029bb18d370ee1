use crate::{
    IntoIter, RawBuffer, TryReserveError, error,
    transfer::{Relocate, TransferPolicy},
};
use std::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter,
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut},
    ptr, slice,
};

/// A contiguous growable array built on a [`RawBuffer`].
///
/// The array owns exactly one buffer. Slots `[0, len)` hold live values in
/// order; slots `[len, capacity)` are uninitialized and never touched. Every
/// value in the buffer is constructed and dropped by the array itself.
///
/// How existing elements move to a larger buffer is chosen by the transfer
/// policy `P`. The default, [`Relocate`], moves them bitwise. [`Duplicate`]
/// clones them and keeps the originals until every clone succeeded.
///
/// ```
/// # use dynarr::DynamicArray;
/// let mut array = DynamicArray::new();
/// array.push(1);
/// array.push(2);
/// array.push(3);
/// array.insert(1, 9);
/// assert_eq!(array, [1, 9, 2, 3]);
/// array.erase(0);
/// assert_eq!(array, [9, 2, 3]);
/// array.pop_back();
/// assert_eq!(array, [9, 2]);
/// ```
///
/// [`Duplicate`]: crate::Duplicate
pub struct DynamicArray<T, P = Relocate> {
    buffer: RawBuffer<T>,
    len: usize,
    _policy: PhantomData<fn() -> P>,
}

impl<T> DynamicArray<T> {
    /// Constructs a new, empty array with the [`Relocate`] policy.
    ///
    /// The array will not allocate until elements are pushed onto it.
    pub const fn new() -> Self {
        Self::new_in(Relocate)
    }

    /// Constructs a new, empty array with room for exactly `capacity`
    /// elements.
    ///
    /// ```
    /// # use dynarr::DynamicArray;
    /// let array = DynamicArray::<u8>::with_capacity(10);
    /// assert_eq!(array.len(), 0);
    /// assert_eq!(array.capacity(), 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Relocate)
    }

    /// Constructs an array of `len` default values. The capacity is exactly
    /// `len`.
    ///
    /// ```
    /// # use dynarr::DynamicArray;
    /// let array = DynamicArray::<i32>::with_len(3);
    /// assert_eq!(array, [0, 0, 0]);
    /// assert_eq!(array.capacity(), 3);
    /// ```
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(len, Relocate)
    }

    #[doc(hidden)]
    pub fn from_elem(element: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(n);
        array.fill_from(iter::repeat_n(element, n));
        array
    }
}

impl<T, P> DynamicArray<T, P> {
    /// Constructs a new, empty array using the given transfer policy.
    ///
    /// ```
    /// # use dynarr::{DynamicArray, Duplicate};
    /// let mut array = DynamicArray::new_in(Duplicate);
    /// array.push(String::from("cloned on growth"));
    /// ```
    pub const fn new_in(policy: P) -> Self {
        mem::forget(policy);
        Self {
            buffer: RawBuffer::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    /// Like [`with_capacity`](DynamicArray::with_capacity), with the given
    /// transfer policy.
    pub fn with_capacity_in(capacity: usize, policy: P) -> Self {
        let mut array = Self::new_in(policy);
        array.buffer = RawBuffer::allocate(capacity);
        array
    }

    /// Like [`with_len`](DynamicArray::with_len), with the given transfer
    /// policy.
    pub fn with_len_in(len: usize, policy: P) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity_in(len, policy);
        array.fill_from(iter::repeat_with(T::default).take(len));
        array
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns a slice of all live elements.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first len slots are live and the pointer is non-null and
        // aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// Returns a mutable slice of all live elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: As in as_slice, and we have exclusive access.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// Returns a pointer to the first slot of the buffer.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Returns a mutable pointer to the first slot of the buffer.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    /// Removes the last element and returns it, or [`None`] if the array is
    /// empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: The slot was live and is now past the length, so it is
            // read exactly once.
            Some(unsafe { self.buffer.slot(self.len).read() })
        }
    }

    /// Drops the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty array");
        self.len -= 1;
        // SAFETY: The slot was live and is now past the length.
        unsafe { ptr::drop_in_place(self.buffer.slot(self.len)) };
    }

    /// Drops every element past `len`. Does nothing if `len >= self.len()`.
    /// Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        // SAFETY: Slots [len, self.len) are live. The length shrinks first so
        // that a panicking destructor leaves no dangling live slot.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.buffer.slot(len), self.len - len);
            self.len = len;
            ptr::drop_in_place(tail);
        }
    }

    /// Drops all elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Removes and returns the element at `position`, moving everything after
    /// it one slot to the left.
    ///
    /// The shift is a relocation whatever the policy, since moving a value
    /// out cannot be done by cloning.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len`.
    pub fn remove(&mut self, position: usize) -> T {
        assert!(
            position < self.len,
            "removal index (is {position}) should be < len (is {})",
            self.len
        );
        // SAFETY: position < len and all len slots are live.
        let removed = unsafe {
            <Relocate as TransferPolicy<T>>::close_gap(self.buffer.as_mut_ptr(), position, self.len)
        };
        self.len -= 1;
        removed
    }

    /// Exchanges the contents of two arrays in constant time.
    ///
    /// Not to be confused with the slice method `swap`, which exchanges two
    /// elements.
    pub fn swap_contents(&mut self, other: &mut Self) {
        self.buffer.swap(&mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out in constant time, leaving this array empty with
    /// no capacity.
    ///
    /// ```
    /// # use dynarr::dyn_array;
    /// let mut source = dyn_array![1, 2, 3];
    /// let target = source.take();
    /// assert_eq!(target, [1, 2, 3]);
    /// assert_eq!(source.len(), 0);
    /// assert_eq!(source.capacity(), 0);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Constructs elements at the end from `iter`, stopping early if the
    /// capacity runs out.
    ///
    /// The length is bumped after every element so that a panicking iterator
    /// leaves everything built so far live and accounted for.
    fn fill_from<I>(&mut self, iter: I)
    where
        I: Iterator<Item = T>,
    {
        let room = self.capacity() - self.len;
        for element in iter.take(room) {
            // SAFETY: len < capacity, so the slot is in bounds and
            // uninitialized.
            unsafe { self.buffer.slot(self.len).write(element) };
            self.len += 1;
        }
    }
}

impl<T, P> DynamicArray<T, P>
where
    P: TransferPolicy<T>,
{
    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// Does nothing if the capacity is already sufficient. Otherwise the new
    /// buffer has room for exactly `new_capacity` elements, and the existing
    /// elements are carried over according to the transfer policy.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes. Allocator failure
    /// is reported through [`handle_alloc_error`].
    ///
    /// ```
    /// # use dynarr::dyn_array;
    /// let mut array = dyn_array![1];
    /// array.reserve(10);
    /// assert_eq!(array.capacity(), 10);
    /// array.reserve(4);
    /// assert_eq!(array.capacity(), 10);
    /// ```
    ///
    /// [`handle_alloc_error`]: std::alloc::handle_alloc_error
    pub fn reserve(&mut self, new_capacity: usize) {
        error::infallible(self.try_reserve(new_capacity))
    }

    /// Like [`reserve`](DynamicArray::reserve), but returns an error instead
    /// of panicking or aborting. On error the array is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let mut staging = Staging::<T, P>::allocate(new_capacity)?;
        // SAFETY: All len slots are live and the staging buffer is larger.
        unsafe { staging.append_from(self.buffer.as_ptr(), self.len) };
        self.commit(staging);
        Ok(())
    }

    /// Resizes the array so that its length equals `new_len`, filling new
    /// slots with default values.
    ///
    /// Growing past the capacity reserves exactly `new_len` first. Shrinking
    /// drops the tail and keeps the capacity.
    ///
    /// ```
    /// # use dynarr::DynamicArray;
    /// let mut array = DynamicArray::<i32>::new();
    /// array.resize(5);
    /// assert_eq!(array, [0; 5]);
    /// array.resize(2);
    /// assert_eq!(array, [0, 0]);
    /// assert_eq!(array.capacity(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resizes the array so that its length equals `new_len`, calling `f` to
    /// produce each new element.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        let missing = new_len - self.len;
        self.fill_from(iter::repeat_with(f).take(missing));
    }

    /// Appends an element.
    pub fn push(&mut self, value: T) {
        self.emplace_back(|| value);
    }

    /// Appends an element, returning an error if the array had to grow and
    /// could not.
    pub fn try_push(&mut self, value: T) -> Result<&mut T, TryReserveError> {
        let position = self.try_emplace(self.len, || value)?;
        // SAFETY: try_emplace just constructed this slot.
        Ok(unsafe { &mut *self.buffer.slot(position) })
    }

    /// Appends the element returned by `f` and returns a reference to it.
    ///
    /// When the array has to grow, `f` writes straight into the new buffer.
    ///
    /// ```
    /// # use dynarr::DynamicArray;
    /// let mut array = DynamicArray::new();
    /// let last = array.emplace_back(|| String::from("abc"));
    /// last.push('d');
    /// assert_eq!(array, ["abcd"]);
    /// ```
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let position = self.emplace(self.len, f);
        // SAFETY: emplace just constructed this slot.
        unsafe { &mut *self.buffer.slot(position) }
    }

    /// Inserts `value` at `position`, shifting everything after it to the
    /// right. Returns `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position > len`.
    pub fn insert(&mut self, position: usize, value: T) -> usize {
        self.emplace(position, || value)
    }

    /// Inserts the element returned by `f` at `position`. Returns `position`.
    ///
    /// If `f` panics, the array is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `position > len`.
    pub fn emplace<F>(&mut self, position: usize, f: F) -> usize
    where
        F: FnOnce() -> T,
    {
        error::infallible(self.try_emplace(position, f))
    }

    /// Like [`emplace`](DynamicArray::emplace), but returns an error if the
    /// array had to grow and could not. On error `f` is not called and the
    /// array is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `position > len`.
    pub fn try_emplace<F>(&mut self, position: usize, f: F) -> Result<usize, TryReserveError>
    where
        F: FnOnce() -> T,
    {
        assert!(
            position <= self.len,
            "insertion index (is {position}) should be <= len (is {})",
            self.len
        );

        if self.len == self.capacity() {
            // Build the new buffer around the new element so that it is
            // constructed once, in its final slot.
            let mut staging = Staging::<T, P>::allocate(self.grown_capacity()?)?;
            // SAFETY: [0, position) and [position, len) are live, and the
            // staging buffer has room for len + 1 elements.
            unsafe {
                staging.append_from(self.buffer.as_ptr(), position);
                staging.append_with(f);
                staging.append_from(self.buffer.slot(position), self.len - position);
            }
            self.commit(staging);
        } else if position < self.len {
            // Construct before touching storage so a panic changes nothing.
            let value = f();
            // SAFETY: len < capacity, so shifting [position, len) right by one
            // stays in bounds. The hole is then filled without dropping.
            unsafe {
                let hole = self.buffer.slot(position);
                ptr::copy(hole, hole.add(1), self.len - position);
                hole.write(value);
            }
            self.len += 1;
        } else {
            // SAFETY: position == len < capacity.
            unsafe { self.buffer.slot(position).write(f()) };
            self.len += 1;
        }

        Ok(position)
    }

    /// Drops the element at `position` and closes the gap. Returns
    /// `position`, which now holds the element that followed.
    ///
    /// Under [`Relocate`] the tail is moved left. Under [`Duplicate`] it is
    /// clone-assigned left and the vacated last slot is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len`.
    ///
    /// [`Duplicate`]: crate::Duplicate
    pub fn erase(&mut self, position: usize) -> usize {
        assert!(
            position < self.len,
            "removal index (is {position}) should be < len (is {})",
            self.len
        );
        // SAFETY: position < len and all len slots are live.
        let vacated = unsafe { P::close_gap(self.buffer.as_mut_ptr(), position, self.len) };
        self.len -= 1;
        drop(vacated);
        position
    }

    /// Reserves room for `additional` more elements, at least doubling the
    /// capacity when it has to grow.
    fn reserve_amortized(&mut self, additional: usize) {
        let Some(required) = self.len.checked_add(additional) else {
            TryReserveError::CapacityOverflow.escalate()
        };
        if required > self.capacity() {
            self.reserve(required.max(self.capacity().saturating_mul(2)));
        }
    }

    fn grown_capacity(&self) -> Result<usize, TryReserveError> {
        match self.capacity() {
            0 => Ok(1),
            capacity => capacity
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow),
        }
    }

    /// Adopts the staging buffer and releases the old one.
    fn commit(&mut self, mut staging: Staging<T, P>) {
        log::trace!(
            "{}: reallocating {} -> {} slots",
            P::NAME,
            self.capacity(),
            staging.buffer.capacity()
        );
        self.buffer.swap(&mut staging.buffer);
        staging.live = mem::replace(&mut self.len, staging.live);
        // Dropping the staging area now disposes of the originals: dropped
        // when they were duplicated, abandoned when they were relocated.
    }
}

/// A buffer being filled during growth, before the array commits to it.
///
/// Dropping it drops its `live` elements if the policy duplicates (they are
/// clones, or originals after a commit) and leaves them alone if it
/// relocates (they are bitwise copies of values owned elsewhere). The block
/// itself is always released.
struct Staging<T, P>
where
    P: TransferPolicy<T>,
{
    buffer: RawBuffer<T>,
    live: usize,
    _policy: PhantomData<fn() -> P>,
}

impl<T, P> Staging<T, P>
where
    P: TransferPolicy<T>,
{
    fn allocate(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            buffer: RawBuffer::try_allocate(capacity)?,
            live: 0,
            _policy: PhantomData,
        })
    }

    /// # Safety
    ///
    /// `src..src + count` must be live and `live + count <= capacity`.
    unsafe fn append_from(&mut self, src: *const T, count: usize) {
        // SAFETY: Forwarded to the caller. A different allocation, so no
        // overlap.
        unsafe { P::transfer(src, self.buffer.slot(self.live), count) };
        self.live += count;
    }

    /// # Safety
    ///
    /// `live < capacity`.
    unsafe fn append_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        // SAFETY: Forwarded to the caller.
        unsafe { self.buffer.slot(self.live).write(f()) };
        self.live += 1;
    }
}

impl<T, P> Drop for Staging<T, P>
where
    P: TransferPolicy<T>,
{
    fn drop(&mut self) {
        if !P::RELOCATES {
            // SAFETY: The first live slots hold values this staging area owns.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.buffer.as_mut_ptr(),
                    self.live,
                ));
            }
        }
    }
}

impl<T, P> Drop for DynamicArray<T, P> {
    fn drop(&mut self) {
        // SAFETY: Exactly the live elements are dropped. The buffer releases
        // its block on its own afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T, P> Clone for DynamicArray<T, P>
where
    T: Clone,
{
    /// Clones every element into a buffer of exactly `len` slots.
    fn clone(&self) -> Self {
        let mut copy = Self {
            buffer: RawBuffer::allocate(self.len),
            len: 0,
            _policy: PhantomData,
        };
        copy.fill_from(self.iter().cloned());
        copy
    }

    /// Reuses the existing storage when it is large enough, overwriting the
    /// common prefix and constructing or dropping the rest. Otherwise clones
    /// `source` in full and only then replaces `self`.
    ///
    /// ```
    /// # use dynarr::DynamicArray;
    /// let source: DynamicArray<_> = (0..10).collect();
    /// let mut target = DynamicArray::with_capacity(20);
    /// target.extend([7, 8, 9]);
    /// target.clone_from(&source);
    /// assert_eq!(target, source);
    /// assert_eq!(target.capacity(), 20);
    /// ```
    fn clone_from(&mut self, source: &Self) {
        if self.capacity() < source.len {
            *self = source.clone();
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);
        if self.len > source.len {
            self.truncate(source.len);
        } else {
            self.fill_from(source[common..].iter().cloned());
        }
    }
}

impl<T, P> Default for DynamicArray<T, P> {
    fn default() -> Self {
        Self {
            buffer: RawBuffer::new(),
            len: 0,
            _policy: PhantomData,
        }
    }
}

impl<T, P> Deref for DynamicArray<T, P> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, P> DerefMut for DynamicArray<T, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, P> AsRef<[T]> for DynamicArray<T, P> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P> AsMut<[T]> for DynamicArray<T, P> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, P> Debug for DynamicArray<T, P>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, P> Hash for DynamicArray<T, P>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, P> PartialOrd for DynamicArray<T, P>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T, P> Ord for DynamicArray<T, P>
where
    T: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T, P> Extend<T> for DynamicArray<T, P>
where
    P: TransferPolicy<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve_amortized(iter.size_hint().0);
        for element in iter {
            self.push(element);
        }
    }
}

impl<'a, T, P> Extend<&'a T> for DynamicArray<T, P>
where
    T: 'a + Copy,
    P: TransferPolicy<T>,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, P> FromIterator<T> for DynamicArray<T, P>
where
    P: TransferPolicy<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::default();
        out.extend(iter);
        out
    }
}

impl<T, P> IntoIterator for DynamicArray<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut me = ManuallyDrop::new(self);
        let len = me.len;
        // SAFETY: The elements are handed over with the buffer and the array
        // is never dropped.
        unsafe { IntoIter::new(me.buffer.take(), len) }
    }
}

impl<'a, T, P> IntoIterator for &'a DynamicArray<T, P> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, P> IntoIterator for &'a mut DynamicArray<T, P> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, P> From<Vec<T>> for DynamicArray<T, P>
where
    P: TransferPolicy<T>,
{
    fn from(value: Vec<T>) -> Self {
        value.into_iter().collect()
    }
}

impl<T, P, const N: usize> From<[T; N]> for DynamicArray<T, P>
where
    P: TransferPolicy<T>,
{
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}
