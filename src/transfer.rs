use std::ptr;

/// Decides how live elements travel between buffers and how [`erase`] closes
/// the gap it leaves.
///
/// Moving an element to new storage can be done two ways:
///
/// - *Relocation* copies the bytes and treats the old slot as uninitialized.
///   It cannot fail and costs nothing beyond the copy.
/// - *Duplication* clones into the new slot and leaves the original live
///   until every clone succeeded, so a panicking [`Clone`] leaves the source
///   exactly as it was.
///
/// Moves in Rust never fail, which makes [`Relocate`] correct for every type
/// and the default of [`DynamicArray`]. [`Duplicate`] is for callers that
/// want the clone-then-commit path explicitly.
///
/// # Safety
///
/// Implementations must uphold the contracts documented on each method.
/// [`DynamicArray`] relies on them to never drop a value twice nor read an
/// uninitialized slot.
///
/// [`erase`]: crate::DynamicArray::erase
/// [`DynamicArray`]: crate::DynamicArray
pub unsafe trait TransferPolicy<T> {
    /// Whether [`transfer`] leaves the source slots logically uninitialized.
    ///
    /// When `false`, the source slots are still live after a transfer and the
    /// caller must drop them once it commits to the new storage.
    ///
    /// [`transfer`]: TransferPolicy::transfer
    const RELOCATES: bool;

    /// A short name for diagnostics.
    const NAME: &'static str;

    /// Transfers `count` live elements from `src` into the uninitialized
    /// slots at `dst`.
    ///
    /// If this panics, every element written to `dst` has already been
    /// dropped and `src` is untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure that
    ///
    /// - `src..src + count` are live elements
    /// - `dst..dst + count` are valid for writes and do not overlap `src`
    unsafe fn transfer(src: *const T, dst: *mut T, count: usize);

    /// Closes the gap at `position` in the `len` live elements at `base`.
    ///
    /// On return, `base..base + len - 1` hold the sequence without the
    /// element at `position`, and slot `len - 1` is logically uninitialized.
    /// The returned value is what must be dropped to finish the erase. It
    /// should be dropped only after the caller has shortened its length, so
    /// that a panicking destructor cannot observe a stale slot.
    ///
    /// If this panics, all `len` slots are still live.
    ///
    /// # Safety
    ///
    /// The caller must ensure that
    ///
    /// - `position < len`
    /// - `base..base + len` are live elements
    unsafe fn close_gap(base: *mut T, position: usize, len: usize) -> T;
}

/// Transfers elements by moving their bytes. Valid for every `T`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relocate;

unsafe impl<T> TransferPolicy<T> for Relocate {
    const RELOCATES: bool = true;
    const NAME: &'static str = "relocate";

    unsafe fn transfer(src: *const T, dst: *mut T, count: usize) {
        // SAFETY: Caller guarantees both ranges are valid and disjoint.
        unsafe { ptr::copy_nonoverlapping(src, dst, count) };
    }

    unsafe fn close_gap(base: *mut T, position: usize, len: usize) -> T {
        // SAFETY: Caller guarantees position < len and that all len slots are
        // live, so the element can be read out and the tail slid over it.
        unsafe {
            let hole = base.add(position);
            let erased = ptr::read(hole);
            ptr::copy(hole.add(1), hole, len - position - 1);
            erased
        }
    }
}

/// Transfers elements by cloning them, keeping the originals live until the
/// caller commits.
///
/// Erase closes its gap with [`Clone::clone_from`], so every element keeps
/// a valid value even if one of those assignments panics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duplicate;

unsafe impl<T> TransferPolicy<T> for Duplicate
where
    T: Clone,
{
    const RELOCATES: bool = false;
    const NAME: &'static str = "duplicate";

    unsafe fn transfer(src: *const T, dst: *mut T, count: usize) {
        let mut written = PartialInit::new(dst);
        for i in 0..count {
            // SAFETY: Caller guarantees src + i is live and dst + i writable.
            unsafe { dst.add(i).write((*src.add(i)).clone()) };
            written.advance();
        }
        written.commit();
    }

    unsafe fn close_gap(base: *mut T, position: usize, len: usize) -> T {
        for i in position..len - 1 {
            // SAFETY: Both slots are live and distinct.
            unsafe { (*base.add(i)).clone_from(&*base.add(i + 1)) };
        }
        // SAFETY: The last slot is live; the caller treats it as vacated.
        unsafe { ptr::read(base.add(len - 1)) }
    }
}

/// Drops the first `initialized` elements at `start` unless committed.
///
/// Used while filling fresh storage element by element, so that a panic
/// halfway through does not leak what was already written.
pub(crate) struct PartialInit<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> PartialInit<T> {
    pub(crate) fn new(start: *mut T) -> Self {
        Self {
            start,
            initialized: 0,
        }
    }

    /// Records that the next slot has been written.
    pub(crate) fn advance(&mut self) {
        self.initialized += 1;
    }

    /// Hands ownership of the written elements to the caller.
    pub(crate) fn commit(self) {
        std::mem::forget(self);
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly the first `initialized` slots were written.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.start,
                self.initialized,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;

    #[test]
    fn relocate_closes_gap() {
        let mut items = [1, 2, 3, 4].map(|i| i.to_string());
        let base = items.as_mut_ptr();
        let erased = unsafe { <Relocate as TransferPolicy<String>>::close_gap(base, 1, 4) };
        assert_eq!(erased, "2");
        assert_eq!(&items[..3], ["1", "3", "4"]);
        // Slot 3 is now a bitwise duplicate of slot 2; keep it from being
        // dropped twice.
        unsafe { ptr::write(&mut items[3], String::new()) };
    }

    #[test]
    fn duplicate_closes_gap_with_clone_from() {
        let mut items = [1, 2, 3, 4].map(|i| i.to_string());
        let base = items.as_mut_ptr();
        let vacated = unsafe { <Duplicate as TransferPolicy<String>>::close_gap(base, 0, 4) };
        assert_eq!(vacated, "4");
        assert_eq!(&items[..3], ["2", "3", "4"]);
        unsafe { ptr::write(&mut items[3], String::new()) };
    }

    #[test]
    fn partial_init_drops_written_prefix() {
        let marker = std::rc::Rc::new(());
        let mut slots = [const { MaybeUninit::<std::rc::Rc<()>>::uninit() }; 3];
        let start = slots.as_mut_ptr().cast::<std::rc::Rc<()>>();
        let mut written = PartialInit::new(start);
        for i in 0..2 {
            unsafe { start.add(i).write(std::rc::Rc::clone(&marker)) };
            written.advance();
        }
        assert_eq!(std::rc::Rc::strong_count(&marker), 3);
        drop(written);
        assert_eq!(std::rc::Rc::strong_count(&marker), 1);
    }

    #[test]
    fn duplicate_leaves_originals_live() {
        let src = [String::from("a"), String::from("b")];
        let mut dst = [const { MaybeUninit::<String>::uninit() }; 2];
        unsafe {
            <Duplicate as TransferPolicy<String>>::transfer(
                src.as_ptr(),
                dst.as_mut_ptr().cast(),
                2,
            );
            assert_eq!(dst[0].assume_init_read(), "a");
            assert_eq!(dst[1].assume_init_read(), "b");
        }
        assert_eq!(src, ["a", "b"]);
    }
}
