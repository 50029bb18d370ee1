/// Creates a [`DynamicArray`] containing the arguments, like [`vec!`].
///
/// ```
/// # use dynarr::dyn_array;
/// let listed = dyn_array![1, 2, 3];
/// assert_eq!(listed, [1, 2, 3]);
///
/// let repeated = dyn_array![String::from("x"); 2];
/// assert_eq!(repeated, ["x", "x"]);
/// assert_eq!(repeated.capacity(), 2);
/// ```
///
/// [`DynamicArray`]: crate::DynamicArray
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynamicArray::new()
    };

    ($element:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($element, $n)
    };

    ($($element:expr),+ $(,)?) => {
        <$crate::DynamicArray<_> as ::core::iter::FromIterator<_>>::from_iter([$($element),+])
    };
}
