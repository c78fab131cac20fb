//! Filtering traits.

/// Stateless filter: the verdict only depends on the item.
pub trait Filter<T>: Default {
    /// `true` if the item is kept.
    fn detect(&self, item: T) -> bool;
}

/// Stateful filter: the verdict may depend on previously seen items
/// (see [super::SeenHashes]).
pub trait FilterMut<T>: Default {
    /// `true` if the item is kept.
    fn detect_mut(&mut self, item: T) -> bool;
}
