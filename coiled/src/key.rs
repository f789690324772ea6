/// Identity used to share one animation between several mounts.
///
/// Any `Hash + Eq + Clone` value works: a list item id, a string, a tuple.
pub trait LayoutKey: core::hash::Hash + Eq + Clone {}
impl<T: core::hash::Hash + Eq + Clone> LayoutKey for T {}
