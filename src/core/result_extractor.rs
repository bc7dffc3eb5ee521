/*
 * Converts the native items returned by an accepted dialog into display-form
 * path strings. Every per-item native reference acquired here is owned by a
 * local binding and released when it goes out of scope, on every path.
 */
use crate::core::error::Result;
use crate::core::native::{NativeItem, NativeItemCollection};

/*
 * Walks `collection` in native order and collects each item's display name.
 * Items that produce no name are skipped rather than represented by a
 * placeholder. Failure to read the count or fetch an item is an error.
 */
pub fn extract_all<C: NativeItemCollection>(collection: &C) -> Result<Vec<String>> {
    let count = collection.count()?;
    let mut paths = Vec::with_capacity(count as usize);

    for index in 0..count {
        let item = collection.item_at(index)?;
        match extract_one(Some(item)) {
            Some(path) => paths.push(path),
            None => log::debug!("ResultExtractor: Item {index} has no display name; skipping."),
        }
    }

    log::debug!(
        "ResultExtractor: Extracted {} of {} selected items.",
        paths.len(),
        count
    );
    Ok(paths)
}

/// Display name of a single item, `None` if the item is absent or unnamed.
/// Takes ownership so the native reference is released before returning.
pub fn extract_one<I: NativeItem>(item: Option<I>) -> Option<String> {
    let item = item?;
    item.display_name().filter(|name| !name.is_empty())
}
