// Category-balanced sampling.
//
// Heavily populated sub-categories must not crowd out small ones when a
// query spans the whole collection: every group gets an equal quota and a
// random draw within it. The final shuffle exists so that the concatenation
// order of groups does not leak into the output order.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::types::{ImageDescriptor, SortOrder};

/// Group label for records whose folder path has no sub-category segment.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Sub-category of a folder path: the second path segment, or
/// [`UNCATEGORIZED`] when there is none.
pub fn category_of(folder: &str) -> &str {
    folder
        .split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(UNCATEGORIZED)
}

/// Draw an approximately category-balanced sample of up to `target`
/// descriptors.
///
/// Each distinct category contributes at most `ceil(target / k)` members,
/// chosen by unbiased shuffle. A group smaller than its quota contributes
/// everything it has; the deficit is not backfilled from other groups, so
/// the result may be shorter than `target`.
pub fn balance(records: Vec<ImageDescriptor>, target: usize) -> Vec<ImageDescriptor> {
    if records.is_empty() || target == 0 {
        return Vec::new();
    }

    let mut groups: HashMap<String, Vec<ImageDescriptor>> = HashMap::new();
    for record in records {
        groups
            .entry(record.category.clone())
            .or_default()
            .push(record);
    }

    let group_count = groups.len();
    let quota = target.div_ceil(group_count);

    let mut rng = rand::rng();
    let mut sampled = Vec::with_capacity(target);
    for members in groups.values_mut() {
        members.shuffle(&mut rng);
        sampled.extend(members.drain(..members.len().min(quota)));
    }

    // Second shuffle: category order must not survive into the output.
    sampled.shuffle(&mut rng);
    sampled.truncate(target);

    debug!(
        groups = group_count,
        quota,
        sampled = sampled.len(),
        "Balanced sample drawn"
    );
    sampled
}

/// Impose the requested deterministic order on an already-sampled set.
/// Stable: ties keep their provider-relative order. `Random` is a no-op
/// here; randomization happened in [`balance`].
pub fn sort_descriptors(items: &mut [ImageDescriptor], sort: SortOrder) {
    match sort {
        SortOrder::Random => {}
        SortOrder::Newest => items.sort_by_key(|d| std::cmp::Reverse(d.created_at)),
        SortOrder::Oldest => items.sort_by_key(|d| d.created_at),
        SortOrder::Name => items.sort_by_key(|d| d.filename.to_lowercase()),
    }
}
