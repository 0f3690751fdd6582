use crate::core::types::TickerItem;

/// Trimmed, upper-cased form of a query; the index is matched against this.
pub fn normalize(query: &str) -> String {
    query.trim().to_uppercase()
}

/// Ranks `index` against `query`: every display that starts with the query comes
/// before every display that merely contains it, each group keeps index order,
/// and the result is cut at `cap`.
pub fn rank(query: &str, index: &[TickerItem], cap: usize) -> Vec<TickerItem> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut starts_with = Vec::new();
    let mut contains = Vec::new();
    for item in index {
        let display = item.display.to_uppercase();
        if display.starts_with(&needle) {
            starts_with.push(item);
        } else if display.contains(&needle) {
            contains.push(item);
        }
        if starts_with.len() >= cap {
            break;
        }
    }

    starts_with
        .into_iter()
        .chain(contains)
        .take(cap)
        .cloned()
        .collect()
}
