use super::model::Dataset;

// ---------------------------------------------------------------------------
// Pure row filters
// ---------------------------------------------------------------------------
//
// Every filter returns row indices into `dataset.rows`; callers render them
// with `Dataset::records`.

/// All rows, in file order.
pub fn all_indices(dataset: &Dataset) -> Vec<usize> {
    (0..dataset.len()).collect()
}

/// The first `n` rows in file order.
pub fn head_indices(dataset: &Dataset, n: usize) -> Vec<usize> {
    (0..dataset.len().min(n)).collect()
}

/// Rows whose `id` lies in `[1, end_id]`, ascending by `id`.
///
/// Rows without a numeric id never match. Ties keep file order.
pub fn id_range_indices(dataset: &Dataset, end_id: i64) -> Vec<usize> {
    if end_id < 1 {
        return Vec::new();
    }
    let mut hits: Vec<(i64, usize)> = (0..dataset.len())
        .filter_map(|i| dataset.row_id(i).map(|id| (id, i)))
        .filter(|&(id, _)| (1..=end_id).contains(&id))
        .collect();
    hits.sort_by_key(|&(id, _)| id);
    hits.into_iter().map(|(_, i)| i).collect()
}

/// The first row whose `id` equals `id`.
pub fn find_by_id(dataset: &Dataset, id: i64) -> Option<usize> {
    (0..dataset.len()).find(|&i| dataset.row_id(i) == Some(id))
}

/// Rows where any cell's source text contains `keyword`, ignoring case.
/// An empty keyword matches every row; blank cells never match a non-empty one.
pub fn keyword_indices(dataset: &Dataset, keyword: &str) -> Vec<usize> {
    if keyword.is_empty() {
        return all_indices(dataset);
    }
    let needle = keyword.to_lowercase();
    (0..dataset.len())
        .filter(|&i| {
            dataset
                .row_text(i)
                .iter()
                .any(|text| text.to_lowercase().contains(&needle))
        })
        .collect()
}
