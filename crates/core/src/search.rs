use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::render::Chart;

/// Indices of tiles whose name matches `needle`, best match first.
pub fn find_tiles(chart: &Chart, needle: &str) -> Vec<usize> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }
    let m = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<(i64, usize)> = chart
        .tiles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| m.fuzzy_match(&t.name, needle).map(|score| (score, i)))
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    hits.into_iter().map(|(_, i)| i).collect()
}
