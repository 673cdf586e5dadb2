//! Color reduction - collapses a tile's pixels into one representative color.

use crate::tile::TileView;
use image::Rgba;
use serde::Deserialize;
use std::collections::HashMap;

/// Signature shared by every reduction strategy
pub type ReduceFn = fn(&TileView<'_>) -> Rgba<u8>;

/// Reduction strategy, picked once from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReduceMode {
    /// Per-channel arithmetic mean
    #[default]
    Mean,
    /// Most frequent exact color, first seen wins ties
    MostCommon,
    /// Per-channel root mean square, keeps bright regions from washing out
    Quadratic,
}

impl ReduceMode {
    pub fn function(self) -> ReduceFn {
        match self {
            ReduceMode::Mean => mean,
            ReduceMode::MostCommon => most_common,
            ReduceMode::Quadratic => quadratic,
        }
    }
}

pub fn mean(view: &TileView<'_>) -> Rgba<u8> {
    let mut sums = [0u64; 4];
    let mut count = 0u64;
    for p in view.pixels() {
        for (sum, &c) in sums.iter_mut().zip(p.0.iter()) {
            *sum += c as u64;
        }
        count += 1;
    }
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }
    // Round half up
    Rgba(sums.map(|s| ((s + count / 2) / count) as u8))
}

pub fn most_common(view: &TileView<'_>) -> Rgba<u8> {
    // color -> (count, index of first appearance)
    let mut counts: HashMap<Rgba<u8>, (usize, usize)> = HashMap::with_capacity(view.len());
    for (i, p) in view.pixels().enumerate() {
        counts.entry(p).or_insert((0, i)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (n, first)), (_, (m, other))| n.cmp(m).then(other.cmp(first)))
        .map(|(color, _)| color)
        .unwrap_or(Rgba([0, 0, 0, 255]))
}

pub fn quadratic(view: &TileView<'_>) -> Rgba<u8> {
    let mut sums = [0u64; 4];
    let mut count = 0u64;
    for p in view.pixels() {
        for (sum, &c) in sums.iter_mut().zip(p.0.iter()) {
            *sum += c as u64 * c as u64;
        }
        count += 1;
    }
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }
    Rgba(sums.map(|s| ((s as f64 / count as f64).sqrt() as u32).min(255) as u8))
}
