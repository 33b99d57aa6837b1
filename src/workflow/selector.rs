//! 高分卡片选择
//!
//! 按重要性降序做稳定排序，取前 `floor(总数 × 比例)` 张

use crate::models::{ScoredCard, SelectionResult};

/// 应保留的卡片数量：`floor(total × fraction)`
pub fn cutoff_count(total: usize, fraction: f64) -> usize {
    (total as f64 * fraction).floor() as usize
}

/// 选出重要性最高的一部分卡片
///
/// 同分卡片保持输入顺序
pub fn select_top(cards: &[ScoredCard], fraction: f64) -> SelectionResult {
    let mut ranked: Vec<&ScoredCard> = cards.iter().collect();
    ranked.sort_by(|a, b| b.importance.cmp(&a.importance));

    let cutoff = cutoff_count(cards.len(), fraction);
    SelectionResult::new(ranked.iter().take(cutoff).map(|card| card.id).collect())
}
