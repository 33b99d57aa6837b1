//! 卡片评分流程 - 流程层
//!
//! 核心职责：把每张 `CardRecord` 变成 `ScoredCard`
//!
//! 流程顺序（每张卡片）：
//! 1. 输出进度 `Evaluating card i/total`
//! 2. 调用评分能力 → 量表校验
//! 3. 失败时按配置重试，重试用尽后中止或跳过
//!
//! 所有卡片评分完成后才返回，结果顺序与输入顺序一致（与并发数无关）

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, error, warn};

use crate::config::{Config, RatingFailurePolicy};
use crate::error::{AppError, AppResult, LlmError};
use crate::models::{CardRecord, RatingScale, ScoredCard};
use crate::services::ImportanceRater;

/// 单张卡片的处理结果
#[derive(Debug)]
enum CardOutcome {
    Scored(ScoredCard),
    Skipped(CardRecord),
}

/// 一次评分运行的结果
#[derive(Debug, Default)]
pub struct ScoringOutcome {
    /// 与输入顺序一致
    pub scored: Vec<ScoredCard>,
    /// 仅在 `RatingFailurePolicy::Skip` 下非空
    pub skipped: Vec<CardRecord>,
}

/// 评分流程
///
/// - 不持有卡片，只持有评分能力和策略
/// - 同时最多 `max_concurrent` 个请求在途
pub struct Scorer<R> {
    rater: R,
    scale: RatingScale,
    max_concurrent: usize,
    retries: u32,
    on_failure: RatingFailurePolicy,
}

impl<R: ImportanceRater> Scorer<R> {
    pub fn new(rater: R, config: &Config) -> Self {
        Self {
            rater,
            scale: config.rating_scale,
            max_concurrent: config.max_concurrent_requests.max(1),
            retries: config.rating_retries,
            on_failure: config.on_rating_failure,
        }
    }

    /// 为所有卡片评分
    ///
    /// 中止策略下，第一张重试用尽的卡片会让整个运行失败，之前的评分全部丢弃
    pub async fn score_all(&self, cards: Vec<CardRecord>) -> AppResult<ScoringOutcome> {
        let total = cards.len();

        let outcomes: Vec<CardOutcome> = stream::iter(cards.into_iter().enumerate())
            .map(|(idx, card)| self.score_card(idx + 1, total, card))
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let mut result = ScoringOutcome::default();
        for outcome in outcomes {
            match outcome {
                CardOutcome::Scored(card) => result.scored.push(card),
                CardOutcome::Skipped(card) => result.skipped.push(card),
            }
        }

        Ok(result)
    }

    async fn score_card(
        &self,
        index: usize,
        total: usize,
        card: CardRecord,
    ) -> AppResult<CardOutcome> {
        println!("Evaluating card {}/{}", index, total);

        let mut attempt = 0;
        loop {
            match self.rate_checked(&card.content).await {
                Ok(importance) => {
                    debug!("[卡片 {}] ✓ 评分: {}", card.id, importance);
                    return Ok(CardOutcome::Scored(ScoredCard::new(card, importance)));
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "[卡片 {}] ⚠️ 评分失败: {}，重试 {}/{}",
                        card.id, e, attempt, self.retries
                    );
                }
                Err(e) => return self.give_up(card, e),
            }
        }
    }

    async fn rate_checked(&self, content: &str) -> Result<i64, LlmError> {
        let rating = self.rater.rate(content).await?;

        if self.scale.contains(rating) {
            Ok(rating)
        } else {
            Err(LlmError::RatingOutOfRange {
                rating,
                min: self.scale.min,
                max: self.scale.max,
            })
        }
    }

    fn give_up(&self, card: CardRecord, source: LlmError) -> AppResult<CardOutcome> {
        match self.on_failure {
            RatingFailurePolicy::Abort => {
                error!("[卡片 {}] ❌ 评分失败，运行中止: {}", card.id, source);
                Err(AppError::Rating {
                    note_id: card.id,
                    source,
                })
            }
            RatingFailurePolicy::Skip => {
                warn!("[卡片 {}] ⏭️ 评分失败，跳过: {}", card.id, source);
                Ok(CardOutcome::Skipped(card))
            }
        }
    }
}
