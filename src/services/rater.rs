//! 重要性评分能力 - 业务能力层
//!
//! 只回答"这段卡片内容值几分"，不负责量表校验、重试和进度

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::LlmError;
use crate::models::RatingScale;
use crate::services::llm_service::{GenerationParams, LlmService};
use crate::utils::logging::truncate_text;

/// 评分能力接口
///
/// 测试中可以用确定性的实现替换真实的 LLM
#[async_trait]
pub trait ImportanceRater: Send + Sync {
    /// 返回卡片内容的重要性评分（未经量表校验的整数）
    async fn rate(&self, content: &str) -> Result<i64, LlmError>;
}

#[async_trait]
impl<T: ImportanceRater + ?Sized> ImportanceRater for Arc<T> {
    async fn rate(&self, content: &str) -> Result<i64, LlmError> {
        (**self).rate(content).await
    }
}

/// 基于 Claude 的评分实现
pub struct ClaudeRater {
    llm_service: LlmService,
    scale: RatingScale,
}

impl ClaudeRater {
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
            scale: config.rating_scale,
        }
    }
}

#[async_trait]
impl ImportanceRater for ClaudeRater {
    async fn rate(&self, content: &str) -> Result<i64, LlmError> {
        debug!("评分卡片: {}", truncate_text(content, 60));

        let prompt = build_rating_prompt(content, self.scale);
        let response = self
            .llm_service
            .send_to_llm(&prompt, None, GenerationParams::RATING)
            .await?;

        parse_rating(&response)
    }
}

/// 构建评分提示词
pub fn build_rating_prompt(content: &str, scale: RatingScale) -> String {
    format!(
        "As an educational content expert, rate the importance of this flashcard \
         from {}-{} based on its educational value and knowledge fundamentality.\n\
         Only respond with a single number.\n\n\
         Card content: {}",
        scale.min, scale.max, content
    )
}

/// 把 LLM 响应解析为整数评分
///
/// 只接受一个整数（允许首尾空白），不从文字中猜测数字
pub fn parse_rating(response: &str) -> Result<i64, LlmError> {
    response
        .trim()
        .parse::<i64>()
        .map_err(|_| LlmError::NotANumber {
            response: response.to_string(),
        })
}
