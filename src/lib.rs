//! # Anki Prioritizer
//!
//! 读取 Anki 牌组导出（`.apkg`），让 Claude 为每张卡片的重要性打分，
//! 并把得分最高的一部分笔记 ID 写入文件
//!
//! ## 架构设计
//!
//! ### ① 数据来源（Deck）
//! - `deck/` - 解压 `.apkg`，从 SQLite 集合中读出 `CardRecord`
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 调用 LLM 的能力
//! - `ImportanceRater` / `ClaudeRater` - "给一段内容打分"的能力
//! - `OutputWriter` - 写结果文件的能力
//!
//! ### ③ 流程层（Workflow）
//! - `Scorer` - 逐张评分（量表校验、重试、跳过/中止）
//! - `selector` - 稳定排序后取前 20%
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 串起 读取 → 评分 → 选择 → 写入
//!
//! ## 模块结构

pub mod config;
pub mod deck;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, RatingFailurePolicy};
pub use error::{AppError, AppResult};
pub use models::{CardRecord, NoteId, RatingScale, ScoredCard, SelectionResult};
pub use orchestrator::{App, RunSummary};
pub use services::{ClaudeRater, ImportanceRater};
pub use workflow::{select_top, Scorer};
