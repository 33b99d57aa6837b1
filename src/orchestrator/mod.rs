//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! deck (Vec<CardRecord>)
//!     ↓
//! workflow::Scorer → workflow::selector
//!     ↓
//! services (能力层：llm / rater / output)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单向数据流**：读取 → 评分 → 选择 → 写入，没有回路
//! 2. **依赖注入**：评分能力由外部传入，测试时可替换
//! 3. **无业务逻辑**：只做调度和统计

pub mod app;

pub use app::{anki_instructions, App, RunSummary};
