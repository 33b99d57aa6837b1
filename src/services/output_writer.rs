//! 结果写入服务 - 业务能力层
//!
//! 只负责"把选中的笔记 ID 写到文件"能力，不关心排序和流程

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::SelectionResult;

/// 结果写入服务
///
/// 职责：
/// - 每行写一个笔记 ID，覆盖已有文件
/// - 空结果也会创建（清空）文件
pub struct OutputWriter {
    output_path: String,
}

impl OutputWriter {
    /// 使用默认文件名创建
    pub fn new() -> Self {
        Self {
            output_path: "important_card_nids.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            output_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.output_path
    }

    /// 写入选择结果
    ///
    /// # 返回
    /// 返回写入的 ID 数量
    pub async fn write(&self, selection: &SelectionResult) -> AppResult<usize> {
        debug!("写入 {} 个笔记 ID 到 {}", selection.len(), self.output_path);

        tokio::fs::write(&self.output_path, selection.to_lines())
            .await
            .map_err(|e| AppError::file_write_failed(&self.output_path, e))?;

        Ok(selection.len())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}
