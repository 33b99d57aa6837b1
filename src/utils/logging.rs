/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::orchestrator::RunSummary;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
/// - `deck_path`: 牌组文件路径
pub fn log_startup(config: &Config, deck_path: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 卡片重要性评估");
    info!("📦 牌组: {}", deck_path);
    info!(
        "🤖 模型: {} | 📊 最大并发数: {}",
        config.llm_model_name, config.max_concurrent_requests
    );
    info!("{}", "=".repeat(60));
}

/// 记录牌组加载信息
///
/// # 参数
/// - `total`: 卡片总数
/// - `config`: 当前配置
pub fn log_deck_loaded(total: usize, config: &Config) {
    info!("✓ 找到 {} 张待评分的卡片", total);
    info!(
        "📋 评分范围 {}-{}，保留前 {:.0}%",
        config.rating_scale.min,
        config.rating_scale.max,
        config.selection_fraction * 100.0
    );
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已评分: {}/{}", summary.scored, summary.total_cards);
    info!("⏭️ 跳过: {}", summary.skipped);
    info!("⭐ 选中: {}", summary.selection.len());
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", summary.output_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
