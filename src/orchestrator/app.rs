//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 按顺序执行 读取牌组 → 评分 → 选择 → 写文件，并输出控制台提示。
//! 不处理单张卡片的细节，向下委托给 `deck` / `workflow` / `services`。

use std::path::Path;

use crate::config::Config;
use crate::deck;
use crate::error::AppResult;
use crate::models::SelectionResult;
use crate::services::{ClaudeRater, ImportanceRater, OutputWriter};
use crate::utils::logging::{log_deck_loaded, log_startup, print_final_stats};
use crate::workflow::{select_top, Scorer};

/// 一次运行的统计结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_cards: usize,
    pub scored: usize,
    pub skipped: usize,
    pub selection: SelectionResult,
    pub output_path: String,
}

/// 应用主结构
pub struct App<R> {
    config: Config,
    scorer: Scorer<R>,
    writer: OutputWriter,
}

impl App<ClaudeRater> {
    /// 使用 Claude 评分初始化应用
    pub fn initialize(config: Config) -> Self {
        let rater = ClaudeRater::new(&config);
        Self::with_rater(config, rater)
    }
}

impl<R: ImportanceRater> App<R> {
    /// 使用指定的评分能力初始化应用
    pub fn with_rater(config: Config, rater: R) -> Self {
        Self {
            scorer: Scorer::new(rater, &config),
            writer: OutputWriter::with_path(config.output_file.clone()),
            config,
        }
    }

    /// 运行应用主逻辑
    ///
    /// 任何一步失败都会直接返回错误，输出文件只在最后写一次
    pub async fn run(&self, deck_path: &Path) -> AppResult<RunSummary> {
        let deck_name = deck_path.display().to_string();
        log_startup(&self.config, &deck_name);
        println!("Processing deck: {}", deck_name);

        let cards = deck::load_deck(deck_path).await?;
        let total_cards = cards.len();
        println!("Found {} cards", total_cards);
        log_deck_loaded(total_cards, &self.config);

        let outcome = self.scorer.score_all(cards).await?;

        // 比例按成功评分的卡片数计算
        let selection = select_top(&outcome.scored, self.config.selection_fraction);
        let written = self.writer.write(&selection).await?;

        println!(
            "Saved {} important note IDs to {}",
            written,
            self.writer.path()
        );
        println!("{}", anki_instructions(&selection));

        let summary = RunSummary {
            total_cards,
            scored: outcome.scored.len(),
            skipped: outcome.skipped.len(),
            selection,
            output_path: self.writer.path().to_string(),
        };
        print_final_stats(&summary);

        Ok(summary)
    }
}

/// 在 Anki 中使用结果的说明
pub fn anki_instructions(selection: &SelectionResult) -> String {
    let search = if selection.is_empty() {
        "(no cards selected)".to_string()
    } else {
        selection.search_query()
    };

    format!(
        "\nTo use these in Anki:\n\
         1. Open Anki's browser\n\
         2. Search for: {}\n\
         3. Select all other cards (Ctrl+A, then Ctrl+Shift+A)\n\
         4. Press Ctrl+J to suspend the unimportant cards",
        search
    )
}
