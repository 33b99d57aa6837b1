use std::path::PathBuf;

use anki_prioritizer::{logger, App, Config};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 读取牌组路径
    let Some(deck_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Please provide the path to your .apkg file as a command line argument");
        eprintln!("Usage: anki_prioritizer <deck.apkg>");
        std::process::exit(1);
    };

    // 加载配置（缺少 ANTHROPIC_API_KEY 时在任何网络请求之前失败）
    let config = Config::from_env()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).run(&deck_path).await?;

    Ok(())
}
