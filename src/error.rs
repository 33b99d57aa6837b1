use thiserror::Error;

use crate::models::NoteId;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 牌组文件错误
    #[error("牌组错误: {0}")]
    Deck(#[from] DeckError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 单张卡片评分失败（重试用尽）
    #[error("卡片 {note_id} 评分失败: {source}")]
    Rating {
        note_id: NoteId,
        #[source]
        source: LlmError,
    },
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 后台任务异常退出
    #[error("后台任务失败: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 取值非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件 TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 牌组（.apkg）读取错误
#[derive(Debug, Error)]
pub enum DeckError {
    /// 文件不存在
    #[error("牌组文件不存在: {path}")]
    NotFound { path: String },
    /// 不是合法的 zip 压缩包
    #[error("无法打开牌组压缩包 ({path}): {source}")]
    InvalidArchive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    /// 压缩包内没有集合数据库
    #[error("牌组 {path} 中没有 collection.anki2 / collection.anki21")]
    MissingCollection { path: String },
    /// 只有新版 zstd 压缩的集合
    #[error("牌组 {path} 只包含 {entry}，请在导出时勾选兼容旧版 Anki")]
    UnsupportedFormat { path: String, entry: String },
    /// SQLite 查询失败
    #[error("读取集合数据库失败: {0}")]
    Database(#[from] rusqlite::Error),
    /// 解压或临时文件 IO 失败
    #[error("解压集合数据库失败: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {0}")]
    RequestBuildFailed(String),
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 请求超时
    #[error("LLM请求超时 ({seconds} 秒)")]
    Timeout { seconds: u64 },
    /// 返回的不是整数
    #[error("无法把LLM响应解析为评分: '{response}'")]
    NotANumber { response: String },
    /// 评分超出量表范围
    #[error("评分 {rating} 超出范围 [{min}, {max}]")]
    RatingOutOfRange { rating: i64, min: i64, max: i64 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl ToString) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.to_string(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_error_keeps_llm_source() {
        let err = AppError::Rating {
            note_id: 42,
            source: LlmError::NotANumber {
                response: "abc".to_string(),
            },
        };

        assert!(err.to_string().contains("42"));
        let source = std::error::Error::source(&err).expect("应该有 source");
        assert!(source.to_string().contains("abc"));
    }

    #[test]
    fn config_error_converts_into_app_error() {
        let err: AppError = ConfigError::EnvVarNotFound {
            var_name: "ANTHROPIC_API_KEY".to_string(),
        }
        .into();

        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
