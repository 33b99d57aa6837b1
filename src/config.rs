use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::RatingScale;

/// 评分服务凭据所在的环境变量
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "ANKI_PRIORITIZER_CONFIG";
/// 默认配置文件（位于当前工作目录，可选）
pub const DEFAULT_CONFIG_FILE: &str = "anki_prioritizer.toml";

/// 单张卡片重试用尽后的处理方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingFailurePolicy {
    /// 整个运行失败，已评分结果全部丢弃
    #[default]
    Abort,
    /// 记录警告并跳过这张卡片
    Skip,
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub anthropic_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次评分请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 同时进行的评分请求数量，1 表示完全顺序执行
    pub max_concurrent_requests: usize,
    /// 每张卡片评分失败后的额外重试次数
    pub rating_retries: u32,
    pub on_rating_failure: RatingFailurePolicy,
    // --- 选择策略 ---
    pub rating_scale: RatingScale,
    /// 保留的高分卡片比例
    pub selection_fraction: f64,
    /// 输出文件
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            llm_api_base_url: "https://api.anthropic.com/v1".to_string(),
            llm_model_name: "claude-sonnet-4-5".to_string(),
            request_timeout_secs: 60,
            max_concurrent_requests: 1,
            rating_retries: 1,
            on_rating_failure: RatingFailurePolicy::Abort,
            rating_scale: RatingScale::default(),
            selection_fraction: 0.2,
            output_file: "important_card_nids.txt".to_string(),
            verbose_logging: false,
        }
    }
}

/// `anki_prioritizer.toml` 的内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_concurrent_requests: Option<usize>,
    pub rating_retries: Option<u32>,
    pub on_rating_failure: Option<RatingFailurePolicy>,
    pub rating_min: Option<i64>,
    pub rating_max: Option<i64>,
    pub selection_fraction: Option<f64>,
    pub output_file: Option<String>,
    pub verbose_logging: Option<bool>,
}

impl ConfigFile {
    /// 解析 TOML 配置内容
    pub fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::FileParseFailed {
            path: path.to_string(),
            source,
        })
    }

    /// 读取配置文件
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    /// - `required`: 为 false 时文件不存在返回 `None`
    pub fn load(path: &Path, required: bool) -> Result<Option<Self>, ConfigError> {
        if !required && !path.exists() {
            return Ok(None);
        }

        let config_path = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: config_path.clone(),
                source,
            })?;

        Self::parse(&content, &config_path).map(Some)
    }
}

impl Config {
    /// 从进程环境加载配置：默认值 → 配置文件 → 环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => ConfigFile::load(Path::new(&path), true)?,
            Err(_) => ConfigFile::load(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// 从给定的配置文件内容和环境变量查找函数构建配置
    pub fn from_sources<F>(file: Option<ConfigFile>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = env(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: API_KEY_VAR.to_string(),
            })?;

        let mut config = Self {
            anthropic_api_key,
            ..Self::default()
        };

        if let Some(file) = file {
            config.apply_file(file);
        }

        if let Some(v) = parse_var(&env, "MAX_CONCURRENT_REQUESTS", "usize")? {
            config.max_concurrent_requests = v;
        }
        if let Some(v) = parse_var(&env, "REQUEST_TIMEOUT_SECS", "u64")? {
            config.request_timeout_secs = v;
        }
        if let Some(v) = parse_flag(&env, "VERBOSE_LOGGING")? {
            config.verbose_logging = v;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.max_concurrent_requests {
            self.max_concurrent_requests = v;
        }
        if let Some(v) = file.rating_retries {
            self.rating_retries = v;
        }
        if let Some(v) = file.on_rating_failure {
            self.on_rating_failure = v;
        }
        if let Some(v) = file.rating_min {
            self.rating_scale.min = v;
        }
        if let Some(v) = file.rating_max {
            self.rating_scale.max = v;
        }
        if let Some(v) = file.selection_fraction {
            self.selection_fraction = v;
        }
        if let Some(v) = file.output_file {
            self.output_file = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.selection_fraction > 0.0 && self.selection_fraction <= 1.0) {
            return Err(invalid(
                "selection_fraction",
                format!("{} 不在 (0, 1] 范围内", self.selection_fraction),
            ));
        }
        if self.rating_scale.min > self.rating_scale.max {
            return Err(invalid(
                "rating_scale",
                format!(
                    "最小值 {} 大于最大值 {}",
                    self.rating_scale.min, self.rating_scale.max
                ),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(invalid("max_concurrent_requests", "必须至少为 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "必须至少为 1 秒"));
        }
        if self.output_file.trim().is_empty() {
            return Err(invalid("output_file", "不能为空"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_var<T, F>(env: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

/// 解析开关类环境变量：接受 true/false、1/0、yes/no、on/off（不区分大小写）
fn parse_flag<F>(env: &F, var_name: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = env(var_name) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: "bool".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let result = Config::from_sources(None, env_from(&[]));

        match result {
            Err(ConfigError::EnvVarNotFound { var_name }) => assert_eq!(var_name, API_KEY_VAR),
            other => panic!("应该返回 EnvVarNotFound，实际: {:?}", other),
        }
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = Config::from_sources(None, env_from(&[(API_KEY_VAR, "   ")]));
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound { .. })));
    }

    #[test]
    fn defaults_match_reference_policy() {
        let config = Config::from_sources(None, env_from(&[(API_KEY_VAR, "sk-test")])).unwrap();

        assert_eq!(config.anthropic_api_key, "sk-test");
        assert_eq!(config.selection_fraction, 0.2);
        assert_eq!(config.rating_scale, RatingScale { min: 1, max: 10 });
        assert_eq!(config.output_file, "important_card_nids.txt");
        assert_eq!(config.max_concurrent_requests, 1);
        assert_eq!(config.on_rating_failure, RatingFailurePolicy::Abort);
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let file = ConfigFile::parse(
            r#"
                max_concurrent_requests = 4
                selection_fraction = 0.5
                on_rating_failure = "skip"
                output_file = "top.txt"
            "#,
            "test.toml",
        )
        .unwrap();

        let config = Config::from_sources(
            Some(file),
            env_from(&[(API_KEY_VAR, "k"), ("MAX_CONCURRENT_REQUESTS", "8")]),
        )
        .unwrap();

        assert_eq!(config.max_concurrent_requests, 8);
        assert_eq!(config.selection_fraction, 0.5);
        assert_eq!(config.on_rating_failure, RatingFailurePolicy::Skip);
        assert_eq!(config.output_file, "top.txt");
    }

    #[test]
    fn unparsable_env_value_is_reported() {
        let result = Config::from_sources(
            None,
            env_from(&[(API_KEY_VAR, "k"), ("REQUEST_TIMEOUT_SECS", "soon")]),
        );

        match result {
            Err(ConfigError::EnvVarParseFailed { var_name, value, .. }) => {
                assert_eq!(var_name, "REQUEST_TIMEOUT_SECS");
                assert_eq!(value, "soon");
            }
            other => panic!("应该返回 EnvVarParseFailed，实际: {:?}", other),
        }
    }

    #[test]
    fn verbose_flag_accepts_numeric_and_word_forms() {
        for (raw, expected) in [("1", true), ("TRUE", true), ("on", true), ("0", false), ("no", false)] {
            let config = Config::from_sources(
                None,
                env_from(&[(API_KEY_VAR, "k"), ("VERBOSE_LOGGING", raw)]),
            )
            .unwrap();
            assert_eq!(config.verbose_logging, expected, "VERBOSE_LOGGING={}", raw);
        }

        let result = Config::from_sources(
            None,
            env_from(&[(API_KEY_VAR, "k"), ("VERBOSE_LOGGING", "maybe")]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParseFailed { ref var_name, .. }) if var_name == "VERBOSE_LOGGING"
        ));
    }

    #[test]
    fn invalid_fraction_is_rejected() {
        let file = ConfigFile::parse("selection_fraction = 1.5", "test.toml").unwrap();
        let result = Config::from_sources(Some(file), env_from(&[(API_KEY_VAR, "k")]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "selection_fraction"
        ));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let result = ConfigFile::parse("temperature = 0.7", "test.toml");
        assert!(matches!(result, Err(ConfigError::FileParseFailed { .. })));
    }

    #[test]
    fn optional_file_may_be_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(ConfigFile::load(&path, false).unwrap().is_none());
        assert!(matches!(
            ConfigFile::load(&path, true),
            Err(ConfigError::FileReadFailed { .. })
        ));
    }
}
