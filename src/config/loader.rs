//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 部署沿用的无前缀环境变量（DRY_RUN、MIRROR_URL、GITHUB_TOKEN、GITHUB_REPOSITORY、
//!    SUBREDDITS、TUMBLR_BLOG_NAME）
//! 2. 环境变量（前缀 `TOOLKIT_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 逗号分隔的列表键
const LIST_KEYS: &[&str] = &[
    "source.book_ids",
    "social.reddit.subreddits",
    "social.tumblr.tags",
    "selection.rules.imperative_verbs",
    "selection.rules.modal_words",
];

/// 无前缀环境变量 → 配置键
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DRY_RUN", "run.dry_run"),
    ("MIRROR_URL", "mirror.override_url"),
    ("GITHUB_TOKEN", "mirror.token"),
    ("GITHUB_REPOSITORY", "mirror.repository"),
    ("TUMBLR_BLOG_NAME", "social.tumblr.blog_name"),
];

/// 逗号分隔的无前缀环境变量 → 列表配置键
const LEGACY_LIST_ENV_KEYS: &[(&str, &str)] = &[("SUBREDDITS", "social.reddit.subreddits")];

/// 加载应用配置
///
/// # 环境变量示例
/// - `TOOLKIT_SOURCE__BOOK_IDS=2680,1342`
/// - `TOOLKIT_SELECTION__MAX_SENTENCES=30`
/// - `TOOLKIT_MIRROR__REPOSITORY=owner/kits`
/// - `TOOLKIT_STORE__API_KEY=...`
/// - `DRY_RUN=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(None, None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_from(config_path, None)
}

/// 加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，为 None 时搜索默认文件
/// - `env` - 替代进程环境的变量表，为 None 时读取进程环境
pub fn load_config_from(
    config_path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("source.url", "https://gutendex.com/books")?
        .set_default("source.meta_timeout_secs", 30)?
        .set_default("source.text_timeout_secs", 60)?
        .set_default("selection.max_sentences", 25)?
        .set_default("mirror.api_url", "https://api.github.com")?
        .set_default("mirror.timeout_secs", 30)?
        .set_default("mirror.upload_timeout_secs", 120)?
        .set_default("store.api_url", "https://payhip.com/api/v2/product")?
        .set_default("store.timeout_secs", 120)?
        .set_default("run.dry_run", false)?
        .set_default("run.output_dir", "products")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 前缀环境变量
    // 例如: TOOLKIT_MIRROR__REPOSITORY=owner/kits
    let mut environment = Environment::with_prefix("TOOLKIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",");
    for key in LIST_KEYS {
        environment = environment.with_list_parse_key(key);
    }
    builder = builder.add_source(environment.source(env.clone()));

    // 4. 无前缀环境变量（最高优先级）
    for (var, key) in LEGACY_ENV_KEYS {
        let value = lookup_env(env.as_ref(), var).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            tracing::debug!(var = var, key = key, "Applying legacy environment variable");
        }
        builder = builder.set_override_option(*key, value)?;
    }
    for (var, key) in LEGACY_LIST_ENV_KEYS {
        let items = lookup_env(env.as_ref(), var)
            .map(|v| split_list(&v))
            .filter(|items| !items.is_empty());
        if items.is_some() {
            tracing::debug!(var = var, key = key, "Applying legacy environment list");
        }
        builder = builder.set_override_option(*key, items)?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// `a, b,,c` → `["a", "b", "c"]`
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn lookup_env(env: Option<&HashMap<String, String>>, var: &str) -> Option<String> {
    match env {
        Some(map) => map.get(var).cloned(),
        None => std::env::var(var).ok(),
    }
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.source.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Source URL cannot be empty".to_string(),
        ));
    }

    if config.source.book_ids.is_empty() && config.run.book_id.is_none() {
        return Err(ConfigError::ValidationError(
            "At least one book id is required (source.book_ids or run.book_id)".to_string(),
        ));
    }

    if config.selection.max_sentences == 0 {
        return Err(ConfigError::ValidationError(
            "selection.max_sentences must be greater than 0".to_string(),
        ));
    }

    let rules = &config.selection.rules;
    if rules.min_words > rules.fallback_max_words || rules.fallback_max_words > rules.max_words {
        return Err(ConfigError::ValidationError(format!(
            "Word bands must satisfy min_words <= fallback_max_words <= max_words (got {} / {} / {})",
            rules.min_words, rules.fallback_max_words, rules.max_words
        )));
    }

    if let Some(repository) = config.mirror.repository.as_deref() {
        let repository = repository.trim();
        if !repository.is_empty() && !is_owner_name(repository) {
            return Err(ConfigError::ValidationError(format!(
                "mirror.repository must be in owner/name form, got '{}'",
                repository
            )));
        }
    }

    if let Some(theme) = config.run.theme.as_deref() {
        if theme.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "run.theme cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

fn is_owner_name(repository: &str) -> bool {
    match repository.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

fn redact(value: Option<&str>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

/// 打印配置信息（凭据只显示是否配置）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Toolkit Configuration ===");
    tracing::info!("Source: {}", config.source.url);
    tracing::info!("Book IDs: {:?}", config.source.book_ids);
    if let Some(book_id) = config.run.book_id {
        tracing::info!("Fixed Book ID: {}", book_id);
    }
    tracing::info!("Max Sentences: {}", config.selection.max_sentences);
    tracing::info!("Output Directory: {:?}", config.run.output_dir);
    tracing::info!("Dry Run: {}", config.run.dry_run);
    match config.mirror.override_url() {
        Some(url) => tracing::info!("Mirror Override: {}", url),
        None => tracing::info!(
            "Mirror Repository: {} (token {})",
            config.mirror.repository.as_deref().unwrap_or("<unset>"),
            redact(config.mirror.credentials().map(|(token, _)| token))
        ),
    }
    tracing::info!("Payhip API Key: {}", redact(config.store.api_key()));
    tracing::info!(
        "Reddit: {} {:?}",
        if config.social.reddit.is_configured() { "<set>" } else { "<unset>" },
        config.social.reddit.subreddits
    );
    tracing::info!(
        "Tumblr: {}",
        if config.social.tumblr.is_configured() { "<set>" } else { "<unset>" }
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=============================");
}
