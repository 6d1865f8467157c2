// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，配置实体
// - ports: 端口层，配置读写的抽象接口
// - infrastructure: 基础设施层，内存 / JSON 文件仓储

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{AppConfig, ChatConfig, LLMConfig, ViewConfig, PROVIDER_GEMINI, PROVIDER_MOCK};
pub use infrastructure::{FileConfigRepository, InMemoryConfigRepository};
pub use ports::{ConfigError, ConfigRepository};

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "HEY_GEMINI_CONFIG";
/// API Key 环境变量，优先于配置文件
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// 默认配置文件名（当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "hey-gemini.json";

/// Config 模块容器
pub struct ConfigModule {
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 使用 JSON 文件创建
    pub fn new_with_file(path: impl Into<PathBuf>) -> Self {
        Self::with_repository(Arc::new(FileConfigRepository::new(path)))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }

    /// 加载并验证配置；不存在时写入默认配置
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.repository.exists().await? {
            info!("No configuration found, writing defaults");
            self.repository.save(&AppConfig::default()).await?;
        }

        let config = self.repository.load().await?;
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        Ok(config)
    }

    /// 验证并保存配置
    pub async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;
        self.repository.save(config).await
    }
}

/// 解析配置文件路径
pub fn resolve_config_path(from_env: Option<String>) -> PathBuf {
    from_env
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_module_writes_defaults() {
        let repository = Arc::new(InMemoryConfigRepository::new());
        let module = ConfigModule::with_repository(repository.clone());

        let config = module.load().await.unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(repository.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut invalid = AppConfig::default();
        invalid.llm.model = String::new();
        let module =
            ConfigModule::with_repository(Arc::new(InMemoryConfigRepository::with_config(invalid.clone())));

        let err = module.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let err = ConfigModule::new_in_memory().save(&invalid).await.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_resolve_config_path() {
        assert_eq!(resolve_config_path(None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(resolve_config_path(Some("".to_string())), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(
            resolve_config_path(Some("/tmp/chat.json".to_string())),
            PathBuf::from("/tmp/chat.json")
        );
    }
}
