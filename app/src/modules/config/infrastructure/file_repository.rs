// File Config Repository
//
// 基于 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 文件配置仓储
///
/// 配置以格式化 JSON 保存，读取结果缓存在内存中
pub struct FileConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: RwLock<Option<AppConfig>>,
}

impl FileConfigRepository {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            cache: RwLock::new(None),
        }
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<AppConfig>, ConfigError> {
        if !tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?
        {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ConfigError::StorageError(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        let config = self.load_from_file().await?.unwrap_or_default();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        let mut cache = self.cache.write().await;
        *cache = Some(config.clone());

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))
    }
}
