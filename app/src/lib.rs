pub mod infrastructure;
pub mod modules;
pub mod shared;
pub mod view;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use infrastructure::EventBus;
use modules::chat::{ChatSettings, LLMProviderConfig, ProviderType};
use modules::config::{self, AppConfig, LLMConfig, PROVIDER_MOCK};
use modules::{ChatModule, ConfigModule};
use shared::AppResult;
use view::ChatView;

/// 未设置 RUST_LOG 时的日志过滤
const DEFAULT_LOG_FILTER: &str = "warn,hey_gemini_lib=info";

pub fn run() -> AppResult<()> {
    // 初始化日志（写到 stderr，避免混入聊天画面）
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("Hey Gemini starting...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async())
}

async fn run_async() -> AppResult<()> {
    // 加载配置
    let config_path = config::resolve_config_path(std::env::var(config::CONFIG_PATH_ENV).ok());
    tracing::info!("Config file: {:?}", config_path);

    let mut app_config = ConfigModule::new_with_file(config_path).load().await?;
    app_config.override_api_key(std::env::var(config::API_KEY_ENV).ok());

    // 初始化 Chat 模块（远端句柄只创建一次）
    let event_bus = Arc::new(EventBus::new());
    let chat_module = ChatModule::from_provider_config(
        &provider_config(&app_config.llm),
        event_bus,
        chat_settings(&app_config),
    )?;
    tracing::info!(
        "Chat module initialized: provider={}, model={}",
        chat_module.llm().provider_id(),
        chat_module.llm().model()
    );

    let title = format!("Hey Gemini · {}", chat_module.llm().model());
    let mut ctx = chat_module.into_ui_context();
    let mut view = ChatView::new(title, app_config.view.clone());

    view.run(
        &mut ctx,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("Hey Gemini exiting");
    Ok(())
}

/// 将配置文件中的 LLM 设置转换为提供商配置
pub fn provider_config(llm: &LLMConfig) -> LLMProviderConfig {
    let provider_type = if llm.provider == PROVIDER_MOCK {
        ProviderType::Mock
    } else {
        ProviderType::Gemini
    };

    LLMProviderConfig {
        provider_type,
        base_url: llm.base_url.clone(),
        api_key: llm.api_key.clone(),
        model: llm.model.clone(),
        timeout_secs: llm.timeout_secs,
        temperature: llm.temperature,
        max_output_tokens: llm.max_output_tokens,
    }
}

pub fn chat_settings(config: &AppConfig) -> ChatSettings {
    ChatSettings {
        animation_delay: Duration::from_millis(config.chat.animation_delay_ms),
    }
}
