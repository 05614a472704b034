//! Toolkit Press - 公版书行动工具包生成器
//!
//! 单次运行: 选书 → 选句 → PDF → GitHub Release 镜像 → Payhip 上架 → Reddit/Tumblr 推广

use std::process::ExitCode;
use std::sync::Arc;

use toolkit_press::application::{
    GenerateToolkit, GenerateToolkitHandler, MarketplacePort, PublishMirrorHandler,
    ReleaseStorePort, RunSettings, SocialPosterPort,
};
use toolkit_press::config::{load_config, print_config, AppConfig};
use toolkit_press::domain::toolkit::Theme;
use toolkit_press::domain::SelectionPolicy;
use toolkit_press::infrastructure::adapters::{
    GithubReleaseStore, GithubReleaseStoreConfig, GutendexConfig, GutendexTextSource,
    PayhipClient, PayhipConfig, PdfRenderer, RedditConfig, RedditPoster, TumblrConfig,
    TumblrPoster,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},toolkit_press={}",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置装配 GitHub 镜像（凭据不全时返回 None）
fn build_release_store(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn ReleaseStorePort>>> {
    let Some((token, repository)) = config.mirror.credentials() else {
        tracing::info!("GitHub mirror not configured");
        return Ok(None);
    };

    let store_config = GithubReleaseStoreConfig {
        timeout_secs: config.mirror.timeout_secs,
        upload_timeout_secs: config.mirror.upload_timeout_secs,
        release_body: config.mirror.release_body.clone(),
        ..GithubReleaseStoreConfig::new(token, repository).with_api_url(&config.mirror.api_url)
    };
    Ok(Some(Arc::new(GithubReleaseStore::new(store_config)?)))
}

fn build_marketplace(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn MarketplacePort>>> {
    let Some(api_key) = config.store.api_key() else {
        tracing::info!("Payhip not configured, listing disabled");
        return Ok(None);
    };

    let payhip_config = PayhipConfig {
        api_url: config.store.api_url.clone(),
        price: config.store.price.clone(),
        currency: config.store.currency.clone(),
        category: config.store.category.clone(),
        timeout_secs: config.store.timeout_secs,
        ..PayhipConfig::new(api_key)
    };
    Ok(Some(Arc::new(PayhipClient::new(payhip_config)?)))
}

fn build_posters(config: &AppConfig) -> anyhow::Result<Vec<Arc<dyn SocialPosterPort>>> {
    let mut posters: Vec<Arc<dyn SocialPosterPort>> = Vec::new();

    let reddit = &config.social.reddit;
    if reddit.is_configured() {
        let reddit_config = RedditConfig {
            user_agent: reddit.user_agent.clone(),
            subreddits: reddit.subreddits.clone(),
            ..RedditConfig::new(
                reddit.client_id.clone().unwrap_or_default(),
                reddit.client_secret.clone().unwrap_or_default(),
                reddit.username.clone().unwrap_or_default(),
                reddit.password.clone().unwrap_or_default(),
            )
        };
        posters.push(Arc::new(RedditPoster::new(reddit_config)?));
    } else {
        tracing::info!("Reddit not configured");
    }

    let tumblr = &config.social.tumblr;
    if tumblr.is_configured() {
        let tumblr_config = TumblrConfig {
            tags: tumblr.tags.clone(),
            ..TumblrConfig::new(
                tumblr.blog_name.clone().unwrap_or_default(),
                tumblr.oauth_token.clone().unwrap_or_default(),
            )
        };
        posters.push(Arc::new(TumblrPoster::new(tumblr_config)?));
    } else {
        tracing::info!("Tumblr not configured");
    }

    Ok(posters)
}

fn build_handler(config: &AppConfig) -> anyhow::Result<GenerateToolkitHandler> {
    let source = GutendexTextSource::new(GutendexConfig {
        base_url: config.source.url.clone(),
        meta_timeout_secs: config.source.meta_timeout_secs,
        text_timeout_secs: config.source.text_timeout_secs,
    })?;
    let renderer = PdfRenderer::new(&config.run.output_dir);
    let mirror = PublishMirrorHandler::new(
        build_release_store(config)?,
        config.mirror.override_url().map(str::to_string),
    );

    let theme = config
        .run
        .theme
        .as_deref()
        .map(Theme::new)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid theme: {}", e))?;

    let settings = RunSettings {
        dry_run: config.run.dry_run,
        book_ids: config.source.book_ids.clone(),
        book_id: config.run.book_id,
        theme,
    };
    let policy = SelectionPolicy::new(
        config.selection.max_sentences,
        config.selection.rules.clone(),
    );

    Ok(GenerateToolkitHandler::new(
        Arc::new(source),
        Arc::new(renderer),
        mirror,
        build_marketplace(config)?,
        build_posters(config)?,
        policy,
        settings,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("Toolkit Press v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let handler = build_handler(&config)?;

    match handler.handle(GenerateToolkit::default()).await {
        Ok(report) => {
            println!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "Toolkit run failed");
            println!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
