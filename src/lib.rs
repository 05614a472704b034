//! Toolkit Press - 公版书行动工具包生成与分发
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 去版权页、句子评分、选句策略（纯函数）
//! - Toolkit Context: 工具包聚合、主题、slug、推广文案
//!
//! 应用层 (application/):
//! - Ports: TextSource, ArtifactRenderer, ReleaseStore, Marketplace, SocialPoster
//! - Commands: 生成工具包、幂等镜像发布
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Gutendex, PDF, GitHub Releases, Payhip, Reddit, Tumblr
//! - Memory: ReleaseStore 内存实现

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
