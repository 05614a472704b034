//! Toolkit Context - 工具包限界上下文
//!
//! 职责:
//! - 主题与 slug 推导
//! - 工具包聚合（选中的名言 + 元数据）
//! - 推广文案组装

mod aggregate;
mod announcement;
mod value_objects;

pub use aggregate::Toolkit;
pub use announcement::{Announcement, STORE_UTM_SUFFIX};
pub use value_objects::{Slug, Theme};
