//! Social Adapters - 推广帖发布

mod reddit_poster;
mod tumblr_poster;

pub use reddit_poster::{RedditConfig, RedditPoster};
pub use tumblr_poster::{normalize_blog_name, TumblrConfig, TumblrPoster};
