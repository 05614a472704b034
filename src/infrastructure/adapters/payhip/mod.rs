//! Payhip Adapter - 商店上架

mod payhip_client;

pub use payhip_client::{PayhipClient, PayhipConfig};
