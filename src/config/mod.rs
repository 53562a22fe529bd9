//! Configuration module

mod site;

pub use site::ConfigError;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::validate_origin;
