mod app_config;

pub use app_config::{
    AppConfig, CorsSettings, LogFormat, LoggingSettings, MetricsSettings, ServerSettings,
    StorageSettings,
};
