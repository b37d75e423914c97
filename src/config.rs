//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 数据抓取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// 单次请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 每页最多尝试次数
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// 每次尝试前暂停的毫秒数
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// 单次分页抓取的最大页数
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// 当日龙虎榜公布时间（北京时间，小时）
    #[serde(default = "default_publish_hour")]
    pub publish_hour: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 交易日历配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// 节假日列表，格式 YYYY-MM-DD（周末无需列出）
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 10 }
fn default_retry_count() -> u32 { 3 }
fn default_pause_ms() -> u64 { 1 }
fn default_max_pages() -> u32 { 200 }
fn default_publish_hour() -> u32 { 18 }
fn default_user_agent() -> String { crate::services::billboard::USER_AGENT.to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            retry_count: default_retry_count(),
            pause_ms: default_pause_ms(),
            max_pages: default_max_pages(),
            publish_hour: default_publish_hour(),
            user_agent: default_user_agent(),
        }
    }
}

impl LogConfig {
    /// 解析日志级别，无法识别时使用 info
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or_else(|_| {
            log::warn!("未知日志级别 {}，使用 info", self.level);
            log::LevelFilter::Info
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    pub fn load() -> Self {
        Self::load_from(&["config.json", "config/config.json"])
    }

    /// 按顺序尝试配置文件，第一个能成功解析的生效
    pub fn load_from<P: AsRef<Path>>(config_paths: &[P]) -> Self {
        for path in config_paths {
            let path = path.as_ref();
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("从 {} 加载配置成功", path.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path.display(), e);
                    }
                }
            }
        }

        log::info!("使用默认配置");
        Self::default()
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"fetch": {"retry_count": 5}, "calendar": {"holidays": ["2024-10-01"]}}"#,
        )
        .unwrap();
        assert_eq!(config.fetch.retry_count, 5);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.pause_ms, 1);
        assert_eq!(config.fetch.publish_hour, 18);
        assert_eq!(config.calendar.holidays, vec!["2024-10-01"]);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_from_skips_broken_file() {
        let dir = std::env::temp_dir().join(format!("lhb-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let broken = dir.join("broken.json");
        let good = dir.join("good.json");
        fs::write(&broken, "{ server: ").unwrap();
        fs::write(&good, r#"{"server": {"port": 9090}, "log": {"level": "debug"}}"#).unwrap();

        let config = AppConfig::load_from(&[&broken, &good]);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.log.level_filter(), log::LevelFilter::Debug);

        let config = AppConfig::load_from(&[&broken, &dir.join("missing.json")]);
        assert_eq!(config.server.port, 8080);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_level_filter() {
        let level = |s: &str| LogConfig { level: s.to_string() }.level_filter();
        assert_eq!(level("warn"), log::LevelFilter::Warn);
        assert_eq!(level("TRACE"), log::LevelFilter::Trace);
        assert_eq!(level("verbose"), log::LevelFilter::Info);
    }
}
