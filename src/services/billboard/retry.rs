//! 固定间隔重试
//!
//! 每次尝试之前（包括第一次）都先暂停 `pause`，
//! 请求或解析中的任何错误都计为一次失败

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::error::{BillboardError, Result};
use crate::config::FetchConfig;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retry_count: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 3,
            pause: Duration::from_millis(1),
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            pause: Duration::from_millis(config.pause_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(retry_count: u32, pause: Duration) -> Self {
        Self { retry_count, pause }
    }

    /// 执行 `op`，全部失败后返回网络错误，附带最后一次的失败原因
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;
        for attempt in 1..=self.retry_count {
            sleep(self.pause).await;
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    log::warn!(
                        "{} 第 {}/{} 次尝试失败: {}",
                        what,
                        attempt,
                        self.retry_count,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(BillboardError::Network(match last_error {
            Some(e) => format!("{} 重试 {} 次后仍失败: {}", what, self.retry_count, e),
            None => format!("{} 未执行任何请求（重试次数为 0）", what),
        }))
    }
}
