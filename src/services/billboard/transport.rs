//! HTTP GET 传输层
//!
//! 抽象成 trait，测试中用固定响应替换网络请求

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

use super::error::{BillboardError, Result};
use crate::config::FetchConfig;

#[async_trait]
pub trait Transport: Send + Sync {
    /// 请求 URL，返回原始响应字节
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// 基于 reqwest 的实现，单次请求超时由配置决定（默认 10 秒）
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| BillboardError::invalid(format!("User-Agent 无效: {}", e)))?;
        headers.insert(USER_AGENT, ua);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_static("http://vip.stock.finance.sina.com.cn/"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("📡 GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(BillboardError::Network(format!(
                "HTTP 状态错误 {}: {}",
                response.status(),
                url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用固定响应传输层

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 按 URL 子串匹配返回固定内容，未匹配时返回网络错误
    #[derive(Default)]
    pub struct FixtureTransport {
        routes: Vec<(String, Vec<u8>)>,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl FixtureTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// 响应以 GBK 编码返回，与真实接口一致
        pub fn route(mut self, pattern: &str, body: &str) -> Self {
            let (bytes, _, _) = encoding_rs::GBK.encode(body);
            self.routes.push((pattern.to_string(), bytes.into_owned()));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FixtureTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, body)| body.clone())
                .ok_or_else(|| BillboardError::Network(format!("连接失败: {}", url)))
        }
    }
}
