//! 龙虎榜数据获取错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillboardError {
    /// 调用方参数错误，在发起任何网络请求之前返回
    #[error("参数错误: {0}")]
    InvalidArgument(String),
    /// 网络请求失败，或重试次数用尽
    #[error("网络错误: {0}")]
    Network(String),
    /// 响应内容与预期的 JS 变量或 HTML 表格格式不符
    #[error("解析失败: {0}")]
    Decode(String),
}

impl BillboardError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<reqwest::Error> for BillboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Network(format!("请求超时: {}", e));
        }
        Self::Network(e.to_string())
    }
}

impl From<url::ParseError> for BillboardError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidArgument(format!("URL 构造失败: {}", e))
    }
}

impl From<serde_json::Error> for BillboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(format!("JSON 解析失败: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, BillboardError>;
