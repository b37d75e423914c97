//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式

use serde::{Deserialize, Serialize};

use crate::services::billboard::get_beijing_time;

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - warning: 分页抓取未完成时的提示
/// - timestamp: 响应时间戳（北京时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 部分结果的警告信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// 响应时间戳（ISO 8601 格式）
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    ///
    /// # 参数
    /// - data: 响应数据
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            warning: None,
            timestamp: get_beijing_time(),
        }
    }

    /// 创建部分成功响应，`warning` 为空时等同于 `success`
    pub fn partial(data: T, warning: Option<String>) -> Self {
        Self {
            warning,
            ..Self::success(data)
        }
    }

    /// 非交易日无数据
    pub fn no_data(message: String) -> Self {
        Self {
            success: true,
            data: None,
            message,
            warning: None,
            timestamp: get_beijing_time(),
        }
    }

    /// 创建错误响应
    ///
    /// # 参数
    /// - message: 错误信息
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            warning: None,
            timestamp: get_beijing_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_omitted_when_complete() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("warning").is_none());

        let json = serde_json::to_value(ApiResponse::partial(vec![1], Some("第 2 页失败".into()))).unwrap();
        assert_eq!(json["warning"], "第 2 页失败");
        assert_eq!(json["data"], serde_json::json!([1]));
    }

    #[test]
    fn test_no_data() {
        let resp = ApiResponse::<Vec<u32>>::no_data("非交易日".into());
        assert!(resp.success);
        assert!(resp.data.is_none());
        assert!(resp.timestamp.ends_with("+08:00"));
    }
}
