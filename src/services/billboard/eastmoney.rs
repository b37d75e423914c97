//! 东方财富每日龙虎榜
//!
//! 响应格式: `var data_tab_1={data:[{SCode:"000001",...}],...}`

use chrono::NaiveDate;
use serde_json::Value;

use super::common::EM_VAR_MARKER;
use super::decode::{decode_gbk, decode_js_variable};
use super::error::{BillboardError, Result};
use super::normalize::{normalize_top_list, TOP_LIST_RAW};
use super::request::em_top_list_url;
use super::table::{json_cell, Table};
use super::transport::Transport;
use crate::models::TopListRecord;

/// 请求并解析指定日期的龙虎榜
pub async fn fetch_top_list(transport: &dyn Transport, date: NaiveDate) -> Result<Vec<TopListRecord>> {
    let url = em_top_list_url(date);
    let bytes = transport.get(&url).await?;
    parse_top_list(&decode_gbk(&bytes), &date.format("%Y-%m-%d").to_string())
}

pub fn parse_top_list(text: &str, date: &str) -> Result<Vec<TopListRecord>> {
    let value = decode_js_variable(text, EM_VAR_MARKER)?;
    let data = value
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| BillboardError::decode("龙虎榜响应缺少 data 数组"))?;

    let rows = data
        .iter()
        .map(|item| {
            TOP_LIST_RAW
                .columns
                .iter()
                .map(|col| json_cell(item.get(*col)))
                .collect()
        })
        .collect();

    normalize_top_list(Table::with_columns(TOP_LIST_RAW.columns, rows), date)
}
