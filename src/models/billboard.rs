//! 龙虎榜数据模型
//!
//! 金额单位均为万元，证券代码均为 6 位补零字符串

use serde::{Deserialize, Serialize};

/// 每日龙虎榜上榜个股
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopListRecord {
    /// 代码
    pub code: String,
    /// 名称
    pub name: String,
    /// 涨跌幅
    pub pchange: Option<f64>,
    /// 龙虎榜成交额（万）
    pub amount: Option<f64>,
    /// 买入额（万）
    pub buy: Option<f64>,
    /// 买入额占总成交比例
    pub bratio: Option<f64>,
    /// 卖出额（万）
    pub sell: Option<f64>,
    /// 卖出额占总成交比例
    pub sratio: Option<f64>,
    /// 上榜原因
    pub reason: String,
    /// 日期
    pub date: String,
}

/// 个股上榜统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTopStat {
    pub code: String,
    pub name: String,
    /// 上榜次数
    pub count: Option<u32>,
    /// 累积购买额（万）
    pub bamount: Option<f64>,
    /// 累积卖出额（万）
    pub samount: Option<f64>,
    /// 净额（万）
    pub net: Option<f64>,
    /// 买入席位数
    pub bcount: Option<u32>,
    /// 卖出席位数
    pub scount: Option<u32>,
}

/// 营业部上榜统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerTopStat {
    /// 营业部名称
    pub broker: String,
    pub count: Option<u32>,
    pub bamount: Option<f64>,
    pub bcount: Option<u32>,
    pub samount: Option<f64>,
    pub scount: Option<u32>,
    /// 买入前三股票
    pub top3: String,
}

/// 机构席位追踪统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstTopStat {
    pub code: String,
    pub name: String,
    /// 累积买入额（万）
    pub bamount: Option<f64>,
    /// 买入次数
    pub bcount: Option<u32>,
    /// 累积卖出额（万）
    pub samount: Option<f64>,
    /// 卖出次数
    pub scount: Option<u32>,
    pub net: Option<f64>,
}

/// 机构席位成交明细
///
/// 错位行（见 `normalize::realign_shifted_row`）的前 6 列除代码外均为空，
/// 移走的值保存在 `extra` 中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionDetailRecord {
    pub code: String,
    pub name: Option<String>,
    /// 交易日期
    pub date: Option<String>,
    /// 机构席位买入额（万）
    pub bamount: Option<f64>,
    /// 机构席位卖出额（万）
    pub samount: Option<f64>,
    /// 类型
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// 宽表第 7 列起的单元格
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Option<String>>,
}

/// 营业部买卖明细中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComBSDetailEntry {
    /// 股票代码
    pub symbol: String,
    /// 营业部代码
    pub com_code: String,
    /// 营业部名称
    pub com_name: String,
    /// 买入额（万）
    pub buy_amount: Option<f64>,
    /// 卖出额（万）
    pub sell_amount: Option<f64>,
    /// 净额（万）
    pub net_amount: Option<f64>,
}

/// 单只证券某日的买入前五、卖出前五营业部
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComBSDetail {
    pub code: String,
    pub date: String,
    pub buy: Vec<ComBSDetailEntry>,
    pub sell: Vec<ComBSDetailEntry>,
}

/// 排名报表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComBSReportRow {
    pub rank: usize,
    pub code: String,
    pub sell_amount: Option<f64>,
    pub buy_amount: Option<f64>,
    pub net_amount: Option<f64>,
    pub counterparty: String,
}

/// 买入榜与卖出榜
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComBSReport {
    pub buy: Vec<ComBSReportRow>,
    pub sell: Vec<ComBSReportRow>,
}

// ==================== 查询参数 ====================

#[derive(Debug, Deserialize)]
pub struct TopListQuery {
    /// 日期 YYYY-MM-DD，为空时取最近一个交易日
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookbackQuery {
    /// 统计天数 5/10/30/60，默认 5
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub code: Option<String>,
    pub date: Option<String>,
    /// json（默认）或 text
    pub format: Option<String>,
}
