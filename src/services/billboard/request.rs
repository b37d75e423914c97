//! 请求 URL 构造
//!
//! 统计周期只允许 5/10/30/60 日，非法值在构造 URL 之前即被拒绝

use chrono::NaiveDate;
use url::Url;

use super::common::{EM_LHB_URL, EM_PAGE_SIZE, SINA_COMBS_URL, SINA_LHB_PAGE, SINA_LHB_URL};
use super::error::{BillboardError, Result};

/// 统计周期（最近 N 个交易日）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackDays {
    Five,
    Ten,
    Thirty,
    Sixty,
}

impl LookbackDays {
    pub const ALLOWED: [u32; 4] = [5, 10, 30, 60];

    pub fn days(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Thirty => 30,
            Self::Sixty => 60,
        }
    }
}

impl TryFrom<u32> for LookbackDays {
    type Error = BillboardError;

    fn try_from(days: u32) -> Result<Self> {
        match days {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            30 => Ok(Self::Thirty),
            60 => Ok(Self::Sixty),
            other => Err(BillboardError::invalid(format!(
                "统计周期只能是 5、10、30 或 60 日，收到: {}",
                other
            ))),
        }
    }
}

/// 新浪龙虎榜统计页面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinaKind {
    /// 个股上榜统计
    StockTops,
    /// 营业部上榜统计
    BrokerTops,
    /// 机构席位追踪
    InstTops,
    /// 机构席位成交明细
    InstDetail,
}

impl SinaKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::StockTops => "ggtj",
            Self::BrokerTops => "yytj",
            Self::InstTops => "jgzz",
            Self::InstDetail => "jgmx",
        }
    }
}

/// 新浪统计页面 URL
///
/// 机构席位明细没有统计周期，`last` 参数留空
pub fn sina_page_url(kind: SinaKind, last: Option<LookbackDays>, page: u32) -> Result<String> {
    let mut url = Url::parse(&format!("{}/{}/{}", SINA_LHB_URL, kind.path(), SINA_LHB_PAGE))?;
    let last = last.map(|d| d.days().to_string()).unwrap_or_default();
    url.query_pairs_mut()
        .append_pair("last", &last)
        .append_pair("p", &page.to_string());
    Ok(url.into())
}

/// 东方财富每日龙虎榜 URL，起止日期相同
pub fn em_top_list_url(date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    format!(
        "{}/pagesize={},page=1,sortRule=-1,sortType=,startDate={},endDate={},gpfw=0,js=vardata_tab_1.html",
        EM_LHB_URL, EM_PAGE_SIZE, date, date
    )
}

/// 新浪个股营业部买卖明细 URL
pub fn sina_combs_url(code: &str, date: NaiveDate) -> String {
    format!(
        "{}?symbol={}&tradedate={}&type=01",
        SINA_COMBS_URL,
        code,
        date.format("%Y-%m-%d")
    )
}
