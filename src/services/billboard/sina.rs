//! 新浪财经龙虎榜接口
//!
//! - 统计页面 vLHBData/kind/<kind>/index.phtml：GBK 编码 HTML，分页
//! - 营业部买卖明细 getLHBComBSData：`var details={buy:[...],sell:[...]}`

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use super::common::{parse_float, zfill_code, SINA_COMBS_MARKER};
use super::decode::{decode_gbk, decode_html_table, decode_js_variable};
use super::error::{BillboardError, Result};
use super::request::{sina_combs_url, sina_page_url, LookbackDays, SinaKind};
use super::table::{json_cell, Table};
use super::transport::Transport;
use super::walker::{Page, PageSource};
use crate::models::{ComBSDetail, ComBSDetailEntry};

/// 新浪统计页面数据源，`normalize` 把一页表格转为记录
pub struct SinaTableSource<'a, R> {
    transport: &'a dyn Transport,
    kind: SinaKind,
    last: Option<LookbackDays>,
    normalize: fn(Table) -> Result<Vec<R>>,
}

impl<'a, R> SinaTableSource<'a, R> {
    pub fn new(
        transport: &'a dyn Transport,
        kind: SinaKind,
        last: Option<LookbackDays>,
        normalize: fn(Table) -> Result<Vec<R>>,
    ) -> Self {
        Self {
            transport,
            kind,
            last,
            normalize,
        }
    }
}

#[async_trait]
impl<'a, R: Send + 'static> PageSource for SinaTableSource<'a, R> {
    type Row = R;

    fn name(&self) -> String {
        match self.last {
            Some(days) => format!("新浪龙虎榜 {} ({}日)", self.kind.path(), days.days()),
            None => format!("新浪龙虎榜 {}", self.kind.path()),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Page<R>> {
        let url = sina_page_url(self.kind, self.last, page)?;
        let bytes = self.transport.get(&url).await?;
        let decoded = decode_html_table(&decode_gbk(&bytes))?;
        let rows = (self.normalize)(decoded.table)?;
        Ok(Page {
            rows,
            next_page: decoded.next_page,
        })
    }
}

/// 请求并解析单只证券的营业部买卖明细
pub async fn fetch_combs_detail(
    transport: &dyn Transport,
    code: &str,
    date: NaiveDate,
) -> Result<ComBSDetail> {
    let url = sina_combs_url(code, date);
    let bytes = transport.get(&url).await?;
    parse_combs_detail(&decode_gbk(&bytes), code, &date.format("%Y-%m-%d").to_string())
}

pub fn parse_combs_detail(text: &str, code: &str, date: &str) -> Result<ComBSDetail> {
    let value = decode_js_variable(text, SINA_COMBS_MARKER)?;
    if !value.is_object() {
        return Err(BillboardError::decode("买卖明细响应不是对象"));
    }
    let buy = value.get("buy");
    let sell = value.get("sell");
    if buy.is_none() && sell.is_none() {
        return Err(BillboardError::decode("买卖明细响应缺少 buy/sell 字段"));
    }

    Ok(ComBSDetail {
        code: code.to_string(),
        date: date.to_string(),
        buy: parse_side(buy),
        sell: parse_side(sell),
    })
}

fn parse_side(side: Option<&Value>) -> Vec<ComBSDetailEntry> {
    let Some(items) = side.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let text = |key: &str| json_cell(item.get(key)).unwrap_or_default();
            let amount = |key: &str| json_cell(item.get(key)).as_deref().and_then(parse_float);
            ComBSDetailEntry {
                symbol: zfill_code(&text("SYMBOL")),
                com_code: text("comCode"),
                com_name: text("comName"),
                buy_amount: amount("buyAmount"),
                sell_amount: amount("sellAmount"),
                net_amount: amount("netAmount"),
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DETAILS_BODY: &str = r#"var details={buy:[{SYMBOL:"000973",sellAmount:"7.6802",buyAmount:"2101.4900",comCode:"80291363",type:"01",netAmount:"2093.8098",comName:"浙商证券股份有限公司临安万马路证券营业部"},{SYMBOL:"000973",sellAmount:"0.0000",buyAmount:"1777.2700",comCode:"80348499",type:"01",netAmount:"1777.27",comName:"华泰证券股份有限公司浙江分公司"}],sell:[{SYMBOL:"973",sellAmount:"3017.3780",buyAmount:"69.5400",comCode:"80127954",type:"01",netAmount:"-2947.838",comName:"安信证券股份有限公司南昌胜利路证券营业部"}]};"#;

    #[test]
    fn test_parse_combs_detail() {
        let detail = parse_combs_detail(DETAILS_BODY, "000973", "2024-03-08").unwrap();
        assert_eq!(detail.buy.len(), 2);
        assert_eq!(detail.sell.len(), 1);

        let first = &detail.buy[0];
        assert_eq!(first.symbol, "000973");
        assert_eq!(first.com_code, "80291363");
        assert_eq!(first.buy_amount, Some(2101.49));
        assert_eq!(first.sell_amount, Some(7.6802));
        assert_eq!(first.net_amount, Some(2093.8098));

        assert_eq!(detail.sell[0].symbol, "000973");
        assert_eq!(detail.sell[0].net_amount, Some(-2947.838));
    }

    #[test]
    fn test_parse_combs_detail_errors() {
        assert!(parse_combs_detail("var details=null", "000973", "2024-03-08").is_err());
        assert!(parse_combs_detail("var details={}", "000973", "2024-03-08").is_err());
        assert!(parse_combs_detail("<html></html>", "000973", "2024-03-08").is_err());
    }

    #[test]
    fn test_source_name() {
        let transport = crate::services::billboard::transport::testing::FixtureTransport::new();
        let source = SinaTableSource::new(
            &transport,
            SinaKind::StockTops,
            Some(LookbackDays::Ten),
            crate::services::billboard::normalize::normalize_stock_tops,
        );
        assert!(source.name().contains("ggtj"));
        assert!(source.name().contains("10"));
    }
}
