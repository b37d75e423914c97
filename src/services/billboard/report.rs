//! 营业部买卖明细报表
//!
//! 买入榜、卖出榜各一张表，每行：排名、代码、卖出额、买入额、净额、营业部名称

use crate::models::{ComBSDetail, ComBSDetailEntry, ComBSReport, ComBSReportRow};

pub fn build_report(detail: &ComBSDetail) -> ComBSReport {
    ComBSReport {
        buy: ranked(&detail.buy),
        sell: ranked(&detail.sell),
    }
}

fn ranked(entries: &[ComBSDetailEntry]) -> Vec<ComBSReportRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| ComBSReportRow {
            rank: i + 1,
            code: e.symbol.clone(),
            sell_amount: e.sell_amount,
            buy_amount: e.buy_amount,
            net_amount: e.net_amount,
            counterparty: e.com_name.clone(),
        })
        .collect()
}

fn amount(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "--".to_string())
}

fn render_table(out: &mut String, title: &str, rows: &[ComBSReportRow]) {
    out.push_str(&format!(
        "{:>4} {:>6} {:>10} {:>10} {:>10} {}\n",
        title, "股票代码", "卖出额(万)", "买入额(万)", "买入净额(万)", "营业部名称"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<4} {:<8} {:<10} {:<10} {:<12} {}\n",
            row.rank,
            row.code,
            amount(row.sell_amount),
            amount(row.buy_amount),
            amount(row.net_amount),
            row.counterparty
        ));
    }
}

/// 渲染为文本报表
pub fn render_report(report: &ComBSReport) -> String {
    let mut out = String::new();
    render_table(&mut out, "买入榜", &report.buy);
    render_table(&mut out, "卖出榜", &report.sell);
    out
}

/// 打印到标准输出
pub fn print_report(report: &ComBSReport) {
    print!("{}", render_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::billboard::sina::{parse_combs_detail, tests::DETAILS_BODY};

    #[test]
    fn test_build_report() {
        let detail = parse_combs_detail(DETAILS_BODY, "000973", "2024-03-08").unwrap();
        let report = build_report(&detail);

        assert_eq!(report.buy.len(), 2);
        assert_eq!(report.buy[0].rank, 1);
        assert_eq!(report.buy[1].rank, 2);
        assert_eq!(report.buy[1].counterparty, "华泰证券股份有限公司浙江分公司");
        assert_eq!(report.sell[0].rank, 1);
        assert_eq!(report.sell[0].net_amount, Some(-2947.838));
    }

    #[test]
    fn test_render_report() {
        let detail = parse_combs_detail(DETAILS_BODY, "000973", "2024-03-08").unwrap();
        let text = render_report(&build_report(&detail));
        println!("{}", text);

        let lines: Vec<&str> = text.lines().collect();
        // 两个表头 + 2 行买入 + 1 行卖出
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("买入榜"));
        assert!(lines[1].starts_with("1    000973"));
        assert!(lines[1].contains("2101.49"));
        assert!(lines[1].ends_with("浙商证券股份有限公司临安万马路证券营业部"));
        assert!(lines[3].contains("卖出榜"));
        assert!(lines[4].contains("-2947.838"));
    }

    #[test]
    fn test_render_missing_amount() {
        let report = ComBSReport {
            buy: vec![ComBSReportRow {
                rank: 1,
                code: "600000".into(),
                sell_amount: None,
                buy_amount: Some(1.5),
                net_amount: None,
                counterparty: "机构专用".into(),
            }],
            sell: vec![],
        };
        let text = render_report(&report);
        assert!(text.contains("--"));
        assert_eq!(text.lines().count(), 3);
    }
}
