//! 行数据规整
//!
//! 顺序：按位置重命名列 -> 修正特殊行 -> 数值转换 -> 单位换算/比例 -> 代码补零

use super::common::{round2, zfill_code, TEN_THOUSAND};
use super::error::{BillboardError, Result};
use super::table::{Cell, Table};
use crate::models::{
    BrokerTopStat, InstTopStat, InstitutionDetailRecord, StockTopStat, TopListRecord,
};

/// 目标列定义
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    /// 重命名前需要丢弃的原始列位置
    pub dropped: &'static [usize],
}

/// 东方财富每日龙虎榜 JSON 字段
pub const TOP_LIST_RAW: ColumnSchema = ColumnSchema {
    name: "top_list_raw",
    columns: &["SCode", "SName", "Chgradio", "ZeMoney", "Bmoney", "Smoney", "Ctypedes", "Turnover"],
    dropped: &[],
};

pub const TOP_LIST: ColumnSchema = ColumnSchema {
    name: "top_list",
    columns: &["code", "name", "pchange", "amount", "buy", "sell", "reason", "Turnover"],
    dropped: &[],
};

pub const STOCK_TOPS: ColumnSchema = ColumnSchema {
    name: "cap_tops",
    columns: &["code", "name", "count", "bamount", "samount", "net", "bcount", "scount"],
    dropped: &[],
};

pub const BROKER_TOPS: ColumnSchema = ColumnSchema {
    name: "broker_tops",
    columns: &["broker", "count", "bamount", "bcount", "samount", "scount", "top3"],
    dropped: &[],
};

pub const INST_TOPS: ColumnSchema = ColumnSchema {
    name: "inst_tops",
    columns: &["code", "name", "bamount", "bcount", "samount", "scount", "net"],
    dropped: &[2, 3],
};

pub const INST_DETAIL: ColumnSchema = ColumnSchema {
    name: "inst_detail",
    columns: &["code", "name", "date", "bamount", "samount", "type"],
    dropped: &[],
};

/// 明细宽表的列数，错位修正只作用于这种行
const WIDE_ROW: usize = 12;

/// 按位置丢弃列
pub fn drop_positions(table: &mut Table, positions: &[usize]) {
    if positions.is_empty() {
        return;
    }
    let keep = |i: &usize| !positions.contains(i);
    table.columns = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| keep(i))
        .map(|(_, c)| c.clone())
        .collect();
    for row in table.rows.iter_mut() {
        *row = row
            .drain(..)
            .enumerate()
            .filter(|(i, _)| keep(i))
            .map(|(_, c)| c)
            .collect();
    }
}

/// 按位置将列重命名为目标列名；已是目标列名时不做任何修改
pub fn rename_columns(table: &mut Table, schema: &ColumnSchema) -> Result<()> {
    if table.columns.iter().map(String::as_str).eq(schema.columns.iter().copied()) {
        return Ok(());
    }
    if table.width() != schema.columns.len() {
        return Err(BillboardError::decode(format!(
            "{} 列数不符: 期望 {}，实际 {}",
            schema.name,
            schema.columns.len(),
            table.width()
        )));
    }
    table.columns = schema.columns.iter().map(|c| c.to_string()).collect();
    Ok(())
}

/// 丢弃多余列并重命名
pub fn apply_schema(table: &mut Table, schema: &ColumnSchema) -> Result<()> {
    if table.width() == schema.columns.len() + schema.dropped.len() {
        drop_positions(table, schema.dropped);
    }
    rename_columns(table, schema)
}

/// 错位行修正
///
/// 第 4 个字段含 `%` 的宽行是错位行：末列取第 7 列的值，第 7~11 列取第 2~6 列，
/// 第 2~6 列置空。这是沿用的经验规则，页面结构变化时可能误判。
pub fn realign_shifted_row(row: &mut [Cell]) -> bool {
    if row.len() < WIDE_ROW {
        return false;
    }
    let shifted = row[3].as_deref().is_some_and(|s| s.contains('%'));
    if !shifted {
        return false;
    }
    row[11] = row[6].clone();
    for i in 6..11 {
        row[i] = row[i - 5].clone();
    }
    for cell in row.iter_mut().take(6).skip(1) {
        *cell = None;
    }
    true
}

/// 存在 code 列时左侧补零至 6 位
pub fn pad_codes(table: &mut Table) {
    if let Some(idx) = table.column_index("code") {
        for row in table.rows.iter_mut() {
            if let Some(Some(code)) = row.get_mut(idx) {
                *code = zfill_code(code);
            }
        }
    }
}

/// 元 -> 万元
pub fn to_ten_thousand(raw: f64) -> f64 {
    raw / TEN_THOUSAND
}

/// 占总成交比例，成交额为 0 或缺失时为空
pub fn ratio(part: Option<f64>, turnover: Option<f64>) -> Option<f64> {
    match (part, turnover) {
        (Some(p), Some(t)) if t != 0.0 => Some(round2(p / t)),
        _ => None,
    }
}

// ==================== 各接口规整 ====================

/// 每日龙虎榜：金额换算为万元，计算买卖占比
pub fn normalize_top_list(mut table: Table, date: &str) -> Result<Vec<TopListRecord>> {
    rename_columns(&mut table, &TOP_LIST)?;
    pad_codes(&mut table);

    let scaled = |v: Option<f64>| v.map(|x| round2(to_ten_thousand(x)));

    Ok(table
        .iter()
        .map(|row| {
            let buy = row.float("buy");
            let sell = row.float("sell");
            let turnover = row.float("Turnover");
            TopListRecord {
                code: row.text("code"),
                name: row.text("name"),
                pchange: row.float("pchange").map(round2),
                amount: scaled(row.float("amount")),
                buy: scaled(buy),
                bratio: ratio(buy, turnover),
                sell: scaled(sell),
                sratio: ratio(sell, turnover),
                reason: row.text("reason"),
                date: date.to_string(),
            }
        })
        .collect())
}

pub fn normalize_stock_tops(mut table: Table) -> Result<Vec<StockTopStat>> {
    apply_schema(&mut table, &STOCK_TOPS)?;
    pad_codes(&mut table);
    Ok(table
        .iter()
        .map(|row| StockTopStat {
            code: row.text("code"),
            name: row.text("name"),
            count: row.count("count"),
            bamount: row.float("bamount"),
            samount: row.float("samount"),
            net: row.float("net"),
            bcount: row.count("bcount"),
            scount: row.count("scount"),
        })
        .collect())
}

pub fn normalize_broker_tops(mut table: Table) -> Result<Vec<BrokerTopStat>> {
    apply_schema(&mut table, &BROKER_TOPS)?;
    Ok(table
        .iter()
        .map(|row| BrokerTopStat {
            broker: row.text("broker"),
            count: row.count("count"),
            bamount: row.float("bamount"),
            bcount: row.count("bcount"),
            samount: row.float("samount"),
            scount: row.count("scount"),
            top3: row.text("top3"),
        })
        .collect())
}

pub fn normalize_inst_tops(mut table: Table) -> Result<Vec<InstTopStat>> {
    apply_schema(&mut table, &INST_TOPS)?;
    pad_codes(&mut table);
    Ok(table
        .iter()
        .map(|row| InstTopStat {
            code: row.text("code"),
            name: row.text("name"),
            bamount: row.float("bamount"),
            bcount: row.count("bcount"),
            samount: row.float("samount"),
            scount: row.count("scount"),
            net: row.float("net"),
        })
        .collect())
}

/// 机构席位明细
///
/// 宽表先修正错位行，前 6 列按目标列解析，其余列原样放入 `extra`
pub fn normalize_inst_detail(mut table: Table) -> Result<Vec<InstitutionDetailRecord>> {
    let width = INST_DETAIL.columns.len();
    let mut extras = Vec::with_capacity(table.len());
    if table.width() >= WIDE_ROW {
        let mut shifted = 0;
        for row in table.rows.iter_mut() {
            if realign_shifted_row(row) {
                shifted += 1;
            }
            extras.push(row.split_off(width));
        }
        if shifted > 0 {
            log::debug!("机构席位明细修正错位行 {} 条", shifted);
        }
        table.columns.truncate(width);
    }
    rename_columns(&mut table, &INST_DETAIL)?;
    pad_codes(&mut table);

    let mut extras = extras.into_iter();
    Ok(table
        .iter()
        .map(|row| InstitutionDetailRecord {
            code: row.text("code"),
            name: row.opt_text("name"),
            date: row.opt_text("date"),
            bamount: row.float("bamount"),
            samount: row.float("samount"),
            kind: row.opt_text("type"),
            extra: extras.next().unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_rename_idempotent() {
        let mut table = Table::positional(vec![cells(&[
            "1", "平安银行", "3", "100", "50", "50", "2", "1",
        ])]);
        rename_columns(&mut table, &STOCK_TOPS).unwrap();
        let once = table.clone();
        rename_columns(&mut table, &STOCK_TOPS).unwrap();
        assert_eq!(table, once);
        assert_eq!(table.columns, STOCK_TOPS.columns);
    }

    #[test]
    fn test_rename_width_mismatch() {
        let mut table = Table::positional(vec![cells(&["1", "2", "3"])]);
        assert!(matches!(
            rename_columns(&mut table, &BROKER_TOPS),
            Err(BillboardError::Decode(_))
        ));
    }

    #[test]
    fn test_inst_tops_drops_positions() {
        let table = Table::positional(vec![cells(&[
            "2594", "比亚迪", "x", "y", "1200.5", "3", "300", "1", "900.5",
        ])]);
        let rows = normalize_inst_tops(table).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.code, "002594");
        assert_eq!(r.name, "比亚迪");
        assert_eq!(r.bamount, Some(1200.5));
        assert_eq!(r.bcount, Some(3));
        assert_eq!(r.samount, Some(300.0));
        assert_eq!(r.scount, Some(1));
        assert_eq!(r.net, Some(900.5));
    }

    #[test]
    fn test_realign_shifted_row() {
        let mut row = cells(&[
            "600000", "a", "b", "9.98%", "c", "d", "reason", "e", "f", "g", "h", "i",
        ]);
        assert!(realign_shifted_row(&mut row));
        assert_eq!(row[0].as_deref(), Some("600000"));
        for cell in &row[1..6] {
            assert_eq!(*cell, None);
        }
        assert_eq!(row[6].as_deref(), Some("a"));
        assert_eq!(row[7].as_deref(), Some("b"));
        assert_eq!(row[8].as_deref(), Some("9.98%"));
        assert_eq!(row[9].as_deref(), Some("c"));
        assert_eq!(row[10].as_deref(), Some("d"));
        assert_eq!(row[11].as_deref(), Some("reason"));

        let mut plain = cells(&["600000", "a", "b", "100", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let before = plain.clone();
        assert!(!realign_shifted_row(&mut plain));
        assert_eq!(plain, before);

        let mut narrow = cells(&["1", "a", "b", "5%", "c", "d"]);
        assert!(!realign_shifted_row(&mut narrow));
    }

    #[test]
    fn test_inst_detail_wide_rows() {
        let table = Table::positional(vec![
            cells(&["1", "平安银行", "2024-03-08", "5%", "x", "y", "z", "", "", "", "", ""]),
            cells(&["2", "万科A", "2024-03-08", "120.5", "0", "机构买入", "", "", "", "", "", ""]),
        ]);
        let rows = normalize_inst_detail(table).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].code, "000001");
        assert_eq!(rows[0].name, None);
        assert_eq!(rows[0].date, None);
        assert_eq!(rows[0].bamount, None);
        assert_eq!(rows[0].samount, None);
        assert_eq!(rows[0].kind, None);
        assert_eq!(
            rows[0].extra,
            vec![
                Some("平安银行".to_string()),
                Some("2024-03-08".to_string()),
                Some("5%".to_string()),
                Some("x".to_string()),
                Some("y".to_string()),
                Some("z".to_string()),
            ]
        );

        assert_eq!(rows[1].code, "000002");
        assert_eq!(rows[1].name.as_deref(), Some("万科A"));
        assert_eq!(rows[1].bamount, Some(120.5));
        assert_eq!(rows[1].kind.as_deref(), Some("机构买入"));
        assert_eq!(rows[1].extra, vec![Some(String::new()); 6]);
    }

    #[test]
    fn test_inst_detail_narrow_rows_have_no_extra() {
        let table = Table::positional(vec![cells(&[
            "600000", "浦发银行", "2024-03-08", "0", "500", "机构卖出",
        ])]);
        let rows = normalize_inst_detail(table).unwrap();
        assert_eq!(rows[0].samount, Some(500.0));
        assert!(rows[0].extra.is_empty());
    }

    #[test]
    fn test_unit_rescaling() {
        assert_eq!(to_ten_thousand(12_345_000.0), 1234.5);
        assert_eq!(round2(to_ten_thousand(12_345_678.0)), 1234.57);
    }

    #[test]
    fn test_normalize_top_list() {
        let table = Table::with_columns(
            TOP_LIST_RAW.columns,
            vec![cells(&[
                "1", "平安银行", "10.01", "12345000", "6000000", "2000000", "日涨幅偏离值达7%", "40000000",
            ])],
        );
        let rows = normalize_top_list(table, "2024-03-08").unwrap();
        let r = &rows[0];
        assert_eq!(r.code, "000001");
        assert_eq!(r.amount, Some(1234.5));
        assert_eq!(r.buy, Some(600.0));
        assert_eq!(r.sell, Some(200.0));
        assert_eq!(r.bratio, Some(0.15));
        assert_eq!(r.sratio, Some(0.05));
        assert_eq!(r.date, "2024-03-08");
        assert_eq!(r.reason, "日涨幅偏离值达7%");
    }

    #[test]
    fn test_ratio_zero_turnover() {
        assert_eq!(ratio(Some(1.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(1.0)), None);
    }
}
