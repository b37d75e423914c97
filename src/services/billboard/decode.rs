//! 响应解码
//!
//! - JS 变量形式：`<前缀>=<对象字面量>`，去掉前缀后交给宽松字面量解析
//! - HTML 表格形式：GBK 编码页面，取 `table#dataTable` 的所有行，
//!   重新包装成独立的 `<table>` 片段后逐行解析

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;

use super::common::SINA_TABLE_ID;
use super::error::{BillboardError, Result};
use super::literal::parse_literal;
use super::table::{Cell, Table};

/// 一页解码结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPage {
    pub table: Table,
    /// 翻页控件指向的页码
    pub next_page: Option<u32>,
}

/// GBK 字节转字符串
pub fn decode_gbk(bytes: &[u8]) -> String {
    encoding_rs::GBK.decode(bytes).0.into_owned()
}

/// 解析 `<前缀><marker><字面量>` 形式的响应
pub fn decode_js_variable(text: &str, marker: &str) -> Result<Value> {
    let (_, literal) = text
        .split_once(marker)
        .ok_or_else(|| BillboardError::decode(format!("响应中未找到变量标记 {}", marker)))?;
    let value = parse_literal(literal.trim())?;
    // 转一次严格 JSON，保证键名全部为字符串
    let strict = serde_json::to_string(&value)?;
    Ok(serde_json::from_str(&strict)?)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("静态选择器")
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("静态正则"))
}

/// 解析新浪统计页面
pub fn decode_html_table(html: &str) -> Result<DecodedPage> {
    let document = Html::parse_document(html);

    let table_sel = selector(&format!("table#{}", SINA_TABLE_ID));
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| BillboardError::decode(format!("未找到 #{} 表格", SINA_TABLE_ID)))?;

    let fragment: String = direct_rows(table).map(|row| row.html()).collect();
    let rows = parse_table_fragment(&format!("<table>{}</table>", fragment));
    if rows.is_empty() {
        return Err(BillboardError::decode("数据表格中没有数据行"));
    }

    Ok(DecodedPage {
        table: Table::positional(rows),
        next_page: find_next_page(&document),
    })
}

/// 表格自身的行：直接子行，以及解析器补出的 `<tbody>` 中的行
///
/// `<thead>`、`<tfoot>` 中的行不算
fn direct_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .flat_map(|child| match child.value().name() {
            "tr" => vec![child],
            "tbody" => child
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|row| row.value().name() == "tr")
                .collect(),
            _ => Vec::new(),
        })
}

/// 把 `<table>` 片段解析为按行排列的单元格，纯表头行跳过
fn parse_table_fragment(fragment: &str) -> Vec<Vec<Cell>> {
    let doc = Html::parse_fragment(fragment);
    let tr = selector("tr");
    let td = selector("td");
    let cell_sel = selector("td, th");

    let mut rows = Vec::new();
    for row in doc.select(&tr) {
        if row.select(&td).next().is_none() {
            continue;
        }
        let cells: Vec<Cell> = row.select(&cell_sel).map(cell_text).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        rows.push(cells);
    }
    rows
}

fn cell_text(cell: ElementRef<'_>) -> Cell {
    let text = cell.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// 翻页控件 `div.pages` 中最后一个链接的 onclick 里的第一个数字
pub fn find_next_page(document: &Html) -> Option<u32> {
    let sel = selector("div.pages > a");
    let last = document.select(&sel).last()?;
    let onclick = last.value().attr("onclick")?;
    digits_re().find(onclick)?.as_str().parse().ok()
}
