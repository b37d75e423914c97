//! 解码后的行列数据
//!
//! 单元格为 `None` 表示缺失值

use serde_json::Value;

use super::common::parse_float;

pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 按位置命名列（"0", "1", ...），列数取最宽的行，短行补空
    pub fn positional(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, None);
        }
        Self {
            columns: (0..width).map(|i| i.to_string()).collect(),
            rows,
        }
    }

    pub fn with_columns(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }
}

/// JSON 值转单元格，null 和空字符串视为缺失
pub fn json_cell(value: Option<&Value>) -> Cell {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// 按列名读取一行
pub struct RowRef<'t> {
    columns: &'t [String],
    cells: &'t [Cell],
}

impl<'t> RowRef<'t> {
    pub fn get(&self, name: &str) -> Option<&'t str> {
        let idx = self.columns.iter().position(|c| c == name)?;
        self.cells.get(idx)?.as_deref()
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(parse_float)
    }

    pub fn count(&self, name: &str) -> Option<u32> {
        self.float(name).filter(|v| *v >= 0.0).map(|v| v as u32)
    }
}
