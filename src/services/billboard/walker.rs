//! 分页抓取
//!
//! 逐页请求 -> 解码 -> 规整 -> 查找下一页，直到没有下一页为止。
//! 下一页页码只能从当前页内容中得到，因此页与页之间严格串行。

use async_trait::async_trait;
use serde::Serialize;

use super::error::Result;
use super::retry::RetryPolicy;

/// 单页数据
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub next_page: Option<u32>,
}

/// 分页数据源
#[async_trait]
pub trait PageSource: Send + Sync {
    type Row: Send;

    /// 日志中使用的名称
    fn name(&self) -> String;

    async fn fetch_page(&self, page: u32) -> Result<Page<Self::Row>>;
}

/// 分页抓取结果，`warning` 非空表示数据不完整
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResult<T> {
    pub rows: Vec<T>,
    /// 成功抓取的页数
    pub pages: u32,
    pub warning: Option<String>,
}

impl<T> PagedResult<T> {
    pub fn is_complete(&self) -> bool {
        self.warning.is_none()
    }

    pub fn map_rows<F>(self, f: F) -> Self
    where
        F: FnOnce(Vec<T>) -> Vec<T>,
    {
        Self {
            rows: f(self.rows),
            ..self
        }
    }
}

pub struct PageWalker {
    retry: RetryPolicy,
    max_pages: u32,
}

impl PageWalker {
    pub fn new(retry: RetryPolicy, max_pages: u32) -> Self {
        Self { retry, max_pages }
    }

    /// 从第 1 页开始抓取
    ///
    /// 单页重试用尽时不返回错误，而是带上警告返回已累积的数据
    pub async fn walk<S: PageSource>(&self, source: &S) -> PagedResult<S::Row> {
        let name = source.name();
        let mut rows = Vec::new();
        let mut pages = 0;
        let mut page = 1;
        let mut warning = None;

        loop {
            if pages >= self.max_pages {
                let msg = format!("{} 已达到最大页数 {}，剩余页面未抓取", name, self.max_pages);
                log::warn!("{}", msg);
                warning = Some(msg);
                break;
            }

            log::info!("📡 抓取 {} 第 {} 页", name, page);
            let what = format!("{} 第 {} 页", name, page);
            let fetched = self.retry.run(&what, move || source.fetch_page(page)).await;

            match fetched {
                Ok(p) => {
                    pages += 1;
                    rows.extend(p.rows);
                    match p.next_page {
                        Some(next) if next > page => page = next,
                        Some(next) => {
                            log::warn!("{} 下一页页码 {} 未前进，停止翻页", name, next);
                            break;
                        }
                        None => break,
                    }
                }
                Err(e) => {
                    let msg = format!("{}，已返回前 {} 页的数据", e, pages);
                    log::warn!("{}", msg);
                    warning = Some(msg);
                    break;
                }
            }
        }

        log::info!("📊 {} 共 {} 页 {} 条数据", name, pages, rows.len());
        PagedResult {
            rows,
            pages,
            warning,
        }
    }
}
