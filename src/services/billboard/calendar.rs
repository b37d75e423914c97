//! 交易日历
//!
//! 周末和配置中列出的节假日为非交易日

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use chrono_tz::Tz;
use std::collections::HashSet;

use super::common::parse_date;
use super::error::Result;
use crate::config::CalendarConfig;

/// 回溯查找交易日时最多检查的天数
const MAX_LOOKBACK_DAYS: i64 = 366;

pub trait TradingCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// `date` 之前（不含）最近的交易日
    fn last_trading_date(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date;
        for _ in 0..MAX_LOOKBACK_DAYS {
            day -= Duration::days(1);
            if !self.is_holiday(day) {
                return day;
            }
        }
        date - Duration::days(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let holidays = config
            .holidays
            .iter()
            .map(|d| parse_date(d))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(holidays))
    }
}

impl TradingCalendar for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.holidays.contains(&date)
    }
}

/// 未指定日期时的默认交易日
///
/// 龙虎榜当日数据在 `publish_hour` 点（北京时间）之后公布，
/// 之前取上一个交易日；当天不是交易日时同样取上一个交易日
pub fn default_trade_date<C: TradingCalendar + ?Sized>(
    calendar: &C,
    now: chrono::DateTime<Tz>,
    publish_hour: u32,
) -> NaiveDate {
    let today = now.date_naive();
    if now.hour() < publish_hour || calendar.is_holiday(today) {
        calendar.last_trading_date(today)
    } else {
        today
    }
}
