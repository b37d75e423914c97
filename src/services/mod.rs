//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod billboard; // 龙虎榜数据服务
