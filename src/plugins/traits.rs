// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price_event::PriceEvent;
use crate::domain::models::task::TaskItem;
use futures::stream::BoxStream;
use thiserror::Error;

/// 插件错误类型
#[derive(Error, Debug)]
pub enum PluginError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 其他错误
    #[error("Plugin error: {0}")]
    Other(String),
}

/// 价格事件序列
///
/// 有限、单遍、不可重启的惰性序列。消费者每取出一条事件就立即
/// 转发，中途失败时已取出的事件保持有效。
pub type PriceEventStream<'a> = BoxStream<'a, Result<PriceEvent, PluginError>>;

/// 商店插件特质
///
/// 每个商店一个实现，封装该商店的价格抓取逻辑。宿主在关停时
/// 直接丢弃序列即可实现协作取消，插件不得依赖序列被完整消费。
pub trait ShopPlugin: Send + Sync {
    /// 插件服务的商店名
    fn shop(&self) -> &str;

    /// 对一个批次执行抓取
    ///
    /// 产出的事件可能少于批次内的商品数（单个商品抓取失败时
    /// 静默跳过）；序列本身的失败表示整个批次处理中断。
    fn fetch_batch(&self, items: Vec<TaskItem>) -> PriceEventStream<'_>;
}
