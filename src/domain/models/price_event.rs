// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 价格事件
///
/// 表示某个商店对单个商品的一次价格观测，由商店插件产出、
/// 逐条发布到事件流。事件之间没有批次级原子性；下游消费者
/// 按 `(shop, id, observed_at)` 去重以容忍重复投递。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEvent {
    /// 观测来源商店名
    pub shop: String,
    /// 商品标识符
    pub id: String,
    /// 商品条码（EAN），可能缺失
    pub ean: Option<String>,
    /// 观测到的价格
    pub price: f64,
    /// 观测时间戳
    pub observed_at: DateTime<Utc>,
}
