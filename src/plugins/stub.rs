// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price_event::PriceEvent;
use crate::domain::models::task::TaskItem;
use crate::plugins::traits::{PriceEventStream, ShopPlugin};
use chrono::Utc;
use futures::stream;

/// 占位价格插件
///
/// 对批次内每个商品产出一条固定价格的事件，用于在真实抓取
/// 逻辑接入前端到端地验证整条流水线。
pub struct StubPlugin {
    shop: String,
    price: f64,
}

impl StubPlugin {
    /// 创建新的占位价格插件
    pub fn new(shop: impl Into<String>, price: f64) -> Self {
        Self {
            shop: shop.into(),
            price,
        }
    }
}

impl ShopPlugin for StubPlugin {
    fn shop(&self) -> &str {
        &self.shop
    }

    fn fetch_batch(&self, items: Vec<TaskItem>) -> PriceEventStream<'_> {
        let shop = self.shop.clone();
        let price = self.price;
        let observed_at = Utc::now();

        Box::pin(stream::iter(items.into_iter().map(move |item| {
            Ok(PriceEvent {
                shop: shop.clone(),
                id: item.id,
                ean: item.ean,
                price,
                observed_at,
            })
        })))
    }
}
