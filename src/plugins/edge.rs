// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price_event::PriceEvent;
use crate::domain::models::task::TaskItem;
use crate::plugins::traits::{PluginError, PriceEventStream, ShopPlugin};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// 边缘代理插件
///
/// 把商品页面的价格提取委托给边缘代理：对批次内每个商品请求
/// `GET {edge}?url=…&selector=…`，代理返回 `{"price": …}`。
/// 单个商品未命中价格时跳过该商品，传输层失败则中断整个序列。
pub struct EdgeProxyPlugin {
    shop: String,
    edge_url: String,
    client: reqwest::Client,
}

impl EdgeProxyPlugin {
    /// 创建新的边缘代理插件
    ///
    /// # 参数
    ///
    /// * `shop` - 插件服务的商店名
    /// * `edge_url` - 边缘代理入口URL
    pub fn new(shop: impl Into<String>, edge_url: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            edge_url: edge_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_one(&self, item: TaskItem) -> Result<Option<PriceEvent>, PluginError> {
        let url = Url::parse_with_params(
            &self.edge_url,
            &[("url", item.url.as_str()), ("selector", item.selector.as_str())],
        )
        .map_err(|e| PluginError::Other(format!("Invalid edge proxy URL: {}", e)))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            // The edge proxy answers 404 when no price matched the selector
            warn!(
                shop = %self.shop,
                id = %item.id,
                status = response.status().as_u16(),
                "Edge proxy found no price, skipping item"
            );
            return Ok(None);
        }

        let body: Value = response.json().await?;
        let Some(price) = parse_price(body.get("price")) else {
            warn!(shop = %self.shop, id = %item.id, "Edge proxy returned unusable price, skipping item");
            return Ok(None);
        };

        Ok(Some(PriceEvent {
            shop: self.shop.clone(),
            id: item.id,
            ean: item.ean,
            price,
            observed_at: Utc::now(),
        }))
    }
}

impl ShopPlugin for EdgeProxyPlugin {
    fn shop(&self) -> &str {
        &self.shop
    }

    fn fetch_batch(&self, items: Vec<TaskItem>) -> PriceEventStream<'_> {
        Box::pin(
            stream::iter(items)
                .then(move |item| self.fetch_one(item))
                .filter_map(|outcome| async move { outcome.transpose() }),
        )
    }
}

/// 解析代理返回的价格字段
///
/// 代理可能返回数字、数字字符串或null。
fn parse_price(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', ".").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "edge_test.rs"]
mod tests;
