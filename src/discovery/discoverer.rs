// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::discovery::profile::ShopProfile;
use crate::domain::models::item::{merge_items, ShopCatalog};
use crate::fetcher::http_fetcher::{FetchError, HttpFetcher};
use futures::stream::{self, StreamExt, TryStreamExt};
use metrics::counter;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// 发现错误类型
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// 单次页面或详情批次抓取在重试预算耗尽后失败，整次发现中止
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// 商品发现器
///
/// 遍历分页搜索接口收集商品标识符，再按固定分组调用详情接口，
/// 合并为单个商店的去重目录。任何一次抓取的硬失败都会中止整次
/// 发现，不提交截断的目录。
pub struct Discoverer {
    fetcher: Arc<HttpFetcher>,
    /// 详情接口单次请求的标识符数量
    detail_batch_size: usize,
    /// 分页抓取的并发上限
    fanout_limit: usize,
}

impl Discoverer {
    /// 创建新的商品发现器
    ///
    /// # 参数
    ///
    /// * `fetcher` - 共享的HTTP抓取客户端
    /// * `detail_batch_size` - 详情批次大小
    /// * `fanout_limit` - 分页抓取并发上限
    pub fn new(fetcher: Arc<HttpFetcher>, detail_batch_size: usize, fanout_limit: usize) -> Self {
        Self {
            fetcher,
            detail_batch_size: detail_batch_size.max(1),
            fanout_limit: fanout_limit.max(1),
        }
    }

    /// 发现一个商店的完整商品目录
    pub async fn discover(
        &self,
        shop: &str,
        profile: &ShopProfile,
    ) -> Result<ShopCatalog, DiscoveryError> {
        let ids = self.collect_ids(shop, profile).await?;
        info!(shop = shop, ids = ids.len(), "Product ids collected");

        let catalog = self.resolve_details(shop, profile, &ids).await?;
        info!(shop = shop, items = catalog.len(), "Discovery run complete");
        Ok(catalog)
    }

    /// 遍历所有搜索页并按首见顺序收集去重后的商品标识符
    ///
    /// 页码从逻辑页1开始，包含 `numberOfPages` 为止的每一页。
    /// 缺失分页元数据时按单页处理。
    async fn collect_ids(
        &self,
        shop: &str,
        profile: &ShopProfile,
    ) -> Result<Vec<String>, DiscoveryError> {
        let first_page = self.fetch_page(shop, profile, 1).await?;
        let pagination = first_page.get("pagination");
        let total = pagination
            .and_then(|p| p.get("totalNumberOfResults"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let number_of_pages = pagination
            .and_then(|p| p.get("numberOfPages"))
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .max(1) as u32;
        info!(
            shop = shop,
            total = total,
            pages = number_of_pages,
            "Search pagination resolved"
        );

        // Remaining pages fetched with bounded fan-out; results are keyed by
        // page number so the merge order does not depend on completion order
        let mut page_codes: Vec<(u32, Vec<String>)> = stream::iter(2..=number_of_pages)
            .map(|page| async move {
                let document = self.fetch_page(shop, profile, page).await?;
                Ok::<_, DiscoveryError>((page, extract_codes(&document)))
            })
            .buffer_unordered(self.fanout_limit)
            .try_collect()
            .await?;
        page_codes.sort_by_key(|(page, _)| *page);

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for code in extract_codes(&first_page)
            .into_iter()
            .chain(page_codes.into_iter().flat_map(|(_, codes)| codes))
        {
            if seen.insert(code.clone()) {
                ids.push(code);
            }
        }
        Ok(ids)
    }

    /// 按固定分组调用详情接口并合并为去重目录
    ///
    /// 合并按标识符幂等覆盖，相邻批次在重试时返回重叠标识符
    /// 也不会产生重复条目。
    async fn resolve_details(
        &self,
        shop: &str,
        profile: &ShopProfile,
        ids: &[String],
    ) -> Result<ShopCatalog, DiscoveryError> {
        let mut catalog = ShopCatalog::new();
        for group in ids.chunks(self.detail_batch_size) {
            let url = profile.details_batch_url(group);
            let document = self.fetcher.fetch(&url).await?;
            counter!("discovery_detail_batches_total").increment(1);

            let items = detail_records(&document)
                .iter()
                .filter_map(|record| profile.map_detail(record))
                .collect::<Vec<_>>();
            debug!(
                shop = shop,
                requested = group.len(),
                resolved = items.len(),
                "Detail batch resolved"
            );
            merge_items(&mut catalog, items);
        }
        Ok(catalog)
    }

    async fn fetch_page(
        &self,
        shop: &str,
        profile: &ShopProfile,
        page: u32,
    ) -> Result<Value, DiscoveryError> {
        debug!(shop = shop, page = page, "Checking search page");
        let document = self.fetcher.fetch(&profile.search_page_url(page)).await?;
        counter!("discovery_pages_fetched_total").increment(1);
        Ok(document)
    }
}

/// 从搜索页文档中提取商品标识符
fn extract_codes(document: &Value) -> Vec<String> {
    document
        .get("products")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .filter_map(|p| p.get("code").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// 从详情响应中取出记录列表
///
/// 详情接口可能返回记录数组，也可能返回包装对象；两种形态都要
/// 接受：对象优先取其 `products` 数组，否则按单条记录处理。
fn detail_records(document: &Value) -> Vec<Value> {
    match document {
        Value::Array(records) => records.clone(),
        Value::Object(map) => match map.get("products").and_then(Value::as_array) {
            Some(records) => records.clone(),
            None => vec![document.clone()],
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "discoverer_test.rs"]
mod tests;
