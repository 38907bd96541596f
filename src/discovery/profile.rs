// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item::Item;
use serde::Deserialize;
use serde_json::Value;

/// 商店接入配置
///
/// 描述一个商店的搜索接口、详情接口以及把详情记录映射为
/// 商品条目所需的字段提取规则。URL模板中 `{page}` 与 `{ids}`
/// 占位符分别在分页遍历和详情解析时被替换。
#[derive(Debug, Clone, Deserialize)]
pub struct ShopProfile {
    /// 搜索接口URL模板，包含 `{page}` 占位符
    pub search_url: String,
    /// 详情接口URL模板，包含 `{ids}` 占位符
    pub details_url: String,
    /// 拼接在相对商品URL前面的前缀
    #[serde(default)]
    pub url_prefix: String,
    /// 写入商品条目的页面选择器
    pub selector: String,
    /// 接口第一页的页码（逻辑页1映射到的端点页码）
    #[serde(default)]
    pub first_page_index: u32,
}

impl ShopProfile {
    /// interdiscount 的默认接入配置
    ///
    /// 该端点的分页是0起始的，逻辑页1映射到端点页0。
    pub fn interdiscount() -> Self {
        Self {
            search_url: "https://www.interdiscount.ch/idocc/occ/id/products/search\
                         ?lang=de&query=apple%3Arelevance%3Abrand%3AAPPLE&pageSize=24&page={page}"
                .to_string(),
            details_url: "https://www.interdiscount.ch/api/v1/products\
                          ?ids={ids}&locale=de&fieldSet=DEFAULT"
                .to_string(),
            url_prefix: "https://www.interdiscount.ch".to_string(),
            selector: "script[type=\"application/ld+json\"]".to_string(),
            first_page_index: 0,
        }
    }

    /// 生成逻辑页 `page`（1起始）的搜索URL
    pub fn search_page_url(&self, page: u32) -> String {
        let endpoint_page = self.first_page_index + page - 1;
        self.search_url.replace("{page}", &endpoint_page.to_string())
    }

    /// 生成一组标识符的详情URL，标识符以逗号连接
    pub fn details_batch_url(&self, ids: &[String]) -> String {
        self.details_url.replace("{ids}", &ids.join(","))
    }

    /// 把一条详情记录映射为商品条目
    ///
    /// 缺失的可选字段降级为 `None`；缺少标识符的记录返回 `None`，
    /// 由调用方跳过而不是使整次发现失败。
    pub fn map_detail(&self, record: &Value) -> Option<Item> {
        let id = record.get("code").and_then(Value::as_str)?.to_string();
        let relative_url = record.get("url").and_then(Value::as_str).unwrap_or("");

        Some(Item {
            id,
            ean: record
                .get("ean")
                .and_then(Value::as_str)
                .map(str::to_string),
            url: format!("{}{}", self.url_prefix, relative_url),
            name: record
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            price: record
                .get("finalPrice")
                .and_then(|p| p.get("value"))
                .and_then(Value::as_f64),
            selector: self.selector.clone(),
        })
    }
}
