// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 商品条目
///
/// 表示发现阶段从搜索接口和详情接口解析出的单个商品。
/// 标识符 `id` 在单个商店命名空间内唯一，条目一经解析即不可变，
/// 由发现阶段产出、调度器消费。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 商品标识符，商店内唯一
    pub id: String,
    /// 商品条码（EAN），详情接口可能缺失
    pub ean: Option<String>,
    /// 商品页面完整URL
    pub url: String,
    /// 商品名称，详情接口可能缺失
    pub name: Option<String>,
    /// 发现时的参考价格，详情接口可能缺失
    pub price: Option<f64>,
    /// 抓取价格时使用的页面选择器
    pub selector: String,
}

/// 单个商店的商品目录
///
/// 以商品标识符为键的有序映射。键的有序性保证了每次调度
/// 遍历的顺序是确定的；调用方不应依赖任何其他排序语义。
pub type ShopCatalog = BTreeMap<String, Item>;

/// 全量商品目录：商店名 → 商品标识符 → 商品条目
pub type Catalog = BTreeMap<String, ShopCatalog>;

/// 将一批商品条目合并进目录
///
/// 以商品标识符为键做幂等合并：重复的标识符由后到的条目覆盖，
/// 相同内容的覆盖是无操作。详情批次在重试时可能返回重叠的
/// 标识符，该合并保证目录内不会出现重复条目。
pub fn merge_items(catalog: &mut ShopCatalog, items: impl IntoIterator<Item = Item>) {
    for item in items {
        catalog.insert(item.id.clone(), item);
    }
}
