// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item::Item;
use serde::{Deserialize, Serialize};

/// 任务批次
///
/// 表示调度器产出的一个有界抓取工作单元：同一商店的一组商品
/// 描述符加上处理模式。批次经工作队列以至少一次语义投递给
/// 工作器，创建后不再变更。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBatch {
    /// 批次所属商店名
    pub shop: String,
    /// 处理模式，决定工作器侧插件的抓取路径（如 "edge"）
    pub mode: String,
    /// 批次内的商品描述符，保持调度时的顺序
    #[serde(rename = "batch")]
    pub items: Vec<TaskItem>,
}

/// 批次内的单个商品描述符
///
/// 只携带插件抓取价格所需的字段；商品的其余元数据留在目录里。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    /// 商品标识符
    pub id: String,
    /// 商品条码（EAN），可能缺失
    pub ean: Option<String>,
    /// 商品页面完整URL
    pub url: String,
    /// 抓取价格时使用的页面选择器
    pub selector: String,
}

impl TaskItem {
    /// 从目录条目构造批次内描述符
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            ean: item.ean.clone(),
            url: item.url.clone(),
            selector: item.selector.clone(),
        }
    }
}

impl TaskBatch {
    /// 创建新的任务批次
    pub fn new(shop: impl Into<String>, mode: impl Into<String>, items: Vec<TaskItem>) -> Self {
        Self {
            shop: shop.into(),
            mode: mode.into(),
            items,
        }
    }
}
