// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了流水线的核心业务实体，包括：
/// - 商品（item）：发现阶段产出的商品条目与商品目录
/// - 任务批次（task）：调度器产出、经工作队列投递的抓取任务单元
/// - 价格事件（price_event）：插件产出、发布到事件流的价格观测
///
/// 这些模型构成了各阶段之间的数据契约，定义了
/// 发现、调度与消费三个阶段共享的数据形态。
pub mod item;
pub mod price_event;
pub mod task;

pub use item::{merge_items, Catalog, Item, ShopCatalog};
pub use price_event::PriceEvent;
pub use task::{TaskBatch, TaskItem};
