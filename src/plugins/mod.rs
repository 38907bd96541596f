// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 插件模块
///
/// 定义按商店可插拔的抓取能力：工作器通过静态注册表把任务批次
/// 分发给对应商店的插件，插件产出惰性的价格事件序列。
/// 新增商店只需注册新插件，工作器代码不变。
pub mod edge;
pub mod registry;
pub mod stub;
pub mod traits;

pub use edge::EdgeProxyPlugin;
pub use registry::PluginRegistry;
pub use stub::StubPlugin;
pub use traits::{PluginError, PriceEventStream, ShopPlugin};
