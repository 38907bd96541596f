// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 发现模块
///
/// 遍历商店的分页搜索接口收集商品标识符，再按固定大小分组
/// 调用详情接口解析完整商品条目，产出去重后的商品目录。
pub mod discoverer;
pub mod profile;
pub mod refresh;

pub use discoverer::{Discoverer, DiscoveryError};
pub use profile::ShopProfile;
pub use refresh::{refresh_catalog, RefreshError};
