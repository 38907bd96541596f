// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{error, info};

use crate::discovery::discoverer::Discoverer;
use crate::discovery::profile::ShopProfile;
use crate::domain::models::Catalog;
use crate::infrastructure::catalog_store::{CatalogError, CatalogStore};

/// 目录刷新错误
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Catalog store error: {0}")]
    Store(#[from] CatalogError),

    /// 至少一个商店的发现硬失败，整次刷新以失败结束
    #[error("Discovery failed for shops: {shops:?}")]
    Failed { shops: Vec<String> },
}

/// 刷新商品目录
///
/// 对每个商店执行一次发现，并用本次结果整体替换该商店在目录里的
/// 条目，上游已下架的商品不会存留。发现成功的商店照常落盘；任何
/// 一个商店的硬失败都会让整次刷新返回错误，失败商店保留上一次的
/// 条目，不提交截断的目录。
pub async fn refresh_catalog(
    discoverer: &Discoverer,
    store: &dyn CatalogStore,
    shops: &HashMap<String, ShopProfile>,
) -> Result<Catalog, RefreshError> {
    let mut catalog = store.load().await?;
    let mut failed = Vec::new();

    for (shop, profile) in shops {
        info!("Running discovery for shop {}", shop);
        match discoverer.discover(shop, profile).await {
            Ok(found) => {
                catalog.insert(shop.clone(), found);
            }
            Err(e) => {
                error!("Discovery failed for shop {}: {}", shop, e);
                failed.push(shop.clone());
            }
        }
    }

    store.save(&catalog).await?;

    if !failed.is_empty() {
        failed.sort();
        return Err(RefreshError::Failed { shops: failed });
    }
    Ok(catalog)
}

#[cfg(test)]
#[path = "refresh_test.rs"]
mod tests;
