// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::models::item::Item;
use crate::domain::models::Catalog;

/// 目录存储错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog format error: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// 商品目录存储接口
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 加载完整目录
    async fn load(&self) -> Result<Catalog, CatalogError>;

    /// 保存完整目录，覆盖已有内容
    async fn save(&self, catalog: &Catalog) -> Result<(), CatalogError>;
}

/// 目录文件中的单条商品记录
///
/// 商品标识符作为映射键存在文件里，不在记录内重复。
#[derive(Debug, Serialize, Deserialize)]
struct CatalogRecord {
    url: String,
    selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ean: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
}

type CatalogFile = BTreeMap<String, BTreeMap<String, CatalogRecord>>;

/// 基于YAML文件的目录存储
///
/// 文件按 `商店名 -> 商品标识符 -> 记录` 两级映射组织，
/// 键有序以保证重写后的diff稳定。
pub struct YamlCatalogStore {
    path: PathBuf,
}

impl YamlCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogStore for YamlCatalogStore {
    /// 加载完整目录
    ///
    /// 文件不存在时返回空目录，首次运行发现流程前属正常情况。
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Catalog file {} not found, starting empty", self.path.display());
                return Ok(Catalog::new());
            }
            Err(e) => return Err(e.into()),
        };

        let file: CatalogFile = serde_yaml::from_str(&raw)?;
        let catalog = file
            .into_iter()
            .map(|(shop, records)| {
                let items = records
                    .into_iter()
                    .map(|(id, record)| {
                        let item = Item {
                            id: id.clone(),
                            ean: record.ean,
                            url: record.url,
                            name: record.name,
                            price: record.price,
                            selector: record.selector,
                        };
                        (id, item)
                    })
                    .collect();
                (shop, items)
            })
            .collect();

        Ok(catalog)
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let file: CatalogFile = catalog
            .iter()
            .map(|(shop, items)| {
                let records = items
                    .iter()
                    .map(|(id, item)| {
                        let record = CatalogRecord {
                            url: item.url.clone(),
                            selector: item.selector.clone(),
                            ean: item.ean.clone(),
                            name: item.name.clone(),
                            price: item.price,
                        };
                        (id.clone(), record)
                    })
                    .collect();
                (shop.clone(), records)
            })
            .collect();

        let raw = serde_yaml::to_string(&file)?;
        tokio::fs::write(&self.path, raw).await?;
        info!("Saved catalog to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_store_test.rs"]
mod tests;
