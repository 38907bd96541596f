// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price_event::PriceEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 事件流错误类型
#[derive(Error, Debug)]
pub enum StreamError {
    /// 流后端错误
    #[error("Stream backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// 事件序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 事件流特质
///
/// 价格事件的下游持久化发布端。实现必须支持多个工作器并发
/// 调用 `publish`；分区内有序性由后端保证，调用方不依赖跨分区顺序。
#[async_trait]
pub trait EventStream: Send + Sync {
    /// 发布一条价格事件
    async fn publish(&self, event: &PriceEvent) -> Result<(), StreamError>;
}

#[async_trait]
impl<T: EventStream + ?Sized> EventStream for Arc<T> {
    async fn publish(&self, event: &PriceEvent) -> Result<(), StreamError> {
        (**self).publish(event).await
    }
}
