// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price_event::PriceEvent;
use crate::stream::event_stream::{EventStream, StreamError};
use async_trait::async_trait;
use metrics::counter;
use redis::AsyncCommands;

/// Redis Streams事件流实现
///
/// 每条价格事件作为一条独立的流条目追加（XADD），消息体是
/// 序列化后的事件文档。多工作器共享同一个实例并发发布是安全的，
/// 每次发布走多路复用连接。
pub struct RedisEventStream {
    client: redis::Client,
    topic: String,
}

impl RedisEventStream {
    /// 创建新的Redis事件流实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    /// * `topic` - 流主题名
    pub fn new(redis_url: &str, topic: &str) -> Result<Self, StreamError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl EventStream for RedisEventStream {
    async fn publish(&self, event: &PriceEvent) -> Result<(), StreamError> {
        let payload = serde_json::to_string(event)?;
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.xadd::<_, _, _, _, ()>(&self.topic, "*", &[("payload", payload)])
            .await?;
        counter!("stream_events_published_total").increment(1);
        Ok(())
    }
}
