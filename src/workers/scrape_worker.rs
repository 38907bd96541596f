// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use metrics::counter;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::task::TaskBatch;
use crate::plugins::registry::PluginRegistry;
use crate::plugins::traits::PluginError;
use crate::queue::task_queue::{Delivery, WorkQueue};
use crate::stream::event_stream::{EventStream, StreamError};

/// 批次处理过程中的错误
///
/// 任何一种错误都会导致当前投递被放弃并回到队列，
/// 已经发布的价格事件不会被撤回
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to decode task batch payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No plugin registered for shop '{0}'")]
    UnknownShop(String),

    #[error("Plugin failed: {0}")]
    Plugin(#[from] PluginError),

    #[error("Failed to publish price event: {0}")]
    Stream(#[from] StreamError),
}

/// 抓取工作器
///
/// 从工作队列领取任务批次，交给对应商店的插件抓取价格，
/// 并把每条价格事件逐条发布到事件流
pub struct ScrapeWorker<Q, S>
where
    Q: WorkQueue,
    S: EventStream,
{
    queue: Arc<Q>,
    stream: Arc<S>,
    registry: Arc<PluginRegistry>,
    idle_poll: Duration,
    worker_id: Uuid,
}

impl<Q, S> ScrapeWorker<Q, S>
where
    Q: WorkQueue + Send + Sync,
    S: EventStream + Send + Sync,
{
    /// 创建新的抓取工作器实例
    pub fn new(
        queue: Arc<Q>,
        stream: Arc<S>,
        registry: Arc<PluginRegistry>,
        idle_poll: Duration,
    ) -> Self {
        Self {
            queue,
            stream,
            registry,
            idle_poll,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行抓取工作器
    ///
    /// 循环领取并处理任务批次，直到收到关闭信号。
    /// 正在处理中的批次会先处理完再退出
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Scrape worker {} started", self.worker_id);
        let consumer = self.worker_id.to_string();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let received = tokio::select! {
                _ = shutdown.changed() => break,
                received = self.queue.receive(&consumer) => received,
            };

            match received {
                Ok(Some(delivery)) => {
                    self.settle(&consumer, delivery).await;
                }
                Ok(None) => {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        _ = sleep(self.idle_poll) => {}
                    }
                }
                Err(e) => {
                    error!("Worker {} failed to receive from queue: {}", self.worker_id, e);
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        _ = sleep(self.idle_poll) => {}
                    }
                }
            }
        }

        info!("Scrape worker {} stopped", self.worker_id);
    }

    /// 处理一次投递并确定其最终去向
    ///
    /// 成功时确认消息，任何失败都放弃消息交还队列重投；
    /// 单条消息的失败不会影响工作器继续运行
    async fn settle(&self, consumer: &str, delivery: Delivery) {
        match self.process(&delivery).await {
            Ok(published) => {
                info!(
                    "Worker {} completed message {} ({} events published, delivery {})",
                    self.worker_id, delivery.message_id, published, delivery.delivery_count
                );
                counter!("worker_messages_acked_total").increment(1);
                if let Err(e) = self.queue.ack(consumer, &delivery).await {
                    error!("Failed to ack message {}: {}", delivery.message_id, e);
                }
            }
            Err(e) => {
                warn!(
                    "Worker {} abandoning message {} (delivery {}): {}",
                    self.worker_id, delivery.message_id, delivery.delivery_count, e
                );
                counter!("worker_messages_abandoned_total").increment(1);
                if let Err(e) = self.queue.abandon(consumer, &delivery).await {
                    error!("Failed to abandon message {}: {}", delivery.message_id, e);
                }
            }
        }
    }

    /// 解码批次、解析插件并把插件产出的事件逐条发布
    ///
    /// 事件在拉取下一条之前先发布，流中途失败时
    /// 已发布的事件保持不变。插件产出的事件数少于
    /// 条目数是正常情况（部分商品无法解析价格）
    async fn process(&self, delivery: &Delivery) -> Result<usize, WorkerError> {
        let batch: TaskBatch = serde_json::from_str(&delivery.payload)?;

        let plugin = self
            .registry
            .resolve(&batch.shop)
            .ok_or_else(|| WorkerError::UnknownShop(batch.shop.clone()))?;

        info!(
            "Worker {} processing batch of {} items for shop {}",
            self.worker_id,
            batch.items.len(),
            batch.shop
        );

        let mut events = plugin.fetch_batch(batch.items);
        let mut published = 0usize;

        while let Some(next) = events.next().await {
            let event = next?;
            self.stream.publish(&event).await?;
            counter!("worker_events_published_total").increment(1);
            published += 1;
        }

        Ok(published)
    }
}

#[cfg(test)]
#[path = "scrape_worker_test.rs"]
mod tests;
