// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::TaskBatch;
use crate::queue::task_queue::{Delivery, QueueError, WorkQueue};
use async_trait::async_trait;
use metrics::counter;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// 队列消息信封
///
/// 在消息体外包一层稳定的消息标识符，用于跨重投递跟踪投递次数。
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// 消息唯一标识符
    id: Uuid,
    /// 消息体，任务批次文档
    body: Value,
}

/// Redis工作队列实现
///
/// 基于列表实现竞争消费者模式：主列表承载待处理消息，每个消费者
/// 持有自己的处理中列表（RPOPLPUSH领取），投递次数记录在哈希里。
/// 放弃的消息回到主列表重投递，超过投递上限的转入死信列表；进程
/// 崩溃遗留在处理中列表的消息由启动时的恢复扫描找回。
pub struct RedisWorkQueue {
    client: redis::Client,
    queue_key: String,
    dead_letter_key: String,
    deliveries_key: String,
    max_deliveries: u32,
}

impl RedisWorkQueue {
    /// 创建新的Redis工作队列实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    /// * `queue_name` - 主队列名
    /// * `dead_letter_name` - 死信队列名
    /// * `max_deliveries` - 单条消息的最大投递次数
    pub fn new(
        redis_url: &str,
        queue_name: &str,
        dead_letter_name: &str,
        max_deliveries: u32,
    ) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            queue_key: queue_name.to_string(),
            dead_letter_key: dead_letter_name.to_string(),
            deliveries_key: format!("{}:deliveries", queue_name),
            max_deliveries: max_deliveries.max(1),
        })
    }

    fn processing_key(&self, consumer: &str) -> String {
        format!("{}:processing:{}", self.queue_key, consumer)
    }

    /// 恢复崩溃遗留的处理中消息
    ///
    /// 把所有处理中列表里的消息搬回主队列。必须在工作器启动前
    /// 调用一次；投递计数保留在Redis里，找回的毒消息仍然会在
    /// 达到投递上限时进入死信。
    pub async fn recover(&self) -> Result<usize, QueueError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let stranded: Vec<String> = con
            .keys(format!("{}:processing:*", self.queue_key))
            .await?;

        let mut recovered = 0;
        for key in stranded {
            loop {
                let raw: Option<String> = con.rpoplpush(&key, &self.queue_key).await?;
                if raw.is_none() {
                    break;
                }
                recovered += 1;
            }
        }
        if recovered > 0 {
            info!(
                queue = %self.queue_key,
                count = recovered,
                "Recovered stranded in-flight messages"
            );
        }
        Ok(recovered)
    }
}

#[async_trait]
impl WorkQueue for RedisWorkQueue {
    async fn publish(&self, batch: &TaskBatch) -> Result<(), QueueError> {
        let envelope = Envelope {
            id: Uuid::new_v4(),
            body: serde_json::to_value(batch)?,
        };
        let raw = serde_json::to_string(&envelope)?;

        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.lpush::<_, _, ()>(&self.queue_key, raw).await?;
        Ok(())
    }

    async fn receive(&self, consumer: &str) -> Result<Option<Delivery>, QueueError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        loop {
            let raw: Option<String> = con
                .rpoplpush(&self.queue_key, self.processing_key(consumer))
                .await?;
            let Some(raw) = raw else {
                return Ok(None);
            };

            // 信封坏了就没有可跟踪的投递计数，永远到不了投递上限，
            // 不重投递，直接进死信
            let envelope: Envelope = match serde_json::from_str(&raw) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(
                        queue = %self.queue_key,
                        error = %e,
                        "Undecodable queue envelope, routing to dead letter queue"
                    );
                    con.lpush::<_, _, ()>(&self.dead_letter_key, &raw).await?;
                    con.lrem::<_, _, ()>(self.processing_key(consumer), 1, &raw)
                        .await?;
                    counter!("queue_messages_dead_lettered_total").increment(1);
                    continue;
                }
            };

            let delivery_count: u32 = con
                .hincr(&self.deliveries_key, envelope.id.to_string(), 1)
                .await?;

            return Ok(Some(Delivery {
                message_id: envelope.id,
                delivery_count,
                payload: envelope.body.to_string(),
                receipt: raw,
            }));
        }
    }

    async fn ack(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.lrem::<_, _, ()>(self.processing_key(consumer), 1, &delivery.receipt)
            .await?;
        con.hdel::<_, _, ()>(&self.deliveries_key, delivery.message_id.to_string())
            .await?;
        Ok(())
    }

    async fn abandon(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;

        // 先推目的列表再清处理中列表：两条命令之间崩溃只会造成
        // 重复投递，不会丢消息
        if delivery.delivery_count >= self.max_deliveries {
            warn!(
                message_id = %delivery.message_id,
                deliveries = delivery.delivery_count,
                "Delivery limit reached, routing message to dead letter queue"
            );
            con.lpush::<_, _, ()>(&self.dead_letter_key, &delivery.receipt)
                .await?;
            con.hdel::<_, _, ()>(&self.deliveries_key, delivery.message_id.to_string())
                .await?;
            counter!("queue_messages_dead_lettered_total").increment(1);
        } else {
            con.lpush::<_, _, ()>(&self.queue_key, &delivery.receipt)
                .await?;
        }
        con.lrem::<_, _, ()>(self.processing_key(consumer), 1, &delivery.receipt)
            .await?;
        Ok(())
    }
}
