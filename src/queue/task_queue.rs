// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::TaskBatch;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列后端错误
    #[error("Queue backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// 消息体序列化或反序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 投递中的队列消息
///
/// 包装一个任务批次的单次投递。消息本体归队列所有，工作器在
/// 处理期间只持有该临时引用，并且必须用确认或放弃二者之一结算。
#[derive(Debug, Clone)]
pub struct Delivery {
    /// 消息唯一标识符，跨重投递保持不变
    pub message_id: Uuid,
    /// 本条消息的累计投递次数（本次在内）
    pub delivery_count: u32,
    /// 消息体，序列化后的任务批次文档
    pub payload: String,
    /// 后端结算用的回执令牌
    pub receipt: String,
}

/// 工作队列特质
///
/// 承载从调度器到工作器的任务批次，提供至少一次投递语义：
/// 被放弃的消息由队列重投递，超过投递上限的消息转入死信目的地。
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// 发布一个任务批次
    async fn publish(&self, batch: &TaskBatch) -> Result<(), QueueError>;

    /// 领取下一条消息
    ///
    /// # 参数
    ///
    /// * `consumer` - 消费者标识，每个工作器实例持有自己的领取会话
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Delivery))` - 领取到的消息
    /// * `Ok(None)` - 队列当前为空
    /// * `Err(QueueError)` - 领取失败
    async fn receive(&self, consumer: &str) -> Result<Option<Delivery>, QueueError>;

    /// 确认消息，处理成功后从队列移除
    async fn ack(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError>;

    /// 放弃消息
    ///
    /// 未达投递上限时重新入队等待重投递，达到上限时转入死信目的地。
    async fn abandon(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError>;
}

#[async_trait]
impl<T: WorkQueue + ?Sized> WorkQueue for Arc<T> {
    async fn publish(&self, batch: &TaskBatch) -> Result<(), QueueError> {
        (**self).publish(batch).await
    }

    async fn receive(&self, consumer: &str) -> Result<Option<Delivery>, QueueError> {
        (**self).receive(consumer).await
    }

    async fn ack(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        (**self).ack(consumer, delivery).await
    }

    async fn abandon(&self, consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        (**self).abandon(consumer, delivery).await
    }
}
