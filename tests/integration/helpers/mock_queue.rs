// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use pricers::domain::models::price_event::PriceEvent;
use pricers::domain::models::task::TaskBatch;
use pricers::queue::task_queue::{Delivery, QueueError, WorkQueue};
use pricers::stream::event_stream::{EventStream, StreamError};

#[derive(Default)]
struct QueueState {
    ready: VecDeque<(Uuid, String)>,
    delivery_counts: HashMap<Uuid, u32>,
    dead_letters: Vec<String>,
}

/// 内存工作队列
///
/// 复刻Redis队列的投递语义：先进先出、放弃后重投递、
/// 达到投递上限后进入死信。用于不依赖Redis的集成测试。
pub struct MockWorkQueue {
    state: Mutex<QueueState>,
    max_deliveries: u32,
}

impl MockWorkQueue {
    pub fn new(max_deliveries: u32) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            max_deliveries: max_deliveries.max(1),
        }
    }

    /// 队列与在途消息是否都已清空
    pub fn is_drained(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.ready.is_empty() && state.delivery_counts.is_empty()
    }

    pub fn ready_len(&self) -> usize {
        self.state.lock().unwrap().ready.len()
    }

    /// 已进入死信的任务批次
    pub fn dead_letters(&self) -> Vec<TaskBatch> {
        self.state
            .lock()
            .unwrap()
            .dead_letters
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect()
    }
}

#[async_trait]
impl WorkQueue for MockWorkQueue {
    async fn publish(&self, batch: &TaskBatch) -> Result<(), QueueError> {
        let payload = serde_json::to_string(batch)?;
        let mut state = self.state.lock().unwrap();
        state.ready.push_back((Uuid::new_v4(), payload));
        Ok(())
    }

    async fn receive(&self, _consumer: &str) -> Result<Option<Delivery>, QueueError> {
        let mut state = self.state.lock().unwrap();
        let Some((message_id, payload)) = state.ready.pop_front() else {
            return Ok(None);
        };
        let count = state.delivery_counts.entry(message_id).or_insert(0);
        *count += 1;
        let delivery_count = *count;
        Ok(Some(Delivery {
            message_id,
            delivery_count,
            payload: payload.clone(),
            receipt: payload,
        }))
    }

    async fn ack(&self, _consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        let mut state = self.state.lock().unwrap();
        state.delivery_counts.remove(&delivery.message_id);
        Ok(())
    }

    async fn abandon(&self, _consumer: &str, delivery: &Delivery) -> Result<(), QueueError> {
        let mut state = self.state.lock().unwrap();
        if delivery.delivery_count >= self.max_deliveries {
            state.delivery_counts.remove(&delivery.message_id);
            state.dead_letters.push(delivery.payload.clone());
        } else {
            state
                .ready
                .push_back((delivery.message_id, delivery.payload.clone()));
        }
        Ok(())
    }
}

/// 记录所有已发布价格事件的内存事件流
#[derive(Default)]
pub struct MockEventStream {
    events: Mutex<Vec<PriceEvent>>,
}

impl MockEventStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PriceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventStream for MockEventStream {
    async fn publish(&self, event: &PriceEvent) -> Result<(), StreamError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
