// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item::ShopCatalog;
use crate::domain::models::task::{TaskBatch, TaskItem};
use crate::queue::task_queue::{QueueError, WorkQueue};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// 调度错误类型
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// 发布失败，调度运行中止；`published` 记录失败前已入队的批次数
    #[error("Queue publish failed after {published} batches: {source}")]
    Publish {
        /// 失败前已成功入队的批次数
        published: usize,
        /// 底层队列错误
        #[source]
        source: QueueError,
    },
}

/// 批次调度器
///
/// 单遍扫描商店目录，按目录迭代顺序切分为固定大小的有序分组，
/// 每组发布一个任务批次。保证目录里的每个商品恰好落在一个批次里；
/// 批次之间相互独立，不约定下游完成顺序。
pub struct BatchScheduler<Q: WorkQueue> {
    queue: Arc<Q>,
    batch_size: usize,
    mode: String,
}

impl<Q: WorkQueue> BatchScheduler<Q> {
    /// 创建新的批次调度器
    ///
    /// # 参数
    ///
    /// * `queue` - 目标工作队列
    /// * `batch_size` - 批次容量
    /// * `mode` - 写入任务批次的处理模式
    pub fn new(queue: Arc<Q>, batch_size: usize, mode: impl Into<String>) -> Self {
        Self {
            queue,
            batch_size: batch_size.max(1),
            mode: mode.into(),
        }
    }

    /// 调度一个商店的目录
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 入队的批次数
    /// * `Err(SchedulerError)` - 发布失败；部分入队的事实被如实上报而不是被吞掉
    pub async fn schedule(
        &self,
        shop: &str,
        catalog: &ShopCatalog,
    ) -> Result<usize, SchedulerError> {
        let items: Vec<TaskItem> = catalog.values().map(TaskItem::from_item).collect();

        let mut published = 0;
        for group in items.chunks(self.batch_size) {
            let batch = TaskBatch::new(shop, self.mode.clone(), group.to_vec());
            if let Err(source) = self.queue.publish(&batch).await {
                error!(
                    shop = shop,
                    published = published,
                    error = %source,
                    "Batch publish failed, aborting scheduling run"
                );
                return Err(SchedulerError::Publish { published, source });
            }
            published += 1;
            counter!("scheduler_batches_published_total").increment(1);
        }

        info!(
            shop = shop,
            items = items.len(),
            batches = published,
            "Scheduling run complete"
        );
        Ok(published)
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
