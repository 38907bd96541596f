// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::item::{Item, ShopCatalog};
    use crate::domain::models::task::TaskBatch;
    use crate::queue::task_queue::{Delivery, QueueError, WorkQueue};
    use crate::scheduler::scheduler::{BatchScheduler, SchedulerError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// 记录发布批次的队列替身，可配置在第N次发布时失败
    struct RecordingQueue {
        batches: Mutex<Vec<TaskBatch>>,
        published: AtomicUsize,
        fail_at: Option<usize>,
    }

    impl RecordingQueue {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                published: AtomicUsize::new(0),
                fail_at,
            }
        }
    }

    #[async_trait]
    impl WorkQueue for RecordingQueue {
        async fn publish(&self, batch: &TaskBatch) -> Result<(), QueueError> {
            let n = self.published.fetch_add(1, Ordering::SeqCst);
            if Some(n) == self.fail_at {
                return Err(QueueError::Serialization(serde::de::Error::custom(
                    "queue unavailable",
                )));
            }
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }

        async fn receive(&self, _consumer: &str) -> Result<Option<Delivery>, QueueError> {
            Ok(None)
        }

        async fn ack(&self, _consumer: &str, _delivery: &Delivery) -> Result<(), QueueError> {
            Ok(())
        }

        async fn abandon(&self, _consumer: &str, _delivery: &Delivery) -> Result<(), QueueError> {
            Ok(())
        }
    }

    fn catalog(count: usize) -> ShopCatalog {
        let mut catalog = ShopCatalog::new();
        for i in 0..count {
            let id = format!("{:04}", i);
            catalog.insert(
                id.clone(),
                Item {
                    id,
                    ean: None,
                    url: format!("https://shop/p/{}", i),
                    name: None,
                    price: None,
                    selector: "s".to_string(),
                },
            );
        }
        catalog
    }

    #[tokio::test]
    async fn test_batch_count_is_ceiling_of_items_over_capacity() {
        let queue = Arc::new(RecordingQueue::new(None));
        let scheduler = BatchScheduler::new(queue.clone(), 25, "edge");

        let published = scheduler.schedule("shop", &catalog(53)).await.unwrap();

        assert_eq!(published, 3);
        let batches = queue.batches.lock().unwrap();
        assert_eq!(batches[0].items.len(), 25);
        assert_eq!(batches[1].items.len(), 25);
        assert_eq!(batches[2].items.len(), 3);
    }

    #[tokio::test]
    async fn test_every_item_lands_in_exactly_one_batch() {
        let queue = Arc::new(RecordingQueue::new(None));
        let scheduler = BatchScheduler::new(queue.clone(), 7, "edge");
        let source = catalog(40);

        scheduler.schedule("shop", &source).await.unwrap();

        let batches = queue.batches.lock().unwrap();
        let mut seen = HashSet::new();
        for batch in batches.iter() {
            assert_eq!(batch.shop, "shop");
            assert_eq!(batch.mode, "edge");
            for item in &batch.items {
                assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
            }
        }
        assert_eq!(
            seen,
            source.keys().cloned().collect::<HashSet<_>>()
        );
    }

    #[tokio::test]
    async fn test_empty_catalog_publishes_nothing() {
        let queue = Arc::new(RecordingQueue::new(None));
        let scheduler = BatchScheduler::new(queue, 25, "edge");

        let published = scheduler.schedule("shop", &ShopCatalog::new()).await.unwrap();
        assert_eq!(published, 0);
    }

    #[tokio::test]
    async fn test_publish_failure_reports_partial_enqueue() {
        let queue = Arc::new(RecordingQueue::new(Some(2)));
        let scheduler = BatchScheduler::new(queue, 10, "edge");

        let result = scheduler.schedule("shop", &catalog(35)).await;
        match result {
            Err(SchedulerError::Publish { published, .. }) => assert_eq!(published, 2),
            other => panic!("expected publish error, got {:?}", other),
        }
    }
}
