// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::plugins::registry::PluginRegistry;
use crate::queue::task_queue::WorkQueue;
use crate::stream::event_stream::EventStream;
use crate::workers::scrape_worker::ScrapeWorker;

/// 工作管理器
///
/// 负责启动一组抓取工作器并在收到关闭信号时优雅地停止它们
pub struct WorkerManager<Q, S>
where
    Q: WorkQueue + 'static,
    S: EventStream + 'static,
{
    queue: Arc<Q>,
    stream: Arc<S>,
    registry: Arc<PluginRegistry>,
    idle_poll: Duration,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl<Q, S> WorkerManager<Q, S>
where
    Q: WorkQueue + Send + Sync,
    S: EventStream + Send + Sync,
{
    pub fn new(
        queue: Arc<Q>,
        stream: Arc<S>,
        registry: Arc<PluginRegistry>,
        idle_poll: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            queue,
            stream,
            registry,
            idle_poll,
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = ScrapeWorker::new(
                self.queue.clone(),
                self.stream.clone(),
                self.registry.clone(),
                self.idle_poll,
            );
            let shutdown_rx = self.shutdown_tx.subscribe();

            let handle = tokio::spawn(async move {
                worker.run(shutdown_rx).await;
            });
            self.handles.push(handle);
        }
        info!("Started {} scrape workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号后广播停止请求，等待每个工作器处理完
    /// 手头的批次再退出
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Worker task terminated abnormally: {}", e);
            }
        }

        info!("Workers shut down successfully");
    }
}
