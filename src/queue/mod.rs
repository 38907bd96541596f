// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 定义携带任务批次的工作队列抽象及其Redis实现，
/// 提供至少一次投递、按消息结算与死信路由能力。
pub mod redis_queue;
pub mod task_queue;

pub use redis_queue::RedisWorkQueue;
pub use task_queue::{Delivery, QueueError, WorkQueue};
