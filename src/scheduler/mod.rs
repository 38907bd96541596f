// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 调度模块
///
/// 把商店目录切分为固定大小的任务批次并逐个发布到工作队列。
pub mod scheduler;

pub use scheduler::{BatchScheduler, SchedulerError};
