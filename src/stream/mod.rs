// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 事件流模块
///
/// 定义价格事件的下游发布抽象及其Redis Streams实现。
/// 每条价格观测独立发布，无批次信封。
pub mod event_stream;
pub mod redis_stream;

pub use event_stream::{EventStream, StreamError};
pub use redis_stream::RedisEventStream;
