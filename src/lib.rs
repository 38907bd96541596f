// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 发现模块
///
/// 通过商店搜索接口枚举商品并解析详情，构建商品目录
pub mod discovery;

/// 领域模块
///
/// 包含核心业务实体和线格式类型
pub mod domain;

/// 抓取模块
///
/// 提供带重试和速率限制的HTTP抓取能力
pub mod fetcher;

/// 基础设施模块
///
/// 提供外部服务集成，如目录存储和指标导出
pub mod infrastructure;

/// 插件模块
///
/// 实现各商店的价格抓取插件及其注册表
pub mod plugins;

/// 队列模块
///
/// 实现至少一次语义的工作队列
pub mod queue;

/// 调度模块
///
/// 把商品目录切分为任务批次写入工作队列
pub mod scheduler;

/// 事件流模块
///
/// 发布价格事件到下游消费的事件流
pub mod stream;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现后台批次处理和工作器管理
pub mod workers;
