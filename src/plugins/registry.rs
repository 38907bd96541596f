// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::plugins::traits::ShopPlugin;
use std::collections::HashMap;
use std::sync::Arc;

/// 插件注册表
///
/// 商店名到插件实现的静态映射，在进程启动时填充完毕，此后只读。
/// 工作器按任务批次的商店名解析插件；未注册的商店名是该消息的
/// 永久性错误。
#[derive(Default)]
pub struct PluginRegistry {
    /// 已注册插件
    plugins: HashMap<String, Arc<dyn ShopPlugin>>,
}

impl PluginRegistry {
    /// 创建空的插件注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个插件，键为插件声明的商店名
    ///
    /// 同名重复注册时后注册的实现生效。
    pub fn register(&mut self, plugin: Arc<dyn ShopPlugin>) {
        self.plugins.insert(plugin.shop().to_string(), plugin);
    }

    /// 解析商店名对应的插件
    pub fn resolve(&self, shop: &str) -> Option<Arc<dyn ShopPlugin>> {
        self.plugins.get(shop).cloned()
    }

    /// 已注册的商店名
    pub fn shops(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }
}
