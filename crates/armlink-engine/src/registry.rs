//! 自定义指令处理器注册表
//!
//! `CUSTOM` 指令的负载对引擎不透明：按第一个字段路由到应用注册的
//! 处理器。处理器失败独立可恢复，从不影响运动队列。

use crate::device::DeviceError;
use crate::error::EngineError;
use std::collections::HashMap;

/// 自定义指令回调 Trait
///
/// 闭包可以直接用作处理器：
///
/// ```rust
/// use armlink_engine::CustomRegistry;
///
/// let mut registry = CustomRegistry::new();
/// registry.register("ECHO", |fields: &[String]| Ok(Some(fields.join(","))));
/// ```
pub trait CustomHandler: Send + Sync {
    /// 处理一条自定义指令，`fields` 是整条负载（含路由字段）
    ///
    /// 返回 `Some` 时编码为响应行，`None` 表示无响应。
    fn handle(&self, fields: &[String]) -> Result<Option<String>, DeviceError>;
}

impl<F> CustomHandler for F
where
    F: Fn(&[String]) -> Result<Option<String>, DeviceError> + Send + Sync,
{
    fn handle(&self, fields: &[String]) -> Result<Option<String>, DeviceError> {
        self(fields)
    }
}

/// 处理器注册表（键大小写不敏感）
#[derive(Default)]
pub struct CustomRegistry {
    handlers: HashMap<String, Box<dyn CustomHandler>>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器；同键重复注册时后注册者生效
    pub fn register(&mut self, key: impl Into<String>, handler: impl CustomHandler + 'static) {
        self.handlers
            .insert(key.into().to_ascii_uppercase(), Box::new(handler));
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 按第一个字段路由并执行
    pub fn handle(&self, fields: &[String]) -> Result<Option<String>, EngineError> {
        let key = fields
            .first()
            .ok_or_else(|| EngineError::UnhandledCustom(String::new()))?;
        let handler = self
            .handlers
            .get(&key.to_ascii_uppercase())
            .ok_or_else(|| EngineError::UnhandledCustom(key.clone()))?;
        handler.handle(fields).map_err(EngineError::Execution)
    }
}

impl std::fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("keys", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
