//! Tool registry
//!
//! Built once at startup through `RegistryBuilder`, then frozen. The frozen
//! `ToolRegistry` keeps registration order for listing and a name index for
//! dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::Arguments;
use super::context::ToolContext;
use super::definition::ToolDescriptor;
use super::result::ToolResult;
use crate::error::{GatewayError, Result};

/// Executes one tool. Never fails: errors become `ToolResult::Error`.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: Arc<ToolContext>, args: Arguments) -> ToolResult;
}

#[async_trait]
impl<F, Fut> ToolHandler for F
where
    F: Fn(Arc<ToolContext>, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult> + Send + 'static,
{
    async fn call(&self, ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
        self(ctx, args).await
    }
}

pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub handler: Box<dyn ToolHandler>,
}

#[derive(Default)]
pub struct RegistryBuilder {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool; a name already taken is an error
    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H) -> Result<()>
    where
        H: ToolHandler + 'static,
    {
        if self.index.contains_key(&descriptor.name) {
            return Err(GatewayError::DuplicateTool(descriptor.name));
        }
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            tools: self.tools,
            index: self.index,
        }
    }
}

/// Immutable tool catalog
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Descriptors in registration order
    pub fn list(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
