//! Tool system - descriptors, registry, handlers and dispatch

mod arguments;
mod catalog;
mod context;
mod definition;
mod dispatch;
pub mod handlers;
mod registry;
mod result;

pub use arguments::{ArgumentError, Arguments};
pub use catalog::{register_network_tools, register_protect_tools, standard_registry};
pub use context::ToolContext;
pub use definition::{ParamType, ToolDescriptor};
pub use dispatch::{Dispatcher, ToolInvocation};
pub use registry::{RegisteredTool, RegistryBuilder, ToolHandler, ToolRegistry};
pub use result::ToolResult;
