//! Handlers 模块

pub mod editor;
pub mod health;
pub mod metrics;
pub mod reference;
pub mod variables;

pub use editor::*;
pub use health::*;
pub use metrics::*;
pub use reference::*;
pub use variables::*;
