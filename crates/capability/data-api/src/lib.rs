//! 参考数据访问边界
//!
//! 编辑器核心只通过 [`DataApi`] 读取历史库参考数据，不关心其传输方式：
//! - [`InMemoryDataApi`]：内存实现（测试与演示）
//! - [`HttpDataApi`]：基于 reqwest 访问历史库资源接口
//!
//! 形如 `/regex/` 但无法编译的关键字或路径过滤直接返回空列表，不发起请求。

pub mod error;
pub mod guard;
pub mod http;
pub mod in_memory;
pub mod traits;

pub use error::DataApiError;
pub use guard::rejects_pattern;
pub use http::HttpDataApi;
pub use in_memory::{InMemoryDataApi, ReferenceData};
pub use traits::DataApi;
