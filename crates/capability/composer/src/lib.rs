//! 查询状态组合
//!
//! - [`reduce`]：字段更新 → 新查询对象（纯函数）
//! - [`host`]：宿主回调边界、`QueryComposer`、可执行判定
//! - [`editors`]：注解编辑器、变量编辑器与变量取值
//! - [`prepare`]：执行前的模板展开与过滤值还原
//! - [`session`]：参考数据加载门控
//! - [`debounce`]：自由文本输入防抖
//! - [`regex_input`]：正则输入校验与防抖提交

pub mod debounce;
pub mod editors;
pub mod error;
pub mod host;
pub mod prepare;
pub mod reduce;
pub mod regex_input;
pub mod session;
pub mod settings;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use editors::{AnnotationEditor, VariableEditor, VariableSupport};
pub use error::ComposerError;
pub use host::{EditorKind, QueryComposer, QueryHost};
pub use prepare::{
    DEFAULT_SERIES_LIMIT, PreparedBody, PreparedEventQuery, PreparedPropertyFilter,
    PreparedQuery, VALUE_FILTER_PLACEHOLDER, parse_float, prepare_queries, prepare_query,
};
pub use reduce::{ReduceContext, empty_body, is_event_runnable, is_runnable, reduce};
pub use regex_input::{INVALID_REGEX_MESSAGE, RegexInput, RegexInputField};
pub use session::EditorSession;
pub use settings::ComposerSettings;
