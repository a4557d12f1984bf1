//! 级联选项
//!
//! - [`snapshot`]：参考数据快照与加载状态
//! - [`tree`]：资产级联树（环检测、扁平化搜索）
//! - [`resolver`]：依赖选项解析（资产 → 事件类型 → 属性 → 取值）
//! - [`graph`]：选项依赖图，上游变化时立即重算下游

pub mod graph;
pub mod resolver;
pub mod snapshot;
pub mod tree;

pub use graph::{EventOptions, EventSelection, OptionGraph, OptionNode};
pub use resolver::{DURATION_KEY, EVENT_STATUSES, OptionResolver};
pub use snapshot::{ReferenceSnapshot, ReferenceState, ResolverSettings};
pub use tree::{
    ASSET_LABEL_PREFIX, CascaderSelection, DEFAULT_SEPARATOR, FlatOption, PROPERTY_LABEL_PREFIX,
    TreeError, build_asset_tree, find_option, flatten_options, initial_label, search_options,
};
