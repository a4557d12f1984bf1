//! 编辑器共享的数据模型。
//!
//! - [`reference`]：历史库参考数据（资产、事件类型、事件配置、事件类型属性等）
//! - [`property_filter`]：WHERE 条件模型（运算符、条件、EventPropertyFilter、QueryTag）
//! - [`query`]：宿主持有的查询对象（按 `queryType` 区分的联合体）
//! - [`filter`]：参考数据查询过滤器与分页
//! - [`options`]：下拉/级联选项
//! - [`update`]：各子编辑器提交的字段更新
//! - [`variable`]：模板变量查询

pub mod filter;
pub mod options;
pub mod property_filter;
pub mod query;
pub mod reference;
pub mod update;
pub mod variable;

pub use filter::{
    AssetFilter, AssetPropertyFilter, EventTypeFilter, EventTypePropertiesFilter,
    MeasurementFilter, Pagination, TimeseriesDatabaseFilter,
};
pub use options::{CascaderOption, SelectOption};
pub use property_filter::{Condition, EventPropertyFilter, Operator, QueryTag, ValueFilter};
pub use query::{
    Aggregation, AssetMeasurementQuery, EventQuery, HostQuery, MeasurementQuery,
    MeasurementQueryOptions, QueryBody, QueryType, RawQuery, TabIndex,
};
pub use reference::{
    Asset, AssetProperty, Collector, EventConfiguration, EventType, EventTypeProperty,
    HistorianInfo, Measurement, PropertyDatatype, PropertyType, TimeseriesDatabase,
};
pub use update::{
    AssetMeasurementUpdate, DownstreamPolicy, EventUpdate, FieldUpdate, MeasurementUpdate,
    RawUpdate,
};
pub use variable::{MetricFindValue, VariableQuery, VariableQueryType};
