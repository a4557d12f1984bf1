//! 选项依赖图
//!
//! 节点顺序：资产 → 事件类型 → 属性 → 属性值 / 标签键。
//! 上游输入变化时立即重算该节点及其全部下游节点，不做惰性缓存。

use domain::{CascaderOption, EventQuery, Operator, PropertyType, SelectOption};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resolver::OptionResolver;
use crate::tree::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionNode {
    Assets,
    EventTypes,
    Properties,
    PropertyValues,
    TagKeys,
}

impl OptionNode {
    /// 该节点及其下游节点，按求值顺序排列。
    pub fn downstream(&self) -> &'static [OptionNode] {
        match self {
            Self::Assets => &[
                Self::Assets,
                Self::EventTypes,
                Self::Properties,
                Self::PropertyValues,
                Self::TagKeys,
            ],
            Self::EventTypes => &[
                Self::EventTypes,
                Self::Properties,
                Self::PropertyValues,
                Self::TagKeys,
            ],
            Self::Properties => &[Self::Properties, Self::PropertyValues, Self::TagKeys],
            Self::PropertyValues => &[Self::PropertyValues],
            Self::TagKeys => &[Self::TagKeys],
        }
    }
}

/// 驱动依赖图的事件查询选择。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSelection {
    pub asset: String,
    pub event_types: Vec<String>,
    pub include_parent_info: bool,
    pub property_type: PropertyType,
    /// 正在编辑取值的 WHERE 标签键。
    pub value_key: Option<String>,
    pub version: String,
    /// 注解编辑器只允许 simple 属性。
    pub annotation: bool,
}

impl EventSelection {
    pub fn from_query(query: &EventQuery, version: impl Into<String>) -> Self {
        Self {
            asset: query.assets.first().cloned().unwrap_or_default(),
            event_types: query.event_types.clone(),
            include_parent_info: query.include_parent_info,
            property_type: query.property_type,
            value_key: None,
            version: version.into(),
            annotation: false,
        }
    }

    /// 与 `other` 相比最上游的变化节点。
    fn changed_from(&self, other: &Self) -> Option<OptionNode> {
        if self.asset != other.asset {
            Some(OptionNode::EventTypes)
        } else if self.event_types != other.event_types
            || self.include_parent_info != other.include_parent_info
            || self.property_type != other.property_type
            || self.annotation != other.annotation
            || self.version != other.version
        {
            Some(OptionNode::Properties)
        } else if self.value_key != other.value_key {
            Some(OptionNode::PropertyValues)
        } else {
            None
        }
    }
}

/// 事件编辑器当前的全部可选项。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOptions {
    pub loading: bool,
    pub asset_tree: Vec<CascaderOption>,
    pub asset_label: String,
    pub event_types: Vec<SelectOption>,
    pub properties: Vec<SelectOption>,
    pub property_types: Vec<SelectOption>,
    pub property_values: Vec<String>,
    pub tag_keys: Vec<String>,
    pub operators: Vec<Operator>,
    pub statuses: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default)]
pub struct OptionGraph {
    selection: EventSelection,
    options: EventOptions,
}

impl OptionGraph {
    /// 以初始选择构建并完整求值。
    pub fn new(selection: EventSelection, resolver: &OptionResolver<'_>) -> Result<Self, TreeError> {
        let mut graph = Self {
            selection,
            options: EventOptions::default(),
        };
        graph.invalidate(OptionNode::Assets, resolver)?;
        Ok(graph)
    }

    pub fn selection(&self) -> &EventSelection {
        &self.selection
    }

    pub fn options(&self) -> &EventOptions {
        &self.options
    }

    pub fn into_options(self) -> EventOptions {
        self.options
    }

    /// 更新选择，并从最上游的变化节点开始重算；返回重算过的节点。
    pub fn select(
        &mut self,
        selection: EventSelection,
        resolver: &OptionResolver<'_>,
    ) -> Result<Vec<OptionNode>, TreeError> {
        let changed = selection.changed_from(&self.selection);
        self.selection = selection;
        match changed {
            Some(node) => self.invalidate(node, resolver),
            None => Ok(Vec::new()),
        }
    }

    /// 重算 `node` 及其全部下游节点。
    pub fn invalidate(
        &mut self,
        node: OptionNode,
        resolver: &OptionResolver<'_>,
    ) -> Result<Vec<OptionNode>, TreeError> {
        let nodes = node.downstream();
        for node in nodes {
            self.recompute(*node, resolver)?;
        }
        debug!(?nodes, "option graph recomputed");
        Ok(nodes.to_vec())
    }

    fn recompute(&mut self, node: OptionNode, resolver: &OptionResolver<'_>) -> Result<(), TreeError> {
        let selection = &self.selection;
        let options = &mut self.options;
        options.loading = resolver.is_loading();
        match node {
            OptionNode::Assets => {
                options.asset_tree = resolver.asset_options(false)?;
                options.asset_label = resolver.initial_label(&selection.asset);
                options.statuses = resolver.available_statuses();
            }
            OptionNode::EventTypes => {
                options.event_types = resolver.available_event_types(&selection.asset);
                options.asset_label = resolver.initial_label(&selection.asset);
            }
            OptionNode::Properties => {
                let include_parent = selection.include_parent_info
                    && selection.property_type == PropertyType::Simple;
                options.properties = resolver.available_properties(
                    &selection.event_types,
                    include_parent,
                    selection.property_type,
                );
                options.property_types =
                    resolver.property_type_options(&selection.version, selection.annotation);
                options.operators = resolver.operators(&selection.version);
            }
            OptionNode::PropertyValues => {
                options.property_values = match selection.value_key.as_deref() {
                    Some(key) => resolver.available_property_values(key, &selection.event_types),
                    None => Vec::new(),
                };
            }
            OptionNode::TagKeys => {
                options.tag_keys =
                    resolver.tag_key_options(&selection.event_types, &selection.version);
            }
        }
        Ok(())
    }
}
