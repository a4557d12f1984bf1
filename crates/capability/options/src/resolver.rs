//! 依赖选项解析
//!
//! 给定当前资产、事件类型选择，从参考数据快照推导下一级可选项。
//! 所有方法都是快照上的纯计算：参考数据仍在加载时一律返回空结果。
//! 模板变量占位符无条件追加在每个选项列表末尾。

use std::collections::HashSet;

use domain::{
    Asset, AssetProperty, CascaderOption, EventTypeProperty, Operator, PropertyDatatype,
    PropertyType, SelectOption,
};
use historian_filter::{
    PARENT_PREFIX, compile_selector, is_feature_enabled, is_regex, is_supported_property_type,
    is_uuid, operators_for_version, split_parent,
};
use historian_template::{ScopedVars, TemplateContext};

use crate::snapshot::{ReferenceSnapshot, ReferenceState, ResolverSettings};
use crate::tree::{TreeError, build_asset_tree, initial_label};

/// 事件状态的固定取值。
pub const EVENT_STATUSES: [&str; 4] = ["processed", "open", "incomplete", "pending"];

/// 持续时长过滤的伪属性名。
pub const DURATION_KEY: &str = "duration";

pub struct OptionResolver<'a> {
    reference: &'a ReferenceState,
    template: &'a TemplateContext,
    settings: &'a ResolverSettings,
}

impl<'a> OptionResolver<'a> {
    pub fn new(
        reference: &'a ReferenceState,
        template: &'a TemplateContext,
        settings: &'a ResolverSettings,
    ) -> Self {
        Self {
            reference,
            template,
            settings,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.reference.is_loading()
    }

    fn snapshot(&self) -> Option<&'a ReferenceSnapshot> {
        self.reference.snapshot()
    }

    fn expand(&self, selector: &str) -> Vec<String> {
        self.template
            .multi_select_replace(selector, &ScopedVars::new())
    }

    fn expand_all(&self, selectors: &[String]) -> Vec<String> {
        self.template.expand_all(selectors, &ScopedVars::new())
    }

    fn with_placeholders(&self, options: Vec<SelectOption>) -> Vec<SelectOption> {
        if self.is_loading() {
            return Vec::new();
        }
        self.template.with_placeholders(options)
    }

    /// 可提交的资产选择器：UUID、`/regex/` 或引用已声明的模板变量。
    pub fn is_asset_selector(&self, value: &str) -> bool {
        is_uuid(value) || is_regex(value) || self.template.contains_template(value)
    }

    /// 按选择器匹配资产：`/pattern/` 整串匹配显示路径（非法正则不匹配），
    /// 否则按 UUID 相等；结果保持参考数据顺序且不重复。
    pub fn matched_assets(&self, selectors: &[String]) -> Vec<&'a Asset> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let mut patterns = Vec::new();
        let mut uuids = HashSet::new();
        for selector in selectors {
            if is_regex(selector) {
                patterns.extend(compile_selector(selector));
            } else {
                uuids.insert(selector.as_str());
            }
        }
        snapshot
            .assets
            .iter()
            .filter(|asset| {
                uuids.contains(asset.uuid.as_str())
                    || patterns
                        .iter()
                        .any(|pattern| pattern.is_match(asset.display_path()))
            })
            .collect()
    }

    /// 先展开模板变量，再匹配资产。
    pub fn selected_assets(&self, selector: &str) -> Vec<&'a Asset> {
        self.matched_assets(&self.expand(selector))
    }

    fn configured_event_types(&self, asset_selector: &str) -> HashSet<&'a str> {
        let Some(snapshot) = self.snapshot() else {
            return HashSet::new();
        };
        let assets: HashSet<&str> = self
            .selected_assets(asset_selector)
            .into_iter()
            .map(|asset| asset.uuid.as_str())
            .collect();
        snapshot
            .event_configurations
            .iter()
            .filter(|config| assets.contains(config.asset_uuid.as_str()))
            .map(|config| config.event_type_uuid.as_str())
            .collect()
    }

    /// 与所选资产存在事件配置关联的事件类型。
    pub fn available_event_types(&self, asset_selector: &str) -> Vec<SelectOption> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let configured = self.configured_event_types(asset_selector);
        let options = snapshot
            .event_types
            .iter()
            .filter(|event_type| configured.contains(event_type.uuid.as_str()))
            .map(|event_type| SelectOption::new(&event_type.name, &event_type.uuid))
            .collect();
        self.with_placeholders(options)
    }

    /// 过滤掉与所选资产无关联的事件类型；含模板变量的选择始终保留。
    pub fn filter_event_types(&self, selected: &[String], asset_selector: &str) -> Vec<String> {
        if self.is_loading() {
            return Vec::new();
        }
        let configured = self.configured_event_types(asset_selector);
        selected
            .iter()
            .filter(|event_type| {
                self.template.contains_template(event_type)
                    || configured.contains(event_type.as_str())
            })
            .cloned()
            .collect()
    }

    /// 按名称选择的事件类型换成其 UUID，其余原样保留。
    pub fn resolve_event_types(&self, selected: &[String]) -> Vec<String> {
        let Some(snapshot) = self.snapshot() else {
            return selected.to_vec();
        };
        selected
            .iter()
            .map(|value| {
                snapshot
                    .event_types
                    .iter()
                    .find(|event_type| event_type.name == *value)
                    .map(|event_type| event_type.uuid.clone())
                    .unwrap_or_else(|| value.clone())
            })
            .collect()
    }

    /// 展开后的事件类型 UUID。
    pub fn selected_event_types(&self, selectors: &[String]) -> Vec<String> {
        self.expand_all(selectors)
    }

    /// 所选事件类型的父事件类型 UUID。
    pub fn selected_parent_event_types(&self, selectors: &[String]) -> Vec<String> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let selected = self.selected_event_types(selectors);
        let parents: HashSet<&str> = snapshot
            .event_types
            .iter()
            .filter(|event_type| selected.contains(&event_type.uuid))
            .filter_map(|event_type| event_type.parent_uuid.as_deref())
            .collect();
        snapshot
            .event_types
            .iter()
            .filter(|event_type| parents.contains(event_type.uuid.as_str()))
            .map(|event_type| event_type.uuid.clone())
            .collect()
    }

    fn has_template(&self, selectors: &[String]) -> bool {
        selectors
            .iter()
            .any(|selector| self.template.contains_template(selector))
    }

    fn property_names<F>(&self, event_types: Option<&[String]>, keep: F) -> Vec<String>
    where
        F: Fn(PropertyType) -> bool,
    {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        snapshot
            .event_type_properties
            .iter()
            .filter(|property| keep(property.property_type))
            .filter(|property| {
                event_types.is_none_or(|uuids| uuids.contains(&property.event_type_uuid))
            })
            .filter(|property| seen.insert(property.name.as_str()))
            .map(|property| property.name.clone())
            .collect()
    }

    /// simple 属性名（去重，保持首次出现顺序）。选择中含模板变量时返回全部 simple 属性。
    pub fn available_simple_properties(
        &self,
        event_type_selectors: &[String],
        only_parent: bool,
    ) -> Vec<String> {
        let is_simple = |property_type: PropertyType| property_type == PropertyType::Simple;
        if self.has_template(event_type_selectors) {
            return self.property_names(None, is_simple);
        }
        let uuids = if only_parent {
            self.selected_parent_event_types(event_type_selectors)
        } else {
            self.selected_event_types(event_type_selectors)
        };
        self.property_names(Some(&uuids), is_simple)
    }

    /// 周期属性名：查询类型为 periodic 时包含 periodic 与带维度属性，否则仅带维度属性。
    pub fn available_periodic_properties(
        &self,
        event_type_selectors: &[String],
        query_type: PropertyType,
    ) -> Vec<String> {
        let keep = |property_type: PropertyType| match query_type {
            PropertyType::Periodic => matches!(
                property_type,
                PropertyType::Periodic | PropertyType::PeriodicWithDimension
            ),
            _ => property_type == PropertyType::PeriodicWithDimension,
        };
        if self.has_template(event_type_selectors) {
            return self.property_names(None, keep);
        }
        let uuids = self.selected_event_types(event_type_selectors);
        self.property_names(Some(&uuids), keep)
    }

    /// 属性下拉选项；simple 查询可附带 `parent:` 前缀的父事件属性。
    pub fn available_properties(
        &self,
        event_types: &[String],
        include_parent: bool,
        query_type: PropertyType,
    ) -> Vec<SelectOption> {
        let names = match query_type {
            PropertyType::Simple => {
                let mut names = self.available_simple_properties(event_types, false);
                if include_parent {
                    names.extend(
                        self.available_simple_properties(event_types, true)
                            .into_iter()
                            .map(|name| format!("{PARENT_PREFIX}{name}")),
                    );
                }
                names
            }
            _ => self.available_periodic_properties(event_types, query_type),
        };
        self.with_placeholders(names.into_iter().map(SelectOption::plain).collect())
    }

    /// 只保留当前仍可选的属性。
    pub fn filter_properties(
        &self,
        properties: &[String],
        event_types: &[String],
        include_parent: bool,
        query_type: PropertyType,
    ) -> Vec<String> {
        let available: HashSet<String> = self
            .available_properties(event_types, include_parent, query_type)
            .into_iter()
            .map(|option| option.value)
            .collect();
        properties
            .iter()
            .filter(|property| available.contains(property.as_str()))
            .cloned()
            .collect()
    }

    fn find_property(
        &self,
        name: &str,
        is_parent: bool,
        event_types: &[String],
    ) -> Option<&'a EventTypeProperty> {
        let snapshot = self.snapshot()?;
        let uuids = if is_parent {
            self.selected_parent_event_types(event_types)
        } else {
            self.selected_event_types(event_types)
        };
        snapshot
            .event_type_properties
            .iter()
            .filter(|property| uuids.contains(&property.event_type_uuid))
            .find(|property| property.name == name)
    }

    /// 属性值建议：仅布尔属性给出 `true`/`false`。键可带 `parent:` 前缀。
    pub fn available_property_values(&self, key: &str, event_types: &[String]) -> Vec<String> {
        let (is_parent, name) = split_parent(key);
        match self.find_property(name, is_parent, event_types) {
            Some(property) if property.datatype == PropertyDatatype::Bool => {
                vec!["true".to_string(), "false".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// 属性数据类型：`duration` 为字符串，无法解析时为数值。
    pub fn property_datatype(
        &self,
        name: &str,
        is_parent: bool,
        event_types: &[String],
    ) -> PropertyDatatype {
        if name == DURATION_KEY {
            return PropertyDatatype::String;
        }
        self.find_property(name, is_parent, event_types)
            .map(|property| property.datatype)
            .unwrap_or_default()
    }

    /// WHERE 标签键：`duration`（受版本门控）、simple 属性、`parent:` 前缀的父属性。
    pub fn tag_key_options(&self, event_types: &[String], version: &str) -> Vec<String> {
        if self.is_loading() {
            return Vec::new();
        }
        let duration = is_feature_enabled(version, &self.settings.duration_filter_version, true);
        let mut keys = Vec::new();
        if duration {
            keys.push(DURATION_KEY.to_string());
        }
        keys.extend(self.available_simple_properties(event_types, false));
        if duration {
            keys.push(format!("{PARENT_PREFIX}{DURATION_KEY}"));
        }
        keys.extend(
            self.available_simple_properties(event_types, true)
                .into_iter()
                .map(|name| format!("{PARENT_PREFIX}{name}")),
        );
        keys
    }

    /// WHERE 运算符（按服务端版本开放）。
    pub fn operators(&self, version: &str) -> Vec<Operator> {
        operators_for_version(version, &self.settings.extended_operators_version)
    }

    /// 查询类型下拉：带维度周期属性受版本门控，注解编辑器只允许 simple。
    pub fn property_type_options(&self, version: &str, annotation: bool) -> Vec<SelectOption> {
        PropertyType::ALL
            .into_iter()
            .filter(|property_type| {
                is_supported_property_type(
                    *property_type,
                    version,
                    &self.settings.duration_filter_version,
                )
            })
            .filter(|property_type| !annotation || *property_type == PropertyType::Simple)
            .map(|property_type| SelectOption::new(property_type.label(), property_type.as_str()))
            .collect()
    }

    pub fn available_statuses(&self) -> Vec<SelectOption> {
        self.with_placeholders(EVENT_STATUSES.into_iter().map(SelectOption::plain).collect())
    }

    /// 资产级联树，末尾追加占位符叶子；`with_properties` 时资产下挂资产属性。
    pub fn asset_options(&self, with_properties: bool) -> Result<Vec<CascaderOption>, TreeError> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(Vec::new());
        };
        let properties: &[AssetProperty] = if with_properties {
            &snapshot.asset_properties
        } else {
            &[]
        };
        let leaves = self
            .template
            .placeholders()
            .into_iter()
            .map(CascaderOption::from)
            .collect();
        build_asset_tree(None, &snapshot.assets, properties, leaves)
    }

    /// 所选资产上的资产属性名（去重）。
    pub fn available_asset_properties(&self, asset_selectors: &[String]) -> Vec<SelectOption> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let assets: HashSet<&str> = self
            .matched_assets(&self.expand_all(asset_selectors))
            .into_iter()
            .map(|asset| asset.uuid.as_str())
            .collect();
        let mut seen = HashSet::new();
        let options = snapshot
            .asset_properties
            .iter()
            .filter(|property| assets.contains(property.asset_uuid.as_str()))
            .filter(|property| seen.insert(property.name.as_str()))
            .map(|property| SelectOption::plain(&property.name))
            .collect();
        self.with_placeholders(options)
    }

    /// 选中的资产属性：属性选择器按 UUID 或名称匹配，且所属资产已选中。
    pub fn selected_asset_properties(
        &self,
        property_selectors: &[String],
        asset_selectors: &[String],
    ) -> Vec<&'a AssetProperty> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let selectors = self.expand_all(property_selectors);
        let assets: HashSet<&str> = self
            .matched_assets(&self.expand_all(asset_selectors))
            .into_iter()
            .map(|asset| asset.uuid.as_str())
            .collect();
        snapshot
            .asset_properties
            .iter()
            .filter(|property| {
                selectors
                    .iter()
                    .any(|selector| *selector == property.uuid || *selector == property.name)
            })
            .filter(|property| assets.contains(property.asset_uuid.as_str()))
            .collect()
    }

    /// 资产属性 UUID 对应的名称。
    pub fn asset_property_name(&self, uuid: &str) -> Option<&'a str> {
        self.snapshot()?
            .asset_properties
            .iter()
            .find(|property| property.uuid == uuid)
            .map(|property| property.name.as_str())
    }

    /// 资产选择器的显示文本。
    pub fn initial_label(&self, selector: &str) -> String {
        match self.snapshot() {
            Some(snapshot) => initial_label(selector, &snapshot.assets),
            None => selector.to_string(),
        }
    }
}
