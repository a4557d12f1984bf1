//! 资产级联树
//!
//! 按 `ParentUUID` 深度优先构建；每层先放子资产、再放资产属性，
//! 两组各自按标签排序（先不区分大小写，再区分大小写）。
//! 构建前沿每个资产的父链检查环，
//! 构建时再沿当前祖先路径记录已访问节点。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use domain::{Asset, AssetProperty, CascaderOption};
use thiserror::Error;

pub const ASSET_LABEL_PREFIX: &str = "📦 ";
pub const PROPERTY_LABEL_PREFIX: &str = "📏 ";

/// 搜索模式下各层标签之间的默认分隔符。
pub const DEFAULT_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("cyclic asset hierarchy at {uuid}")]
    CyclicHierarchy { uuid: String },
}

/// 构建 `parent` 之下的资产树；`extra_leaves` 仅追加在最外层末尾，不参与排序。
pub fn build_asset_tree(
    parent: Option<&str>,
    assets: &[Asset],
    asset_properties: &[AssetProperty],
    extra_leaves: Vec<CascaderOption>,
) -> Result<Vec<CascaderOption>, TreeError> {
    check_hierarchy(assets)?;
    let mut ancestors: HashSet<&str> = HashSet::new();
    if let Some(parent) = parent {
        ancestors.insert(parent);
    }
    let mut tree = build_level(parent, assets, asset_properties, &mut ancestors)?;
    tree.extend(extra_leaves);
    Ok(tree)
}

/// 沿每个资产的 `ParentUUID` 链向上走，同一条链上重复出现的节点即为环。
fn check_hierarchy(assets: &[Asset]) -> Result<(), TreeError> {
    let parents: HashMap<&str, Option<&str>> = assets
        .iter()
        .map(|asset| (asset.uuid.as_str(), asset.parent()))
        .collect();
    let mut acyclic: HashSet<&str> = HashSet::new();
    for asset in assets {
        let mut chain: HashSet<&str> = HashSet::new();
        let mut current = Some(asset.uuid.as_str());
        while let Some(uuid) = current {
            if acyclic.contains(uuid) {
                break;
            }
            if !chain.insert(uuid) {
                return Err(TreeError::CyclicHierarchy {
                    uuid: uuid.to_string(),
                });
            }
            current = parents.get(uuid).copied().flatten();
        }
        acyclic.extend(chain);
    }
    Ok(())
}

fn build_level<'a>(
    parent: Option<&str>,
    assets: &'a [Asset],
    asset_properties: &[AssetProperty],
    ancestors: &mut HashSet<&'a str>,
) -> Result<Vec<CascaderOption>, TreeError> {
    let mut level = Vec::new();
    for asset in assets.iter().filter(|asset| asset.parent() == parent) {
        if !ancestors.insert(asset.uuid.as_str()) {
            return Err(TreeError::CyclicHierarchy {
                uuid: asset.uuid.clone(),
            });
        }
        let mut items = build_level(Some(asset.uuid.as_str()), assets, asset_properties, ancestors)?;
        ancestors.remove(asset.uuid.as_str());

        let mut properties: Vec<CascaderOption> = asset_properties
            .iter()
            .filter(|property| property.asset_uuid == asset.uuid)
            .map(|property| {
                CascaderOption::leaf(
                    format!("{PROPERTY_LABEL_PREFIX}{}", property.name),
                    property.uuid.clone(),
                )
            })
            .collect();
        properties.sort_by(compare_labels);
        items.extend(properties);

        level.push(CascaderOption {
            label: format!("{ASSET_LABEL_PREFIX}{}", asset.name),
            value: asset.uuid.clone(),
            items,
        });
    }
    level.sort_by(compare_labels);
    Ok(level)
}

fn compare_labels(a: &CascaderOption, b: &CascaderOption) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.label.cmp(&b.label))
}

/// 扁平化后的可搜索选项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatOption {
    /// 全路径标签（各层以分隔符连接）。
    pub label: String,
    pub single_label: String,
    /// 从根到该节点的取值路径。
    pub path: Vec<String>,
}

/// 级联选择结果：资产选择器，以及选中属性时的属性 UUID。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascaderSelection {
    pub asset: String,
    pub property: Option<String>,
}

impl FlatOption {
    pub fn is_property(&self) -> bool {
        self.single_label.starts_with(PROPERTY_LABEL_PREFIX)
    }

    /// 选中该节点时提交的值；属性节点同时提交其所属资产。
    pub fn selection(&self) -> Option<CascaderSelection> {
        match self.path.as_slice() {
            [.., asset, property] if self.is_property() => Some(CascaderSelection {
                asset: asset.clone(),
                property: Some(property.clone()),
            }),
            [.., last] => Some(CascaderSelection {
                asset: last.clone(),
                property: None,
            }),
            [] => None,
        }
    }
}

/// 先序展开整棵树，分支节点与叶子都会出现。
pub fn flatten_options(tree: &[CascaderOption], separator: &str) -> Vec<FlatOption> {
    let mut flat = Vec::new();
    flatten_into(tree, separator, &mut Vec::new(), &mut flat);
    flat
}

fn flatten_into<'a>(
    options: &'a [CascaderOption],
    separator: &str,
    trail: &mut Vec<&'a CascaderOption>,
    flat: &mut Vec<FlatOption>,
) {
    for option in options {
        trail.push(option);
        flat.push(FlatOption {
            label: trail
                .iter()
                .map(|node| node.label.as_str())
                .collect::<Vec<_>>()
                .join(separator),
            single_label: option.label.clone(),
            path: trail.iter().map(|node| node.value.clone()).collect(),
        });
        flatten_into(&option.items, separator, trail, flat);
        trail.pop();
    }
}

pub fn find_option<'a>(flat: &'a [FlatOption], label: &str) -> Option<&'a FlatOption> {
    flat.iter().find(|option| option.label == label)
}

/// 搜索建议：全路径标签包含输入（不区分大小写）。
pub fn search_options<'a>(flat: &'a [FlatOption], input: &str) -> Vec<&'a FlatOption> {
    let needle = input.to_lowercase();
    flat.iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .collect()
}

/// 选择器的初始显示文本：已知资产显示其路径，否则原样显示。
pub fn initial_label(selector: &str, assets: &[Asset]) -> String {
    assets
        .iter()
        .find(|asset| asset.uuid == selector)
        .map(|asset| asset.display_path().to_string())
        .unwrap_or_else(|| selector.to_string())
}
