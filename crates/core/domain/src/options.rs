//! 下拉与级联选项。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// 标签与取值相同的选项。
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// 级联选项树节点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascaderOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CascaderOption>,
}

impl CascaderOption {
    pub fn leaf(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            items: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<SelectOption> for CascaderOption {
    fn from(option: SelectOption) -> Self {
        Self::leaf(option.label, option.value)
    }
}
