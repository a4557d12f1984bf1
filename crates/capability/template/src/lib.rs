//! 模板变量叠加
//!
//! 宿主声明的模板变量通过显式的 [`TemplateContext`] 传入每个选项解析函数，
//! 不读取任何全局状态。上下文无缓存，每次调用按当前变量重新计算：
//! - 每个选项列表末尾追加 `$name` 占位符
//! - 匹配前将占位符展开为零个或多个具体值
//!
//! 支持的引用语法：`$name`、`${name}`、`${name:format}`、`[[name]]`、`[[name:format]]`。
//! 未声明的变量原样保留。

use std::collections::BTreeMap;
use std::sync::OnceLock;

use domain::SelectOption;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// 请求级变量覆盖（优先于上下文中的同名变量）。
pub type ScopedVars = BTreeMap<String, Vec<String>>;

static VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn variable_regex() -> &'static Regex {
    VARIABLE_REGEX.get_or_init(|| {
        Regex::new(r"\$(\w+)|\[\[(\w+?)(?::(\w+))?\]\]|\$\{(\w+)(?:\.([^:^\}]+))?(?::([^\}]+))?\}")
            .expect("Valid regex pattern")
    })
}

/// 宿主声明的模板变量。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default)]
    pub current: Vec<String>,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>, current: Vec<String>) -> Self {
        Self {
            name: name.into(),
            current,
        }
    }

    /// 占位符形式 `$name`。
    pub fn placeholder(&self) -> String {
        format!("${}", self.name)
    }
}

/// 多值变量的格式化方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// 默认：单值原样，多值 `{a,b}`。
    Glob,
    Csv,
    Pipe,
    Regex,
    Raw,
}

impl TemplateFormat {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "csv" => Self::Csv,
            "pipe" => Self::Pipe,
            "regex" => Self::Regex,
            "raw" => Self::Raw,
            _ => Self::Glob,
        }
    }

    fn apply(&self, values: &[String]) -> String {
        match self {
            Self::Csv | Self::Raw => values.join(","),
            Self::Pipe => values.join("|"),
            Self::Regex => match values {
                [single] => regex::escape(single),
                _ => format!(
                    "({})",
                    values
                        .iter()
                        .map(|value| regex::escape(value))
                        .collect::<Vec<_>>()
                        .join("|")
                ),
            },
            Self::Glob => match values {
                [single] => single.clone(),
                _ if values.is_empty() => String::new(),
                _ => format!("{{{}}}", values.join(",")),
            },
        }
    }
}

/// 模板变量上下文：有序的变量列表。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    variables: Vec<TemplateVariable>,
}

impl TemplateContext {
    pub fn new(variables: Vec<TemplateVariable>) -> Self {
        Self { variables }
    }

    pub fn variables(&self) -> &[TemplateVariable] {
        &self.variables
    }

    pub fn get(&self, name: &str) -> Option<&TemplateVariable> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    /// 每个变量对应的 `$name` 选项，保持声明顺序。
    pub fn placeholders(&self) -> Vec<SelectOption> {
        self.variables
            .iter()
            .map(|variable| SelectOption::plain(variable.placeholder()))
            .collect()
    }

    /// 在选项列表末尾追加全部占位符（不按语义过滤）。
    pub fn with_placeholders(&self, mut options: Vec<SelectOption>) -> Vec<SelectOption> {
        options.extend(self.placeholders());
        options
    }

    /// 是否引用了已声明的变量。
    pub fn contains_template(&self, value: &str) -> bool {
        variable_regex()
            .captures_iter(value)
            .any(|caps| self.get(reference_name(&caps)).is_some())
    }

    /// 以默认格式展开。
    pub fn replace(&self, value: &str, scoped: &ScopedVars) -> String {
        self.replace_with_format(value, scoped, TemplateFormat::Glob)
    }

    /// 展开全部变量引用；引用中显式指定的格式优先于 `format`。
    pub fn replace_with_format(
        &self,
        value: &str,
        scoped: &ScopedVars,
        format: TemplateFormat,
    ) -> String {
        variable_regex()
            .replace_all(value, |caps: &Captures<'_>| {
                let name = reference_name(caps);
                let values = match scoped.get(name) {
                    Some(values) => values.as_slice(),
                    None => match self.get(name) {
                        Some(variable) => variable.current.as_slice(),
                        None => return caps[0].to_string(),
                    },
                };
                let format = reference_format(caps)
                    .map(TemplateFormat::parse)
                    .unwrap_or(format);
                format.apply(values)
            })
            .into_owned()
    }

    /// 展开为具体值列表：按 csv 格式替换后以逗号拆分，空串丢弃。
    pub fn multi_select_replace(&self, value: &str, scoped: &ScopedVars) -> Vec<String> {
        self.replace_with_format(value, scoped, TemplateFormat::Csv)
            .split(',')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 对每个选择器执行 [`Self::multi_select_replace`] 并拼接结果。
    pub fn expand_all(&self, selectors: &[String], scoped: &ScopedVars) -> Vec<String> {
        selectors
            .iter()
            .flat_map(|selector| self.multi_select_replace(selector, scoped))
            .collect()
    }
}

fn reference_name<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(4))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn reference_format<'a>(caps: &Captures<'a>) -> Option<&'a str> {
    caps.get(3).or_else(|| caps.get(6)).map(|m| m.as_str())
}
