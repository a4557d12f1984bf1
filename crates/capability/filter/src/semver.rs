//! 语义化版本
//!
//! 无法解析的版本（开发构建等）视为“调试版”，比任何正式版本都新。

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

static SEMVER_REGEX: OnceLock<Regex> = OnceLock::new();

fn semver_regex() -> &'static Regex {
    SEMVER_REGEX.get_or_init(|| {
        Regex::new(
            r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|[0-9a-zA-Z-]+)(?:\.(?:0|[1-9]\d*|[0-9a-zA-Z-]+))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
        )
        .expect("Valid regex pattern")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build_metadata: Option<String>,
    pub debug: bool,
}

impl SemVer {
    fn debug_build() -> Self {
        Self {
            major: u64::MAX,
            minor: u64::MAX,
            patch: u64::MAX,
            pre_release: None,
            build_metadata: None,
            debug: true,
        }
    }

    /// 解析版本号，允许前导 `v`。
    pub fn parse(version: &str) -> Self {
        let version = version.strip_prefix('v').unwrap_or(version);
        let Some(caps) = semver_regex().captures(version) else {
            return Self::debug_build();
        };
        let number = |index: usize| caps.get(index).and_then(|m| m.as_str().parse::<u64>().ok());
        match (number(1), number(2), number(3)) {
            (Some(major), Some(minor), Some(patch)) => Self {
                major,
                minor,
                patch,
                pre_release: caps.get(4).map(|m| m.as_str().to_string()),
                build_metadata: caps.get(5).map(|m| m.as_str().to_string()),
                debug: false,
            },
            _ => Self::debug_build(),
        }
    }

    /// 去掉预发布标识后的版本。
    pub fn without_pre_release(mut self) -> Self {
        self.pre_release = None;
        self
    }

    /// 版本优先级比较，构建元数据不参与。
    pub fn precedence(&self, other: &Self) -> Ordering {
        match (self.debug, other.debug) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (Some(a), Some(b)) => compare_pre_release(a, b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.debug {
            return f.write_str("debug");
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build_metadata {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

/// 逐段比较预发布标识：数字段按数值，数字段小于非数字段，其余按字典序。
fn compare_pre_release(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for index in 0..a_parts.len().max(b_parts.len()) {
        let a_part = a_parts.get(index).copied().unwrap_or("");
        let b_part = b_parts.get(index).copied().unwrap_or("");
        let a_num = numeric(a_part);
        let b_num = numeric(b_part);

        let ordering = match (a_num, b_num) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => a_part.cmp(b_part),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

fn numeric(part: &str) -> Option<u128> {
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

/// 比较两个版本字符串（构建元数据不参与比较）。
pub fn semver_compare(a: &str, b: &str) -> Ordering {
    SemVer::parse(a).precedence(&SemVer::parse(b))
}

/// `version >= target`；`include_pre_releases` 时先去掉 `version` 的预发布标识。
pub fn is_feature_enabled(version: &str, target: &str, include_pre_releases: bool) -> bool {
    let mut current = SemVer::parse(version);
    if include_pre_releases {
        current = current.without_pre_release();
    }
    current.precedence(&SemVer::parse(target)) != Ordering::Less
}
