//! 宿主边界
//!
//! 宿主持有权威查询；编辑器每次合并后立即通过 `on_change` 交还，
//! 只有在查询可执行时才调用 `on_run_query`。

use domain::{EventQuery, FieldUpdate, HostQuery, QueryBody, QueryType};
use historian_options::OptionResolver;
use historian_telemetry::{record_query_change, record_run_requested, record_run_suppressed};
use tracing::debug;

use crate::error::ComposerError;
use crate::reduce::{ReduceContext, empty_body, is_event_runnable, is_runnable, reduce};
use crate::settings::ComposerSettings;

/// 宿主回调。
pub trait QueryHost: Send {
    /// 宿主当前持有的查询。
    fn query(&self) -> HostQuery;

    fn on_change(&mut self, query: HostQuery);

    fn on_run_query(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    Query,
    /// 注解编辑器：只编辑 simple 事件查询，每次变更后尝试执行。
    Annotation,
}

impl EditorKind {
    pub fn is_runnable(&self, query: &HostQuery) -> bool {
        match self {
            Self::Query => is_runnable(query),
            Self::Annotation => query.event_query().is_some_and(is_event_runnable),
        }
    }
}

pub struct QueryComposer<H> {
    host: H,
    kind: EditorKind,
    settings: ComposerSettings,
}

impl<H: QueryHost> QueryComposer<H> {
    pub fn new(host: H, kind: EditorKind, settings: ComposerSettings) -> Self {
        Self {
            host,
            kind,
            settings,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// 补齐宿主查询：缺少查询体时按编辑器类型写入空查询体，并打上默认序列上限。
    pub fn initialize(&mut self) -> HostQuery {
        let mut query = self.host.query();
        if query.body.is_some() {
            return query;
        }
        let query_type = match self.kind {
            EditorKind::Query => query
                .tab_index
                .unwrap_or(self.settings.default_tab)
                .query_type(),
            EditorKind::Annotation => QueryType::EventQuery,
        };
        query.body = Some(match self.kind {
            EditorKind::Query => empty_body(query_type, self.settings.alerting),
            EditorKind::Annotation => QueryBody::EventQuery(EventQuery::default()),
        });
        query.tab_index = Some(query_type.tab());
        if query.series_limit.is_none() {
            query.series_limit = Some(self.settings.default_series_limit);
        }
        debug!(ref_id = %query.ref_id, query_type = query_type.as_str(), "query initialized");
        self.commit(query.clone());
        query
    }

    /// 合并一次字段更新并立即交还宿主；注解编辑器随后尝试执行。
    pub fn apply(
        &mut self,
        update: FieldUpdate,
        resolver: &OptionResolver<'_>,
    ) -> Result<HostQuery, ComposerError> {
        self.check(&update)?;
        let ctx = ReduceContext {
            resolver,
            policy: self.settings.policy,
            alerting: self.settings.alerting,
        };
        let next = reduce(&self.host.query(), update, &ctx)?;
        self.commit(next.clone());
        if self.kind == EditorKind::Annotation {
            self.run();
        }
        Ok(next)
    }

    /// 查询可执行时请求宿主执行，否则静默忽略。
    pub fn run(&mut self) -> bool {
        let query = self.host.query();
        if !self.kind.is_runnable(&query) {
            record_run_suppressed();
            debug!(ref_id = %query.ref_id, "run suppressed: query incomplete");
            return false;
        }
        record_run_requested();
        self.host.on_run_query();
        true
    }

    fn check(&self, update: &FieldUpdate) -> Result<(), ComposerError> {
        if self.kind != EditorKind::Annotation {
            return Ok(());
        }
        let switches_away = match update {
            FieldUpdate::QueryType(query_type) => *query_type != QueryType::EventQuery,
            FieldUpdate::TabIndex(tab) => tab.query_type() != QueryType::EventQuery,
            _ => false,
        };
        if switches_away || update.target().is_some_and(|target| target != QueryType::EventQuery) {
            return Err(ComposerError::Unsupported {
                kind: self.kind,
                update: format!("{update:?}"),
            });
        }
        Ok(())
    }

    fn commit(&mut self, query: HostQuery) {
        record_query_change();
        self.host.on_change(query);
    }
}
