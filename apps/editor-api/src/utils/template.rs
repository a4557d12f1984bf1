//! 请求中的模板变量 → 模板上下文

use api_contract::TemplateVariableDto;
use historian_template::{TemplateContext, TemplateVariable};

pub fn template_context(variables: &[TemplateVariableDto]) -> TemplateContext {
    TemplateContext::new(
        variables
            .iter()
            .map(|variable| TemplateVariable::new(variable.name.clone(), variable.current.clone()))
            .collect(),
    )
}
