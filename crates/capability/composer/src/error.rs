//! 查询组合错误

use domain::QueryType;
use historian_data_api::DataApiError;
use historian_options::TreeError;
use thiserror::Error;

use crate::host::EditorKind;

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("update targets {expected:?} but query body is {found:?}")]
    BodyMismatch {
        expected: QueryType,
        found: Option<QueryType>,
    },
    #[error("{kind:?} editor does not accept {update}")]
    Unsupported { kind: EditorKind, update: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Data(#[from] DataApiError),
}
