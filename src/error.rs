use thiserror::Error;

use crate::parse::ParseError;
use crate::{ConditionError, TipError};

/// Unified error type covering parsing, tip definitions, config, and I/O.
///
/// Returned by [`TipCatalog::load_dir()`](crate::TipCatalog::load_dir) and
/// [`TipsConfig::save()`](crate::TipsConfig::save).
#[derive(Debug, Error)]
pub enum TipsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Tip(#[from] TipError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
