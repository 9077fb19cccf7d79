mod catalog;
mod conditions;
mod context;
mod error;
mod identifier;
mod rule_group;
mod text;
mod tip;

pub use catalog::{TipCatalog, TipStore};
pub use conditions::ConditionRules;
pub use context::{DisplayContext, PlayerView, RegistryEntry, Screen, ScreenHost, ScreenTable};
pub use error::{ConditionError, TipError};
pub use identifier::Identifier;
pub use rule_group::{GroupKind, RuleGroup};
pub use text::RichText;
pub use tip::{Tip, TipConditions, TipParser, SIMPLE_TIP_TYPE};
