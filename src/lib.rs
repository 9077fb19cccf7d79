//! Condition rules that decide when a tip may be shown.
//!
//! Tips are loaded from JSON definitions into a [`TipCatalog`]. Each tip
//! carries [`ConditionRules`] for screens, biomes, dimensions, and completed
//! milestones, compiled once at load time into predicates. At display time
//! [`Tip::can_display`] runs the gate against a [`DisplayContext`] supplied
//! by the host.

mod compile;
mod config;
mod error;
mod evaluate;
pub mod parse;
mod rotation;
mod types;

pub use compile::{
    IdentifierRuleCompiler, IdentifierSetRuleCompiler, Predicate, RegistryRuleCompiler,
    RuleCompiler, ScreenRuleCompiler, BUILT_IN_SCREENS, ENGINE_NAMESPACE,
};
pub use config::{TipsConfig, DEFAULT_CYCLE_TIME_MS};
pub use error::TipsError;
pub use rotation::TipRotation;
pub use types::{
    ConditionError, ConditionRules, DisplayContext, GroupKind, Identifier, PlayerView,
    RegistryEntry, RichText, RuleGroup, Screen, ScreenHost, ScreenTable, Tip, TipCatalog,
    TipConditions, TipError, TipParser, TipStore, SIMPLE_TIP_TYPE,
};
