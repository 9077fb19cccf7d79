use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use super::conditions::ConditionRules;
use super::context::{DisplayContext, RegistryEntry, Screen, ScreenHost};
use super::error::{ConditionError, TipError};
use super::identifier::Identifier;
use super::text::RichText;
use crate::compile::{
    IdentifierSetRuleCompiler, RegistryRuleCompiler, RuleCompiler, ScreenRuleCompiler,
};
use crate::config::TipsConfig;

/// The only tip type this crate reads and writes.
pub const SIMPLE_TIP_TYPE: &str = "tipsmod:simple";

/// The four condition categories a tip may carry.
///
/// Each category defaults to unconstrained.
#[derive(Debug, Default)]
pub struct TipConditions {
    pub(crate) screens: ConditionRules<dyn Screen>,
    pub(crate) biomes: ConditionRules<dyn RegistryEntry>,
    pub(crate) dimensions: ConditionRules<dyn RegistryEntry>,
    pub(crate) milestones: ConditionRules<HashSet<Identifier>>,
}

impl TipConditions {
    #[must_use]
    pub fn screens(&self) -> &ConditionRules<dyn Screen> {
        &self.screens
    }

    #[must_use]
    pub fn biomes(&self) -> &ConditionRules<dyn RegistryEntry> {
        &self.biomes
    }

    #[must_use]
    pub fn dimensions(&self) -> &ConditionRules<dyn RegistryEntry> {
        &self.dimensions
    }

    #[must_use]
    pub fn milestones(&self) -> &ConditionRules<HashSet<Identifier>> {
        &self.milestones
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
            && self.biomes.is_empty()
            && self.dimensions.is_empty()
            && self.milestones.is_empty()
    }

    fn write_json(&self) -> Option<Value> {
        let categories = [
            ("screens", self.screens.write_json()),
            ("biomes", self.biomes.write_json()),
            ("dimensions", self.dimensions.write_json()),
            ("advancements", self.milestones.write_json()),
        ];

        let obj: Map<String, Value> = categories
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_owned(), v)))
            .collect();
        if obj.is_empty() {
            None
        } else {
            Some(Value::Object(obj))
        }
    }
}

/// A displayable tip. Immutable once built.
#[derive(Debug)]
pub struct Tip {
    id: Identifier,
    title: RichText,
    text: RichText,
    cycle_time: Option<u32>,
    conditions: TipConditions,
}

impl Tip {
    /// A tip with no conditions and the default cycle time.
    #[must_use]
    pub fn new(id: Identifier, title: RichText, text: RichText) -> Self {
        Self {
            id,
            title,
            text,
            cycle_time: None,
            conditions: TipConditions::default(),
        }
    }

    /// Override the display time, in milliseconds.
    #[must_use]
    pub fn with_cycle_time(mut self, millis: u32) -> Self {
        self.cycle_time = Some(millis);
        self
    }

    #[must_use]
    pub fn with_screens(mut self, rules: ConditionRules<dyn Screen>) -> Self {
        self.conditions.screens = rules;
        self
    }

    #[must_use]
    pub fn with_biomes(mut self, rules: ConditionRules<dyn RegistryEntry>) -> Self {
        self.conditions.biomes = rules;
        self
    }

    #[must_use]
    pub fn with_dimensions(mut self, rules: ConditionRules<dyn RegistryEntry>) -> Self {
        self.conditions.dimensions = rules;
        self
    }

    #[must_use]
    pub fn with_milestones(mut self, rules: ConditionRules<HashSet<Identifier>>) -> Self {
        self.conditions.milestones = rules;
        self
    }

    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &RichText {
        &self.title
    }

    #[must_use]
    pub fn text(&self) -> &RichText {
        &self.text
    }

    #[must_use]
    pub fn conditions(&self) -> &TipConditions {
        &self.conditions
    }

    /// How long the tip stays up, falling back to the configured default.
    #[must_use]
    pub fn cycle_time(&self, config: &TipsConfig) -> Duration {
        Duration::from_millis(u64::from(
            self.cycle_time.unwrap_or(config.default_cycle_time),
        ))
    }

    /// Decide whether this tip may be shown right now.
    #[must_use]
    pub fn can_display(&self, ctx: &DisplayContext<'_>) -> bool {
        crate::evaluate::can_display(&self.id, &self.conditions, ctx)
    }

    /// Write the tip in the JSON form [`TipParser::parse`] reads.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String(SIMPLE_TIP_TYPE.into()));
        obj.insert("title".into(), self.title.to_json());
        obj.insert("tip".into(), self.text.to_json());
        if let Some(millis) = self.cycle_time {
            obj.insert("cycleTime".into(), Value::from(millis));
        }
        if let Some(conditions) = self.conditions.write_json() {
            obj.insert("conditions".into(), conditions);
        }
        Value::Object(obj)
    }
}

/// Reads tip entries from their JSON form.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use tipgate::{Identifier, Screen, ScreenHost, TipParser};
///
/// struct Host;
///
/// impl ScreenHost for Host {
///     fn can_render_on(&self, _: &dyn Screen) -> bool {
///         true
///     }
///
///     fn screen_type(&self, _: &Identifier) -> Option<&str> {
///         None
///     }
/// }
///
/// let parser = TipParser::new(Arc::new(Host));
/// let tip = parser
///     .parse(
///         "tipsmod:nether".parse().unwrap(),
///         &json!({
///             "title": "Tip",
///             "tip": "Beds explode in the nether.",
///             "conditions": { "dimensions": "minecraft:the_nether" }
///         }),
///     )
///     .unwrap();
/// assert!(tip.conditions().screens().is_empty());
/// assert!(!tip.conditions().dimensions().is_empty());
/// ```
#[derive(Clone)]
pub struct TipParser {
    screens: ScreenRuleCompiler,
    default_title: Option<RichText>,
}

impl TipParser {
    #[must_use]
    pub fn new(host: Arc<dyn ScreenHost>) -> Self {
        Self {
            screens: ScreenRuleCompiler::new(host),
            default_title: None,
        }
    }

    /// Title used by entries that do not set one. Without it, `title` is
    /// required unless the loading [`TipsConfig`] supplies a default.
    #[must_use]
    pub fn with_default_title(mut self, title: Option<RichText>) -> Self {
        self.default_title = title;
        self
    }

    #[must_use]
    pub fn default_title(&self) -> Option<&RichText> {
        self.default_title.as_ref()
    }

    /// Parse one tip entry.
    ///
    /// # Errors
    ///
    /// Returns [`TipError`] for a missing or invalid field, an unsupported
    /// `type`, or a malformed condition category. Individual bad rule
    /// strings do not fail the entry.
    pub fn parse(&self, id: Identifier, json: &Value) -> Result<Tip, TipError> {
        let Value::Object(obj) = json else {
            return Err(TipError::NotAnObject { id });
        };

        if let Some(kind) = obj.get("type") {
            if kind.as_str() != Some(SIMPLE_TIP_TYPE) {
                let found = kind.as_str().map_or_else(|| kind.to_string(), str::to_owned);
                return Err(TipError::UnsupportedType { id, found });
            }
        }

        let title = match obj.get("title") {
            Some(value) => text_field(&id, "title", value)?,
            None => match &self.default_title {
                Some(title) => title.clone(),
                None => return Err(TipError::MissingField { id, field: "title" }),
            },
        };

        let text = match obj.get("tip") {
            Some(value) => text_field(&id, "tip", value)?,
            None => return Err(TipError::MissingField { id, field: "tip" }),
        };

        let cycle_time = match obj.get("cycleTime") {
            Some(value) => Some(
                value
                    .as_u64()
                    .and_then(|millis| u32::try_from(millis).ok())
                    .ok_or(TipError::InvalidField {
                        id: id.clone(),
                        field: "cycleTime",
                        reason: "expected a non-negative whole number of milliseconds",
                    })?,
            ),
            None => None,
        };

        let conditions = match obj.get("conditions") {
            None => TipConditions::default(),
            Some(Value::Object(conditions)) => self.parse_conditions(&id, conditions)?,
            Some(_) => {
                return Err(TipError::InvalidField {
                    id,
                    field: "conditions",
                    reason: "expected an object",
                })
            }
        };

        Ok(Tip {
            id,
            title,
            text,
            cycle_time,
            conditions,
        })
    }

    /// Parse a tip entry from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TipError::InvalidJson`] if the text is not JSON, otherwise
    /// the same errors as [`parse`](Self::parse).
    pub fn parse_str(&self, id: Identifier, input: &str) -> Result<Tip, TipError> {
        match serde_json::from_str::<Value>(input) {
            Ok(json) => self.parse(id, &json),
            Err(e) => Err(TipError::InvalidJson {
                id,
                reason: e.to_string(),
            }),
        }
    }

    fn parse_conditions(
        &self,
        id: &Identifier,
        conditions: &Map<String, Value>,
    ) -> Result<TipConditions, TipError> {
        Ok(TipConditions {
            screens: category(id, conditions, "screens", &self.screens)?,
            biomes: category(id, conditions, "biomes", &RegistryRuleCompiler)?,
            dimensions: category(id, conditions, "dimensions", &RegistryRuleCompiler)?,
            milestones: category(id, conditions, "advancements", &IdentifierSetRuleCompiler)?,
        })
    }
}

fn text_field(id: &Identifier, field: &'static str, value: &Value) -> Result<RichText, TipError> {
    RichText::from_json(value).ok_or_else(|| TipError::InvalidField {
        id: id.clone(),
        field,
        reason: "expected a string, object, or array of text components",
    })
}

fn category<T, C>(
    id: &Identifier,
    conditions: &Map<String, Value>,
    key: &'static str,
    compiler: &C,
) -> Result<ConditionRules<T>, TipError>
where
    T: ?Sized,
    C: RuleCompiler<T>,
{
    ConditionRules::from_element(compiler, conditions.get(key)).map_err(|source: ConditionError| {
        TipError::Condition {
            id: id.clone(),
            category: key,
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::GroupKind;

    struct Host;

    impl ScreenHost for Host {
        fn can_render_on(&self, _: &dyn Screen) -> bool {
            true
        }

        fn screen_type(&self, _: &Identifier) -> Option<&str> {
            None
        }
    }

    fn parser() -> TipParser {
        TipParser::new(Arc::new(Host))
    }

    fn id() -> Identifier {
        "tipsmod:example".parse().unwrap()
    }

    #[test]
    fn parse_minimal_tip() {
        let tip = parser()
            .parse(id(), &json!({ "title": "Tip", "tip": "Hello" }))
            .unwrap();
        assert_eq!(tip.id(), &id());
        assert_eq!(tip.title(), &RichText::literal("Tip"));
        assert_eq!(tip.text(), &RichText::literal("Hello"));
        assert!(tip.conditions().is_empty());
    }

    #[test]
    fn cycle_time_falls_back_to_config() {
        let config = TipsConfig::default();
        let tip = parser()
            .parse(id(), &json!({ "title": "T", "tip": "B" }))
            .unwrap();
        assert_eq!(tip.cycle_time(&config), Duration::from_millis(5000));

        let tip = parser()
            .parse(id(), &json!({ "title": "T", "tip": "B", "cycleTime": 1200 }))
            .unwrap();
        assert_eq!(tip.cycle_time(&config), Duration::from_millis(1200));
    }

    #[test]
    fn missing_tip_text_fails() {
        let err = parser().parse(id(), &json!({ "title": "T" })).unwrap_err();
        assert_eq!(
            err,
            TipError::MissingField {
                id: id(),
                field: "tip"
            }
        );
    }

    #[test]
    fn missing_title_fails_without_default() {
        let err = parser().parse(id(), &json!({ "tip": "B" })).unwrap_err();
        assert_eq!(
            err,
            TipError::MissingField {
                id: id(),
                field: "title"
            }
        );
    }

    #[test]
    fn missing_title_uses_default() {
        let tip = parser()
            .with_default_title(Some(RichText::literal("Did you know?")))
            .parse(id(), &json!({ "tip": "B" }))
            .unwrap();
        assert_eq!(tip.title(), &RichText::literal("Did you know?"));
    }

    #[test]
    fn invalid_cycle_time_fails() {
        for bad in [json!(-1), json!(1.5), json!("fast"), json!(5_000_000_000_u64)] {
            let err = parser()
                .parse(id(), &json!({ "title": "T", "tip": "B", "cycleTime": bad }))
                .unwrap_err();
            assert!(
                matches!(err, TipError::InvalidField { field: "cycleTime", .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn unsupported_type_fails() {
        let err = parser()
            .parse(
                id(),
                &json!({ "type": "othermod:fancy", "title": "T", "tip": "B" }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TipError::UnsupportedType {
                id: id(),
                found: "othermod:fancy".into()
            }
        );
    }

    #[test]
    fn malformed_category_names_category() {
        let err = parser()
            .parse(
                id(),
                &json!({ "title": "T", "tip": "B", "conditions": { "biomes": { "any": ["x"] } } }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TipError::Condition {
                id: id(),
                category: "biomes",
                source: ConditionError::NoRecognizedKeys
            }
        );
    }

    #[test]
    fn bad_rule_does_not_fail_tip() {
        let tip = parser()
            .parse(
                id(),
                &json!({ "title": "T", "tip": "B", "conditions": { "biomes": ["~(", "minecraft:plains"] } }),
            )
            .unwrap();
        assert_eq!(
            tip.conditions().biomes().entries(GroupKind::AnyOf),
            &["~(", "minecraft:plains"]
        );
    }

    #[test]
    fn not_an_object_fails() {
        let err = parser().parse(id(), &json!(["T", "B"])).unwrap_err();
        assert_eq!(err, TipError::NotAnObject { id: id() });
    }

    #[test]
    fn parse_str_reports_bad_json() {
        let err = parser().parse_str(id(), "{ not json").unwrap_err();
        assert!(matches!(err, TipError::InvalidJson { .. }));
    }

    #[test]
    fn to_json_writes_every_field() {
        let input = json!({
            "type": SIMPLE_TIP_TYPE,
            "title": { "translate": "tip.title" },
            "tip": "Body",
            "cycleTime": 7000,
            "conditions": {
                "screens": "TitleScreen",
                "biomes": { "any_of": ["minecraft"], "none_of": ["minecraft:plains"] },
                "dimensions": ["minecraft:overworld", "minecraft:the_end"],
                "advancements": { "all_of": ["minecraft:story/root"] }
            }
        });
        let tip = parser().parse(id(), &input).unwrap();
        assert_eq!(tip.to_json(), input);
    }

    #[test]
    fn to_json_omits_empty_conditions() {
        let tip = Tip::new(id(), RichText::literal("T"), RichText::literal("B"));
        assert_eq!(
            tip.to_json(),
            json!({ "type": SIMPLE_TIP_TYPE, "title": "T", "tip": "B" })
        );
    }
}
