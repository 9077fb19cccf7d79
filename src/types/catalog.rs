use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rand::seq::IteratorRandom;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::context::DisplayContext;
use super::error::TipError;
use super::identifier::Identifier;
use super::tip::{Tip, TipParser};
use crate::config::TipsConfig;
use crate::TipsError;

/// An immutable set of loaded tips.
///
/// Entries that fail to load are recorded in [`failures`](Self::failures)
/// and do not affect their siblings.
#[derive(Debug, Default)]
pub struct TipCatalog {
    tips: Vec<Tip>,
    index: HashMap<Identifier, usize>,
    failures: Vec<TipError>,
}

impl TipCatalog {
    /// Parse a batch of `(id, json)` entries.
    ///
    /// Entries ignored by `config` are skipped. When an id repeats, the
    /// later entry replaces the earlier one. The config's default title
    /// applies when `parser` has none of its own.
    pub fn load<I>(parser: &TipParser, config: &TipsConfig, entries: I) -> Self
    where
        I: IntoIterator<Item = (Identifier, Value)>,
    {
        let parser = with_config_title(parser, config);
        let mut catalog = Self::default();
        for (id, json) in entries {
            if catalog.skip_ignored(config, &id) {
                continue;
            }
            catalog.accept(parser.parse(id, &json));
        }
        catalog.log_summary();
        catalog
    }

    /// Load every `<root>/<namespace>/tips/<path>.json` file, using
    /// `namespace:path` as the tip id.
    ///
    /// # Errors
    ///
    /// Returns [`TipsError::Io`] if the directory tree cannot be listed.
    /// Unreadable or invalid files are recorded as failures and skipped.
    pub fn load_dir(
        parser: &TipParser,
        config: &TipsConfig,
        root: impl AsRef<Path>,
    ) -> Result<Self, TipsError> {
        let parser = with_config_title(parser, config);
        let mut catalog = Self::default();
        for (id, file) in tip_files(root.as_ref())? {
            if catalog.skip_ignored(config, &id) {
                continue;
            }
            let result = match fs::read_to_string(&file) {
                Ok(content) => parser.parse_str(id, &content),
                Err(e) => Err(TipError::Unreadable {
                    id,
                    reason: e.to_string(),
                }),
            };
            catalog.accept(result);
        }
        catalog.log_summary();
        Ok(catalog)
    }

    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<&Tip> {
        self.index.get(id).map(|&i| &self.tips[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tip> {
        self.tips.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    /// Entries that failed to load.
    #[must_use]
    pub fn failures(&self) -> &[TipError] {
        &self.failures
    }

    /// Tips that may be shown in `ctx`, in load order.
    pub fn displayable<'s>(&'s self, ctx: &'s DisplayContext<'s>) -> impl Iterator<Item = &'s Tip> + 's {
        self.tips.iter().filter(move |tip| tip.can_display(ctx))
    }

    /// Pick a displayable tip uniformly at random.
    pub fn random_tip<R: Rng + ?Sized>(&self, ctx: &DisplayContext<'_>, rng: &mut R) -> Option<&Tip> {
        self.tips
            .iter()
            .filter(|tip| tip.can_display(ctx))
            .choose(rng)
    }

    fn skip_ignored(&self, config: &TipsConfig, id: &Identifier) -> bool {
        let ignored = config.is_ignored(id);
        if ignored {
            debug!(tip = %id, "skipping ignored tip");
        }
        ignored
    }

    fn accept(&mut self, result: Result<Tip, TipError>) {
        match result {
            Ok(tip) => {
                if let Some(&i) = self.index.get(tip.id()) {
                    debug!(tip = %tip.id(), "replacing tip with a later entry");
                    self.tips[i] = tip;
                } else {
                    self.index.insert(tip.id().clone(), self.tips.len());
                    self.tips.push(tip);
                }
            }
            Err(e) => {
                warn!(tip = %e.id(), error = %e, "skipping tip that failed to load");
                self.failures.push(e);
            }
        }
    }

    fn log_summary(&self) {
        info!(
            loaded = self.tips.len(),
            failed = self.failures.len(),
            "loaded tips"
        );
    }
}

impl<'a> IntoIterator for &'a TipCatalog {
    type Item = &'a Tip;
    type IntoIter = std::slice::Iter<'a, Tip>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn with_config_title<'p>(parser: &'p TipParser, config: &TipsConfig) -> Cow<'p, TipParser> {
    match (parser.default_title(), &config.default_title) {
        (None, Some(title)) => {
            Cow::Owned(parser.clone().with_default_title(Some(title.clone())))
        }
        _ => Cow::Borrowed(parser),
    }
}

fn tip_files(root: &Path) -> Result<Vec<(Identifier, PathBuf)>, TipsError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let tips_dir = entry.path().join("tips");
        if !tips_dir.is_dir() {
            continue;
        }
        let namespace = entry.file_name().to_string_lossy().into_owned();
        collect_json(&tips_dir, &tips_dir, &namespace, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn collect_json(
    base: &Path,
    dir: &Path,
    namespace: &str,
    out: &mut Vec<(Identifier, PathBuf)>,
) -> Result<(), TipsError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json(base, &path, namespace, out)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(base) else {
            continue;
        };
        let tip_path = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        match Identifier::new(namespace, &tip_path) {
            Ok(id) => out.push((id, path)),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping tip file with an invalid name");
            }
        }
    }
    Ok(())
}

/// Holds the current catalog and swaps in reloaded ones.
///
/// Readers take an [`Arc`] snapshot; a reload never disturbs a snapshot
/// already handed out.
#[derive(Debug, Default)]
pub struct TipStore {
    current: RwLock<Arc<TipCatalog>>,
}

impl TipStore {
    #[must_use]
    pub fn new(catalog: TipCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog installed right now.
    #[must_use]
    pub fn current(&self) -> Arc<TipCatalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the catalog, returning the previous one.
    pub fn install(&self, catalog: TipCatalog) -> Arc<TipCatalog> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    use super::*;
    use crate::{RichText, Screen, ScreenHost};

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

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    fn entry(s: &str) -> (Identifier, Value) {
        (id(s), json!({ "title": "T", "tip": s }))
    }

    #[test]
    fn bad_entries_do_not_block_siblings() {
        let catalog = TipCatalog::load(
            &parser(),
            &TipsConfig::default(),
            vec![
                entry("tipsmod:a"),
                (id("tipsmod:broken"), json!({ "title": "T" })),
                (
                    id("tipsmod:bad_conditions"),
                    json!({ "title": "T", "tip": "B", "conditions": { "screens": 4 } }),
                ),
                entry("tipsmod:b"),
            ],
        );
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&id("tipsmod:a")).is_some());
        assert!(catalog.get(&id("tipsmod:b")).is_some());

        let failed: Vec<String> = catalog.failures().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(failed, vec!["tipsmod:broken", "tipsmod:bad_conditions"]);
    }

    #[test]
    fn ignored_entries_are_skipped() {
        let config = TipsConfig {
            ignored_namespaces: vec!["spam".into()],
            ignored_tips: vec![id("tipsmod:old")],
            ..TipsConfig::default()
        };
        let catalog = TipCatalog::load(
            &parser(),
            &config,
            vec![entry("spam:x"), entry("tipsmod:old"), entry("tipsmod:new")],
        );
        let ids: Vec<String> = catalog.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["tipsmod:new"]);
        assert!(catalog.failures().is_empty());
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let catalog = TipCatalog::load(
            &parser(),
            &TipsConfig::default(),
            vec![
                (id("tipsmod:a"), json!({ "title": "T", "tip": "first" })),
                (id("tipsmod:a"), json!({ "title": "T", "tip": "second" })),
            ],
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(&id("tipsmod:a")).unwrap().text().as_json(),
            &json!("second")
        );
    }

    #[test]
    fn random_tip_only_picks_displayable() {
        struct Named;
        impl Screen for Named {
            fn qualified_name(&self) -> &str {
                "a.b.PauseScreen"
            }
        }
        struct Player;
        impl crate::PlayerView for Player {
            fn biome(&self) -> &(dyn crate::RegistryEntry + 'static) {
                unreachable!("no biome rules in this test")
            }
            fn dimension(&self) -> &(dyn crate::RegistryEntry + 'static) {
                unreachable!("no dimension rules in this test")
            }
            fn completed_milestones(&self) -> std::collections::HashSet<Identifier> {
                std::collections::HashSet::new()
            }
        }

        let catalog = TipCatalog::load(
            &parser(),
            &TipsConfig::default(),
            vec![
                (
                    id("tipsmod:title_only"),
                    json!({ "title": "T", "tip": "B", "conditions": { "screens": "TitleScreen" } }),
                ),
                (
                    id("tipsmod:pause_only"),
                    json!({ "title": "T", "tip": "B", "conditions": { "screens": "PauseScreen" } }),
                ),
            ],
        );

        let host = Host;
        let ctx = DisplayContext::new(&Named, &host).with_player(&Player);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let tip = catalog.random_tip(&ctx, &mut rng).unwrap();
            assert_eq!(tip.id(), &id("tipsmod:pause_only"));
        }

        let shown: Vec<&Tip> = catalog.displayable(&ctx).collect();
        assert_eq!(shown.len(), 1);
    }

    #[test]
    fn load_dir_reads_namespaced_files() {
        let dir = tempfile::tempdir().unwrap();
        let tips = dir.path().join("tipsmod").join("tips").join("nether");
        fs::create_dir_all(&tips).unwrap();
        fs::write(tips.join("beds.json"), r#"{ "title": "T", "tip": "Boom" }"#).unwrap();
        fs::write(tips.join("broken.json"), "{").unwrap();
        fs::write(tips.join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("other")).unwrap();

        let catalog = TipCatalog::load_dir(&parser(), &TipsConfig::default(), dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&id("tipsmod:nether/beds")).is_some());
        assert_eq!(catalog.failures().len(), 1);
        assert_eq!(catalog.failures()[0].id(), &id("tipsmod:nether/broken"));
    }

    #[test]
    fn config_default_title_fills_missing_titles() {
        let config = TipsConfig {
            default_title: Some(RichText::literal("Did you know?")),
            ..TipsConfig::default()
        };
        let catalog = TipCatalog::load(
            &parser(),
            &config,
            vec![(id("tipsmod:a"), json!({ "tip": "Body" }))],
        );
        assert!(catalog.failures().is_empty());
        assert_eq!(
            catalog.get(&id("tipsmod:a")).unwrap().title(),
            &RichText::literal("Did you know?")
        );
    }

    #[test]
    fn parser_default_title_wins_over_config() {
        let config = TipsConfig {
            default_title: Some(RichText::literal("From config")),
            ..TipsConfig::default()
        };
        let parser = parser().with_default_title(Some(RichText::literal("From parser")));
        let catalog = TipCatalog::load(
            &parser,
            &config,
            vec![(id("tipsmod:a"), json!({ "tip": "Body" }))],
        );
        assert_eq!(
            catalog.get(&id("tipsmod:a")).unwrap().title(),
            &RichText::literal("From parser")
        );
    }

    #[test]
    fn load_dir_applies_config_title_and_records_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let tips = dir.path().join("tipsmod").join("tips");
        fs::create_dir_all(&tips).unwrap();
        fs::write(tips.join("untitled.json"), r#"{ "tip": "Body" }"#).unwrap();
        fs::write(tips.join("garbled.json"), [0xff_u8, 0xfe, 0xfd]).unwrap();

        let config = TipsConfig {
            default_title: Some(RichText::literal("Tip")),
            ..TipsConfig::default()
        };
        let catalog = TipCatalog::load_dir(&parser(), &config, dir.path()).unwrap();

        assert_eq!(
            catalog.get(&id("tipsmod:untitled")).unwrap().title(),
            &RichText::literal("Tip")
        );
        assert_eq!(catalog.failures().len(), 1);
        assert!(matches!(
            &catalog.failures()[0],
            TipError::Unreadable { id: failed, .. } if failed == &id("tipsmod:garbled")
        ));
    }

    #[test]
    fn load_dir_missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TipCatalog::load_dir(
            &parser(),
            &TipsConfig::default(),
            dir.path().join("missing"),
        );
        assert!(matches!(result, Err(TipsError::Io(_))));
    }

    #[test]
    fn store_swaps_without_disturbing_snapshots() {
        let store = TipStore::new(TipCatalog::load(
            &parser(),
            &TipsConfig::default(),
            vec![entry("tipsmod:old")],
        ));
        let before = store.current();

        let previous = store.install(TipCatalog::load(
            &parser(),
            &TipsConfig::default(),
            vec![entry("tipsmod:new"), entry("tipsmod:newer")],
        ));

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.len(), 1);
        assert!(before.get(&id("tipsmod:old")).is_some());
        assert_eq!(store.current().len(), 2);
    }
}
