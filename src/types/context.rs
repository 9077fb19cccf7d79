use std::collections::{HashMap, HashSet};

use super::Identifier;

/// A screen the host is currently showing.
pub trait Screen {
    /// Fully-qualified type name, e.g. `net.minecraft.client.gui.screens.TitleScreen`.
    fn qualified_name(&self) -> &str;

    /// Unqualified type name. Defaults to the text after the last `.`.
    fn simple_name(&self) -> &str {
        let name = self.qualified_name();
        name.rsplit_once('.').map_or(name, |(_, simple)| simple)
    }
}

/// Host services consulted by screen rules and the screen step of the gate.
pub trait ScreenHost: Send + Sync {
    /// The host's built-in "may a tip render here" check.
    fn can_render_on(&self, screen: &dyn Screen) -> bool;

    /// Resolve an engine screen identifier to its qualified type name.
    fn screen_type(&self, id: &Identifier) -> Option<&str>;
}

/// Fixed identifier to screen type table.
///
/// Hosts typically populate this once at startup and delegate
/// [`ScreenHost::screen_type`] to [`ScreenTable::get`].
#[derive(Debug, Clone, Default)]
pub struct ScreenTable {
    types: HashMap<Identifier, String>,
}

impl ScreenTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen type under an identifier.
    #[must_use]
    pub fn with(mut self, id: Identifier, qualified_name: impl Into<String>) -> Self {
        self.insert(id, qualified_name);
        self
    }

    pub fn insert(&mut self, id: Identifier, qualified_name: impl Into<String>) {
        self.types.insert(id, qualified_name.into());
    }

    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<&str> {
        self.types.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &Identifier) -> bool {
        self.types.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// An entry of a tagged registry, such as a biome or a dimension type.
pub trait RegistryEntry {
    /// The registered identifier, or `None` for entries that are not bound
    /// to a registry key.
    fn id(&self) -> Option<&Identifier>;

    /// Tag-membership oracle.
    fn is_in(&self, tag: &Identifier) -> bool;
}

/// World-state facts about the active player.
pub trait PlayerView {
    fn biome(&self) -> &(dyn RegistryEntry + 'static);

    fn dimension(&self) -> &(dyn RegistryEntry + 'static);

    /// Identifiers of every completed milestone. May be expensive; the gate
    /// calls it at most once per evaluation.
    fn completed_milestones(&self) -> HashSet<Identifier>;
}

/// Everything a tip gate evaluation looks at.
#[derive(Clone, Copy)]
pub struct DisplayContext<'a> {
    screen: &'a (dyn Screen + 'static),
    host: &'a dyn ScreenHost,
    player: Option<&'a dyn PlayerView>,
}

impl<'a> DisplayContext<'a> {
    /// A context with no active player.
    #[must_use]
    pub fn new(screen: &'a (dyn Screen + 'static), host: &'a dyn ScreenHost) -> Self {
        Self {
            screen,
            host,
            player: None,
        }
    }

    #[must_use]
    pub fn with_player(mut self, player: &'a dyn PlayerView) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn screen(&self) -> &'a (dyn Screen + 'static) {
        self.screen
    }

    #[must_use]
    pub fn host(&self) -> &'a dyn ScreenHost {
        self.host
    }

    #[must_use]
    pub fn player(&self) -> Option<&'a dyn PlayerView> {
        self.player
    }
}
