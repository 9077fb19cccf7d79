use std::cell::OnceCell;
use std::collections::HashSet;

use tracing::trace;

use crate::{DisplayContext, Identifier, PlayerView, TipConditions};

/// Derived facts for one gate evaluation. Each is computed at most once and
/// dropped with the evaluation.
struct Facts<'a> {
    player: &'a dyn PlayerView,
    completed: OnceCell<HashSet<Identifier>>,
}

impl<'a> Facts<'a> {
    fn new(player: &'a dyn PlayerView) -> Self {
        Self {
            player,
            completed: OnceCell::new(),
        }
    }

    fn completed_milestones(&self) -> &HashSet<Identifier> {
        self.completed
            .get_or_init(|| self.player.completed_milestones())
    }
}

/// The tip gate. Checks run in a fixed order and stop at the first failure:
/// screen, active player, biome, dimension, completed milestones.
pub(crate) fn can_display(id: &Identifier, conditions: &TipConditions, ctx: &DisplayContext<'_>) -> bool {
    let screen = ctx.screen();
    let screen_ok = if conditions.screens.is_empty() {
        ctx.host().can_render_on(screen)
    } else {
        conditions.screens.test(screen)
    };
    if !screen_ok {
        trace!(tip = %id, "hidden on this screen");
        return false;
    }

    let Some(player) = ctx.player() else {
        trace!(tip = %id, "hidden without an active player");
        return false;
    };

    if !conditions.biomes.is_empty() && !conditions.biomes.test(player.biome()) {
        trace!(tip = %id, "hidden in this biome");
        return false;
    }

    if !conditions.dimensions.is_empty()
        && !conditions.dimensions.test(player.dimension())
    {
        trace!(tip = %id, "hidden in this dimension");
        return false;
    }

    let facts = Facts::new(player);
    if !conditions.milestones.is_empty()
        && !conditions.milestones.test(facts.completed_milestones())
    {
        trace!(tip = %id, "hidden until milestones are completed");
        return false;
    }

    true
}
