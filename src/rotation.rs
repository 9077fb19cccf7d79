use std::time::Instant;

use rand::Rng;
use tracing::debug;

use crate::{DisplayContext, Identifier, Tip, TipCatalog, TipsConfig};

#[derive(Debug, Clone)]
struct Active {
    id: Identifier,
    since: Instant,
}

/// Chooses which tip is on screen from one frame to the next.
///
/// A tip is picked when a new screen opens with no tip active, and replaced
/// once its cycle time has elapsed. `K` identifies a screen instance; any
/// key that changes when the host opens a different screen works.
#[derive(Debug, Clone)]
pub struct TipRotation<K> {
    active: Option<Active>,
    last_screen: Option<K>,
}

impl<K> Default for TipRotation<K> {
    fn default() -> Self {
        Self {
            active: None,
            last_screen: None,
        }
    }
}

impl<K: PartialEq> TipRotation<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the tip currently chosen, whether or not it is displayable.
    #[must_use]
    pub fn current(&self) -> Option<&Identifier> {
        self.active.as_ref().map(|active| &active.id)
    }

    /// Advance the rotation for one frame and return the tip to draw, if any.
    pub fn tick<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c TipCatalog,
        config: &TipsConfig,
        ctx: &DisplayContext<'_>,
        screen: K,
        now: Instant,
        rng: &mut R,
    ) -> Option<&'c Tip> {
        if self.active.is_none() && self.last_screen.as_ref() != Some(&screen) {
            self.active = pick(catalog, ctx, now, rng);
            self.last_screen = Some(screen);
        }

        let expired = self.active.as_ref().is_some_and(|active| {
            catalog.get(&active.id).map_or(true, |tip| {
                now.saturating_duration_since(active.since) > tip.cycle_time(config)
            })
        });
        if expired {
            self.active = pick(catalog, ctx, now, rng);
        }

        let tip = catalog.get(&self.active.as_ref()?.id)?;
        tip.can_display(ctx).then_some(tip)
    }
}

fn pick<R: Rng + ?Sized>(
    catalog: &TipCatalog,
    ctx: &DisplayContext<'_>,
    now: Instant,
    rng: &mut R,
) -> Option<Active> {
    let tip = catalog.random_tip(ctx, rng)?;
    debug!(tip = %tip.id(), "showing tip");
    Some(Active {
        id: tip.id().clone(),
        since: now,
    })
}
