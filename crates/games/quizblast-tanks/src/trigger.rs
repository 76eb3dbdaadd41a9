use serde::{Deserialize, Serialize};

use quizblast_core::question::QuestionId;

use crate::collision::Rect;
use crate::error::WorldError;
use crate::world::{Tile, TileWorld};

/// Trigger placement as written in a layout file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub tx: u32,
    pub ty: u32,
    pub question: QuestionId,
}

/// A one-tile zone that pauses play for a question on first contact.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerZone {
    pub tx: u32,
    pub ty: u32,
    pub rect: Rect,
    /// True until consumed. Never reactivated.
    pub active: bool,
    pub question: QuestionId,
}

/// Validate trigger placements against the world and build the zones.
///
/// Zones keep layout order; that order decides which zone wins when the
/// player overlaps several in one tick.
pub fn build_triggers(
    world: &TileWorld,
    specs: &[TriggerSpec],
) -> Result<Vec<TriggerZone>, WorldError> {
    let mut zones: Vec<TriggerZone> = Vec::with_capacity(specs.len());
    for spec in specs {
        let (tx, ty) = (spec.tx, spec.ty);
        if !world.in_bounds(tx, ty) {
            return Err(WorldError::TriggerOutOfBounds { tx, ty });
        }
        if world.is_boundary(tx, ty) {
            return Err(WorldError::TriggerOnBoundary { tx, ty });
        }
        if world.tile(tx, ty) == Tile::Steel {
            return Err(WorldError::TriggerOnSteel { tx, ty });
        }
        if zones.iter().any(|z| z.tx == tx && z.ty == ty) {
            return Err(WorldError::DuplicateTrigger { tx, ty });
        }
        let ts = world.tile_size();
        zones.push(TriggerZone {
            tx,
            ty,
            rect: Rect::square(world.tile_origin(tx, ty), ts),
            active: true,
            question: spec.question,
        });
    }
    Ok(zones)
}

/// Find the first active zone the hitbox overlaps and consume it.
///
/// Scanning stops at the first hit; any other overlapped zones stay active
/// and will fire on a later tick.
pub fn scan_triggers<'a>(
    zones: &'a mut [TriggerZone],
    hitbox: &Rect,
) -> Option<&'a TriggerZone> {
    let zone = zones
        .iter_mut()
        .find(|z| z.active && z.rect.overlaps(hitbox))?;
    zone.active = false;
    Some(zone)
}
