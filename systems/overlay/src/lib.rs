#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Debug overlay system that inspects the geometry around the player.
//!
//! Once per tick the overlay reads the broad-phase candidates near the
//! player's center and narrows them to the rectangles whose bounds actually
//! overlap the player.

use log::trace;
use maze_dash_core::{Event, Point, RectId, StaticRect};
use maze_dash_world::{query, World};

/// Snapshot of the geometry inspected around one probe point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayView {
    /// Point the broad-phase query was issued for.
    pub probe: Point,
    /// Every rectangle the broad phase returned, in ascending order.
    pub candidates: Vec<RectId>,
    /// Candidates whose bounds overlap the player.
    pub overlapping: Vec<RectId>,
}

impl OverlayView {
    /// Reports whether the rectangle was returned by the broad phase.
    #[must_use]
    pub fn is_candidate(&self, id: RectId) -> bool {
        self.candidates.binary_search(&id).is_ok()
    }

    /// Reports whether the rectangle overlaps the player.
    #[must_use]
    pub fn is_overlapping(&self, id: RectId) -> bool {
        self.overlapping.binary_search(&id).is_ok()
    }
}

/// Pure system that refreshes the overlay view once per tick.
#[derive(Debug, Default)]
pub struct Overlay {
    last_view: Option<OverlayView>,
}

impl Overlay {
    /// Creates an overlay that has not inspected anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries the geometry near the player's center and filters it down to
    /// exact overlaps with the player's bounds.
    #[must_use]
    pub fn inspect(world: &World) -> OverlayView {
        let player = query::player(world);
        let bounds = player.bounds();
        let nearby = query::nearby_player_objects(world);

        let candidates = nearby.ids().collect();
        let overlapping = nearby
            .iter()
            .filter(|rect| rect.bounds().intersects(&bounds))
            .map(StaticRect::id)
            .collect();

        OverlayView {
            probe: player.center(),
            candidates,
            overlapping,
        }
    }

    /// Most recent view, if any tick has been observed.
    #[must_use]
    pub fn last_view(&self) -> Option<&OverlayView> {
        self.last_view.as_ref()
    }

    /// Refreshes the view when the events include a tick.
    pub fn handle(&mut self, events: &[Event], world: &World) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let view = Self::inspect(world);
        trace!(
            "overlay probe ({}, {}): {} candidates, {} overlapping",
            view.probe.x,
            view.probe.y,
            view.candidates.len(),
            view.overlapping.len()
        );
        self.last_view = Some(view);
    }
}
