//! Proximity-focus scoring and arbitration.
//!
//! Scoring: for each furniture piece, take the minimum distance in tile
//! units from the agent to any of its anchor centers; an anchor qualifies
//! only when that distance is strictly inside the piece's radius. A
//! qualifying piece scores `(1 / (distance + DISTANCE_SOFTENING)) *
//! ALIGNMENT_FACTOR`, so nearer pieces score higher on a smooth curve. The
//! alignment factor is a fixed placeholder for future facing-based
//! weighting.
//!
//! Arbitration runs once per tick, advanced by the elapsed milliseconds:
//! 1. While the agent moves, focus is forced off and every timer resets;
//!    losing a held focus signals [`FocusSignal::Cleared`].
//! 2. With no focus held, the best candidate must stay qualified for more
//!    than [`CANDIDATE_STABLE_MS`] of continuous candidacy before it is
//!    promoted. A tick with no candidate resets the clock.
//! 3. A held focus seeing itself as best refreshes its stored score and
//!    resets the challenge clock.
//! 4. A challenger accumulates toward a switch only while its score beats
//!    the held score by [`SWITCH_MARGIN`]; when the margin lapses the clock
//!    pauses without resetting.
//! 5. A held focus with no qualifying candidate clears immediately.
//! 6. Entering focus arms an [`ACTIONABLE_DELAY_MS`] countdown that starts
//!    consuming time on the following tick. If it elapses with the focus
//!    unchanged, [`FocusSignal::Actionable`] fires exactly once. Leaving
//!    focus cancels the countdown; a switch signals `Cleared` first only
//!    when the departing focus had already become actionable.

use crate::furniture::FurnitureDef;
use crate::grid::{Vec2, TILE_SIZE};

/// Softens the distance curve so scores stay finite at zero distance.
pub const DISTANCE_SOFTENING: f32 = 0.35;

/// Fixed multiplier applied to every score. Placeholder for facing-based
/// weighting; changing it uniformly never changes arbitration outcomes.
pub const ALIGNMENT_FACTOR: f32 = 0.6;

/// A challenger must beat the held score by this factor to start a switch.
pub const SWITCH_MARGIN: f32 = 1.15;

/// Continuous candidacy required before focus is acquired or switched.
pub const CANDIDATE_STABLE_MS: f32 = 150.0;

/// Delay between acquiring focus and announcing it as actionable.
pub const ACTIONABLE_DELAY_MS: f32 = 200.0;

/// Proximity score for one furniture piece, or `None` when no anchor
/// qualifies. Distance is measured in tile units; qualification is strictly
/// inside the radius.
pub fn object_score(agent: Vec2, def: &FurnitureDef) -> Option<f32> {
    let mut min_d = f32::INFINITY;
    for anchor in &def.anchors {
        let d = agent.distance(&anchor.center()) / TILE_SIZE;
        if d < def.radius && d < min_d {
            min_d = d;
        }
    }
    if min_d.is_finite() {
        Some((1.0 / (min_d + DISTANCE_SOFTENING)) * ALIGNMENT_FACTOR)
    } else {
        None
    }
}

/// Highest-scoring candidate; earlier entries win ties. Scores are always
/// positive, so an empty iterator yields `None`.
pub fn best_candidate<K: Copy>(candidates: impl IntoIterator<Item = (K, f32)>) -> Option<(K, f32)> {
    let mut best: Option<K> = None;
    let mut best_score = 0.0;
    for (key, score) in candidates {
        if score > best_score {
            best = Some(key);
            best_score = score;
        }
    }
    best.map(|key| (key, best_score))
}

/// Transition produced by one arbitration tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSignal<K> {
    /// The held focus survived the actionable delay and is ready to present.
    Actionable(K),
    /// Focus was lost, or an actionable focus was switched away from.
    Cleared,
}

/// Debounced focus state machine, generic over the key identifying a
/// furniture piece.
#[derive(Debug, Clone)]
pub struct FocusTracker<K: Copy + PartialEq> {
    current: Option<K>,
    current_score: f32,
    stable_ms: f32,
    pending_actionable_ms: Option<f32>,
    actionable_fired: bool,
}

impl<K: Copy + PartialEq> Default for FocusTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq> FocusTracker<K> {
    pub fn new() -> Self {
        FocusTracker {
            current: None,
            current_score: 0.0,
            stable_ms: 0.0,
            pending_actionable_ms: None,
            actionable_fired: false,
        }
    }

    /// The currently held focus, if any.
    pub fn focused(&self) -> Option<K> {
        self.current
    }

    /// True once the actionable signal has fired for the held focus.
    pub fn is_actionable(&self) -> bool {
        self.actionable_fired
    }

    /// Drop all state without signaling. Used when the surrounding world is
    /// rebuilt and the keys no longer mean anything.
    pub fn reset(&mut self) {
        *self = FocusTracker::new();
    }

    /// Advance one tick. `best` is this tick's best qualifying candidate,
    /// `moving` is whether the agent moved this tick, `dt_ms` the elapsed
    /// simulated milliseconds.
    pub fn advance(
        &mut self,
        best: Option<(K, f32)>,
        moving: bool,
        dt_ms: f32,
    ) -> Vec<FocusSignal<K>> {
        let mut signals = Vec::new();

        if moving {
            // Motion suppresses focus entirely, candidacy progress included.
            self.stable_ms = 0.0;
            self.pending_actionable_ms = None;
            if self.current.is_some() {
                self.drop_focus(&mut signals);
            }
            return signals;
        }

        let mut armed_this_tick = false;

        match (self.current, best) {
            (Some(cur), Some((cand, score))) if cand == cur => {
                self.current_score = score;
                self.stable_ms = 0.0;
            }
            (Some(_), Some((cand, score))) => {
                if score > self.current_score * SWITCH_MARGIN {
                    self.stable_ms += dt_ms;
                    if self.stable_ms > CANDIDATE_STABLE_MS {
                        if self.actionable_fired {
                            signals.push(FocusSignal::Cleared);
                        }
                        self.set_focus(cand, score);
                        armed_this_tick = true;
                    }
                }
                // Margin not met: the challenge clock pauses but keeps its
                // accumulated time.
            }
            (Some(_), None) => {
                self.drop_focus(&mut signals);
            }
            (None, Some((cand, score))) => {
                self.stable_ms += dt_ms;
                if self.stable_ms > CANDIDATE_STABLE_MS {
                    self.set_focus(cand, score);
                    armed_this_tick = true;
                }
            }
            (None, None) => {
                // A gap in candidacy resets the acquisition clock.
                self.stable_ms = 0.0;
            }
        }

        // The countdown armed by set_focus starts consuming time next tick,
        // so the delay is measured from the acquisition tick boundary.
        if !armed_this_tick {
            if let Some(remaining) = self.pending_actionable_ms {
                let left = remaining - dt_ms;
                if left <= 0.0 {
                    self.pending_actionable_ms = None;
                    self.actionable_fired = true;
                    if let Some(cur) = self.current {
                        signals.push(FocusSignal::Actionable(cur));
                    }
                } else {
                    self.pending_actionable_ms = Some(left);
                }
            }
        }

        signals
    }

    fn set_focus(&mut self, key: K, score: f32) {
        self.current = Some(key);
        self.current_score = score;
        self.stable_ms = 0.0;
        self.pending_actionable_ms = Some(ACTIONABLE_DELAY_MS);
        self.actionable_fired = false;
    }

    fn drop_focus(&mut self, signals: &mut Vec<FocusSignal<K>>) {
        self.current = None;
        self.current_score = 0.0;
        self.stable_ms = 0.0;
        self.pending_actionable_ms = None;
        self.actionable_fired = false;
        signals.push(FocusSignal::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furniture::{Anchor, Facing};
    use crate::grid::Tile;

    fn def_with_anchor(x: i32, y: i32, radius: f32) -> FurnitureDef {
        FurnitureDef {
            id: "piece".into(),
            label: "Piece".into(),
            category: "misc".into(),
            tiles: vec![],
            anchors: vec![Anchor { x, y, facing: Facing::Up }],
            radius,
        }
    }

    /// Advance repeatedly with a constant input, collecting all signals.
    fn run(
        tracker: &mut FocusTracker<u32>,
        best: Option<(u32, f32)>,
        ticks: u32,
        dt_ms: f32,
    ) -> Vec<FocusSignal<u32>> {
        let mut all = Vec::new();
        for _ in 0..ticks {
            all.extend(tracker.advance(best, false, dt_ms));
        }
        all
    }

    // --- Scoring ---

    #[test]
    fn test_score_at_anchor_center() {
        let def = def_with_anchor(5, 5, 1.6);
        let score = object_score(Tile::new(5, 5).center(), &def).unwrap();
        let expected = (1.0 / DISTANCE_SOFTENING) * ALIGNMENT_FACTOR;
        assert!((score - expected).abs() < 1e-5, "score={score}");
    }

    #[test]
    fn test_radius_is_strict() {
        // Radius 1.5 and the offsets below are exact in f32, so the
        // boundary comparison is not at the mercy of rounding.
        let def = def_with_anchor(5, 5, 1.5);
        let anchor = Tile::new(5, 5).center();
        // Exactly on the radius: does not qualify.
        let on_edge = Vec2::new(anchor.x + 1.5 * TILE_SIZE, anchor.y);
        assert_eq!(object_score(on_edge, &def), None);
        // Just inside: qualifies.
        let inside = Vec2::new(anchor.x + 1.5 * TILE_SIZE - 1.0, anchor.y);
        assert!(object_score(inside, &def).is_some());
    }

    #[test]
    fn test_score_uses_nearest_anchor() {
        let mut def = def_with_anchor(2, 2, 3.0);
        def.anchors.push(Anchor { x: 6, y: 2, facing: Facing::Up });
        // Agent sits on the second anchor; distance should be zero there.
        let score = object_score(Tile::new(6, 2).center(), &def).unwrap();
        let expected = (1.0 / DISTANCE_SOFTENING) * ALIGNMENT_FACTOR;
        assert!((score - expected).abs() < 1e-5, "score={score}");
    }

    #[test]
    fn test_best_candidate_first_wins_ties() {
        assert_eq!(best_candidate::<u32>(vec![]), None);
        assert_eq!(best_candidate(vec![(1u32, 0.5), (2, 0.5)]), Some((1, 0.5)));
        assert_eq!(best_candidate(vec![(1u32, 0.4), (2, 0.5)]), Some((2, 0.5)));
    }

    // --- Acquisition ---

    #[test]
    fn test_acquires_only_after_stable_window() {
        let mut t = FocusTracker::new();
        let best = Some((7u32, 1.0));

        // 150 ms accumulated is not enough; the window is strict.
        run(&mut t, best, 3, 50.0);
        assert_eq!(t.focused(), None);

        run(&mut t, best, 1, 50.0);
        assert_eq!(t.focused(), Some(7));
    }

    #[test]
    fn test_149_no_151_yes() {
        let mut t = FocusTracker::new();
        t.advance(Some((7u32, 1.0)), false, 149.0);
        assert_eq!(t.focused(), None);

        let mut t = FocusTracker::new();
        t.advance(Some((7u32, 1.0)), false, 151.0);
        assert_eq!(t.focused(), Some(7));
    }

    #[test]
    fn test_candidacy_gap_resets_clock() {
        let mut t = FocusTracker::new();
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);
        // One tick with nothing in range wipes the accumulated 100 ms.
        t.advance(None, false, 50.0);
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);
        assert_eq!(t.focused(), None);
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);
        assert_eq!(t.focused(), Some(7));
    }

    #[test]
    fn test_movement_resets_candidacy() {
        let mut t = FocusTracker::new();
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);
        let signals = t.advance(Some((7u32, 1.0)), true, 50.0);
        assert!(signals.is_empty(), "no focus held, nothing to clear");
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);
        assert_eq!(t.focused(), None);
    }

    // --- Actionable delay ---

    #[test]
    fn test_actionable_fires_once_after_delay() {
        let mut t = FocusTracker::new();
        let best = Some((7u32, 1.0));
        t.advance(best, false, 151.0);
        assert_eq!(t.focused(), Some(7));
        assert!(!t.is_actionable());

        // 100 ms in: still pending.
        let signals = run(&mut t, best, 2, 50.0);
        assert!(signals.is_empty());

        // 200 ms in: fires.
        let signals = run(&mut t, best, 2, 50.0);
        assert_eq!(signals, vec![FocusSignal::Actionable(7)]);
        assert!(t.is_actionable());

        // Never again while focus holds.
        let signals = run(&mut t, best, 10, 50.0);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_actionable_canceled_by_movement() {
        let mut t = FocusTracker::new();
        t.advance(Some((7u32, 1.0)), false, 151.0);
        run(&mut t, Some((7u32, 1.0)), 2, 50.0);

        let signals = t.advance(Some((7u32, 1.0)), true, 50.0);
        assert_eq!(signals, vec![FocusSignal::Cleared]);
        assert_eq!(t.focused(), None);

        // The pending countdown died with the focus.
        let signals = run(&mut t, None, 10, 50.0);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_cleared_fires_even_before_actionable() {
        let mut t = FocusTracker::new();
        t.advance(Some((7u32, 1.0)), false, 151.0);
        let signals = t.advance(None, false, 50.0);
        assert_eq!(signals, vec![FocusSignal::Cleared]);
    }

    // --- Hysteresis ---

    #[test]
    fn test_margin_tie_never_switches() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        assert_eq!(t.focused(), Some(1));

        // Exactly 15% better is not strictly better than the margin.
        run(&mut t, Some((2u32, 1.15)), 40, 50.0);
        assert_eq!(t.focused(), Some(1));
    }

    #[test]
    fn test_strong_challenger_switches_after_window() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);

        run(&mut t, Some((2u32, 1.3)), 3, 50.0);
        assert_eq!(t.focused(), Some(1), "150 ms accumulated must not switch yet");
        run(&mut t, Some((2u32, 1.3)), 1, 50.0);
        assert_eq!(t.focused(), Some(2));
    }

    #[test]
    fn test_margin_dip_pauses_challenge_clock() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);

        run(&mut t, Some((2u32, 1.3)), 2, 50.0);
        // Dip below the margin: no progress, but no reset either.
        t.advance(Some((2u32, 1.1)), false, 50.0);
        run(&mut t, Some((2u32, 1.3)), 2, 50.0);
        assert_eq!(t.focused(), Some(2), "100 + 100 ms across the dip should switch");
    }

    #[test]
    fn test_switch_clears_only_after_actionable() {
        // Case one: the old focus had become actionable.
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        run(&mut t, Some((1u32, 1.0)), 4, 50.0);
        assert!(t.is_actionable());

        let signals = run(&mut t, Some((2u32, 1.5)), 4, 50.0);
        assert_eq!(t.focused(), Some(2));
        assert_eq!(signals, vec![FocusSignal::Cleared]);

        // Case two: switch lands before the old focus turned actionable.
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        let signals = run(&mut t, Some((2u32, 1.5)), 4, 50.0);
        assert_eq!(t.focused(), Some(2));
        assert!(signals.is_empty(), "got {signals:?}");
    }

    #[test]
    fn test_new_focus_becomes_actionable_after_switch() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        run(&mut t, Some((2u32, 1.5)), 4, 50.0);
        assert_eq!(t.focused(), Some(2));

        let signals = run(&mut t, Some((2u32, 1.5)), 4, 50.0);
        assert_eq!(signals, vec![FocusSignal::Actionable(2)]);
    }

    #[test]
    fn test_same_object_refreshes_held_score() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        // Holder's own score drops; the stored score must follow it.
        t.advance(Some((1u32, 0.5)), false, 50.0);

        // 0.7 clears 0.5 * 1.15 but would not have cleared 1.0 * 1.15.
        run(&mut t, Some((2u32, 0.7)), 4, 50.0);
        assert_eq!(t.focused(), Some(2));
    }

    // --- Movement ---

    #[test]
    fn test_movement_clears_focus_same_tick() {
        let mut t = FocusTracker::new();
        t.advance(Some((1u32, 1.0)), false, 151.0);
        let signals = t.advance(Some((1u32, 1.0)), true, 16.0);
        assert_eq!(signals, vec![FocusSignal::Cleared]);
        assert_eq!(t.focused(), None);
        assert!(!t.is_actionable());
    }
}
