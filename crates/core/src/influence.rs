//! Influence sources: the live pointer and a bounded, decaying trail of
//! past pointer positions.
//!
//! Pointer events mutate this state immediately; the frame step only reads
//! it. Several moves between two frames each get their own trail entry,
//! while only the latest position counts as the live pointer.

use std::collections::VecDeque;

use glam::DVec2;

/// Stand-in position for an absent pointer, outside any usable radius.
pub const FAR_AWAY: DVec2 = DVec2::new(-1.0e9, -1.0e9);

/// Longest trail [`InfluenceSources`] keeps, whatever the params ask for.
pub const MAX_HISTORY_CAP: usize = 64;

/// The live pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Pointer {
    /// Outside the surface, left, or never seen (touch-only hosts).
    #[default]
    Absent,
    At(DVec2),
}

/// One past pointer position and its remaining weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluenceEntry {
    pub position: DVec2,
    /// Starts at 1.0 and only ever shrinks.
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluenceParams {
    /// Maximum trail length; 0 disables the trail. Clamped to
    /// [`MAX_HISTORY_CAP`].
    pub history_cap: usize,
    /// Per-frame weight multiplier in [0, 1].
    pub decay: f64,
}

impl Default for InfluenceParams {
    fn default() -> Self {
        Self {
            history_cap: 5,
            decay: 0.65,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InfluenceSources {
    pointer: Pointer,
    /// Newest first.
    history: VecDeque<InfluenceEntry>,
    params: InfluenceParams,
}

impl InfluenceSources {
    pub fn new(params: InfluenceParams) -> Self {
        let decay = if params.decay.is_finite() {
            params.decay.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            pointer: Pointer::Absent,
            history: VecDeque::new(),
            params: InfluenceParams {
                history_cap: params.history_cap.min(MAX_HISTORY_CAP),
                decay,
            },
        }
    }

    /// Sets the live pointer and pushes a fresh trail entry, evicting the
    /// oldest entries beyond the cap.
    pub fn record_pointer_move(&mut self, position: DVec2) {
        if !position.is_finite() {
            return;
        }
        self.pointer = Pointer::At(position);
        if self.params.history_cap == 0 {
            return;
        }
        self.history.push_front(InfluenceEntry {
            position,
            weight: 1.0,
        });
        self.history.truncate(self.params.history_cap);
    }

    /// Entering carries no coordinates, so this leaves every source as it
    /// is; the pointer stays absent until the first move reports a position.
    pub fn record_pointer_enter(&mut self) {}

    /// Parks the live pointer far away and drops the whole trail at once.
    pub fn record_pointer_leave(&mut self) {
        self.pointer = Pointer::Absent;
        self.history.clear();
    }

    /// Multiplies every trail weight by `decay^dt`. Entries are never
    /// removed here; only the cap evicts them.
    pub fn decay_step(&mut self, dt: f64) {
        let factor = self.params.decay.powf(dt.max(0.0));
        for entry in &mut self.history {
            entry.weight *= factor;
        }
    }

    /// Trail entries, then the live pointer at weight 1.0 when present.
    pub fn active(&self) -> impl Iterator<Item = InfluenceEntry> + '_ {
        let live = match self.pointer {
            Pointer::At(position) => Some(InfluenceEntry {
                position,
                weight: 1.0,
            }),
            Pointer::Absent => None,
        };
        self.history.iter().copied().chain(live)
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// The live pointer, or [`FAR_AWAY`] when absent.
    pub fn live_position(&self) -> DVec2 {
        match self.pointer {
            Pointer::At(p) => p,
            Pointer::Absent => FAR_AWAY,
        }
    }

    pub fn history(&self) -> &VecDeque<InfluenceEntry> {
        &self.history
    }

    pub fn params(&self) -> InfluenceParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(cap: usize) -> InfluenceSources {
        InfluenceSources::new(InfluenceParams {
            history_cap: cap,
            decay: 0.5,
        })
    }

    #[test]
    fn starts_absent_and_inactive() {
        let s = sources(5);
        assert_eq!(s.pointer(), Pointer::Absent);
        assert_eq!(s.live_position(), FAR_AWAY);
        assert_eq!(s.active().count(), 0);
    }

    #[test]
    fn move_sets_live_pointer_and_front_entry() {
        let mut s = sources(5);
        s.record_pointer_move(DVec2::new(1.0, 2.0));
        s.record_pointer_move(DVec2::new(3.0, 4.0));
        assert_eq!(s.live_position(), DVec2::new(3.0, 4.0));
        assert_eq!(s.history()[0].position, DVec2::new(3.0, 4.0));
        assert_eq!(s.history()[1].position, DVec2::new(1.0, 2.0));
        assert!(s.history().iter().all(|e| e.weight == 1.0));
    }

    #[test]
    fn history_is_capped_and_evicts_oldest() {
        let mut s = sources(3);
        for i in 0..10 {
            s.record_pointer_move(DVec2::new(i as f64, 0.0));
        }
        assert_eq!(s.history().len(), 3);
        let xs: Vec<f64> = s.history().iter().map(|e| e.position.x).collect();
        assert_eq!(xs, vec![9.0, 8.0, 7.0]);
    }

    #[test]
    fn zero_cap_keeps_only_live_pointer() {
        let mut s = sources(0);
        s.record_pointer_move(DVec2::new(5.0, 5.0));
        assert!(s.history().is_empty());
        let active: Vec<_> = s.active().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].weight, 1.0);
    }

    #[test]
    fn leave_clears_trail_immediately() {
        let mut s = sources(5);
        for i in 0..4 {
            s.record_pointer_move(DVec2::splat(i as f64));
        }
        s.record_pointer_leave();
        assert!(s.history().is_empty());
        assert_eq!(s.pointer(), Pointer::Absent);
        assert_eq!(s.live_position(), FAR_AWAY);
        assert_eq!(s.active().count(), 0);
    }

    #[test]
    fn enter_does_not_invent_a_position() {
        let mut s = sources(5);
        s.record_pointer_enter();
        assert_eq!(s.pointer(), Pointer::Absent);
        assert_eq!(s.active().count(), 0);

        s.record_pointer_move(DVec2::ONE);
        s.record_pointer_leave();
        s.record_pointer_enter();
        assert_eq!(s.live_position(), FAR_AWAY);
        assert!(s.history().is_empty());
    }

    #[test]
    fn oversized_cap_is_clamped() {
        let mut s = sources(usize::MAX);
        assert_eq!(s.params().history_cap, MAX_HISTORY_CAP);
        for i in 0..(MAX_HISTORY_CAP + 10) {
            s.record_pointer_move(DVec2::new(i as f64, 0.0));
        }
        assert_eq!(s.history().len(), MAX_HISTORY_CAP);
    }

    #[test]
    fn decay_shrinks_weights_but_keeps_entries() {
        let mut s = sources(5);
        s.record_pointer_move(DVec2::ONE);
        for _ in 0..60 {
            s.decay_step(1.0);
        }
        assert_eq!(s.history().len(), 1);
        let w = s.history()[0].weight;
        assert!(w > 0.0 && w < 1e-15, "weight {w}");
    }

    #[test]
    fn decay_is_frame_step_adaptive() {
        let mut one = sources(5);
        let mut two = sources(5);
        one.record_pointer_move(DVec2::ONE);
        two.record_pointer_move(DVec2::ONE);
        one.decay_step(2.0);
        two.decay_step(1.0);
        two.decay_step(1.0);
        assert!((one.history()[0].weight - two.history()[0].weight).abs() < 1e-12);
        assert!((one.history()[0].weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn live_pointer_comes_last_at_full_weight() {
        let mut s = sources(5);
        s.record_pointer_move(DVec2::new(1.0, 0.0));
        s.decay_step(1.0);
        s.record_pointer_move(DVec2::new(2.0, 0.0));
        let active: Vec<_> = s.active().collect();
        assert_eq!(active.len(), 3);
        assert_eq!(active[0].weight, 1.0);
        assert_eq!(active[1].weight, 0.5);
        assert_eq!(active[2].position, DVec2::new(2.0, 0.0));
        assert_eq!(active[2].weight, 1.0);
    }

    #[test]
    fn non_finite_move_is_ignored() {
        let mut s = sources(5);
        s.record_pointer_move(DVec2::new(f64::NAN, 1.0));
        assert_eq!(s.pointer(), Pointer::Absent);
        assert!(s.history().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn history_never_exceeds_cap(
                cap in 0usize..16,
                moves in proptest::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 0..64),
            ) {
                let mut s = sources(cap);
                for (x, y) in moves {
                    s.record_pointer_move(DVec2::new(x, y));
                    prop_assert!(s.history().len() <= cap);
                }
            }

            #[test]
            fn weights_never_grow(
                decay in 0.0_f64..=1.0,
                steps in proptest::collection::vec(0.0_f64..4.0, 1..32),
            ) {
                let mut s = InfluenceSources::new(InfluenceParams { history_cap: 4, decay });
                s.record_pointer_move(DVec2::ZERO);
                let mut last = s.history()[0].weight;
                for dt in steps {
                    s.decay_step(dt);
                    let w = s.history()[0].weight;
                    prop_assert!(w <= last, "{w} > {last}");
                    last = w;
                }
            }
        }
    }
}
