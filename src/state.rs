// state.rs: Progress and expansion state for the sound bar

/// Which way the bar is stretched when a drag overshoots the [0, 1] range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionDirection {
    Top,
    Bottom,
    #[default]
    Default,
}

impl ExpansionDirection {
    /// Classify an unclamped projected progress value.
    pub fn from_projected(projected: f64) -> Self {
        if projected > 1.0 {
            ExpansionDirection::Top
        } else if projected < 0.0 {
            ExpansionDirection::Bottom
        } else {
            ExpansionDirection::Default
        }
    }
}

/// Live state of the bar. Only the drag callbacks below write to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    /// Live progress, always within [0, 1].
    pub current: f64,
    /// Progress as of the last finished drag; baseline for the next one.
    pub committed: f64,
    pub direction: ExpansionDirection,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State resumed from an externally known value (e.g. a player volume).
    pub fn resume(committed: f64) -> Self {
        let committed = sanitize_progress(committed);
        Self {
            current: committed,
            committed,
            direction: ExpansionDirection::Default,
        }
    }

    /// Raw candidate progress for a pointer `offset` over a surface of `height`.
    ///
    /// A zero, negative or non-finite height (or a non-finite offset)
    /// contributes nothing, so the result is always finite.
    pub fn projected(&self, offset: f64, height: f64) -> f64 {
        if !offset.is_finite() || !height.is_finite() || height <= 0.0 {
            return self.committed;
        }
        self.committed + offset / height
    }
}

/// Apply one drag update. `offset` is `start_y - current_y` (upwards is
/// positive), `height` the measured height of the gesture surface.
pub fn on_drag_changed(state: ProgressState, offset: f64, height: f64) -> ProgressState {
    let projected = state.projected(offset, height);
    ProgressState {
        current: projected.clamp(0.0, 1.0),
        committed: state.committed,
        direction: ExpansionDirection::from_projected(projected),
    }
}

/// Finish a drag (release or cancel): the clamped value becomes the new baseline.
pub fn on_drag_end(state: ProgressState) -> ProgressState {
    ProgressState {
        current: state.current,
        committed: state.current,
        direction: ExpansionDirection::Default,
    }
}

/// Force a value into [0, 1]; NaN maps to zero.
pub fn sanitize_progress(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn committed_at(v: f64) -> ProgressState {
        ProgressState::resume(v)
    }

    #[test]
    fn test_mount_state() {
        let s = ProgressState::new();
        assert_eq!(s.current, 0.0);
        assert_eq!(s.committed, 0.0);
        assert_eq!(s.direction, ExpansionDirection::Default);
    }

    #[test]
    fn test_half_drag_from_empty() {
        let s = on_drag_changed(ProgressState::new(), 100.0, 200.0);
        assert!((s.current - 0.5).abs() < EPS);
        assert_eq!(s.committed, 0.0);
        assert_eq!(s.direction, ExpansionDirection::Default);
    }

    #[test]
    fn test_overshoot_top_clamps_and_expands() {
        let s = on_drag_changed(committed_at(0.8), 100.0, 200.0);
        assert_eq!(s.current, 1.0);
        assert_eq!(s.direction, ExpansionDirection::Top);
        assert!((s.committed - 0.8).abs() < EPS);

        let ended = on_drag_end(s);
        assert_eq!(ended.committed, 1.0);
        assert_eq!(ended.current, 1.0);
        assert_eq!(ended.direction, ExpansionDirection::Default);
    }

    #[test]
    fn test_overshoot_bottom_clamps_and_expands() {
        let s = on_drag_changed(committed_at(0.2), -100.0, 200.0);
        assert_eq!(s.current, 0.0);
        assert_eq!(s.direction, ExpansionDirection::Bottom);
    }

    #[test]
    fn test_full_bar_pushed_further_up() {
        let s = on_drag_changed(committed_at(1.0), 4.0, 200.0);
        assert_eq!(s.current, 1.0);
        assert_eq!(s.direction, ExpansionDirection::Top);
    }

    #[test]
    fn test_exact_bounds_do_not_expand() {
        let top = on_drag_changed(committed_at(0.5), 100.0, 200.0);
        assert_eq!(top.current, 1.0);
        assert_eq!(top.direction, ExpansionDirection::Default);

        let bottom = on_drag_changed(committed_at(0.5), -100.0, 200.0);
        assert_eq!(bottom.current, 0.0);
        assert_eq!(bottom.direction, ExpansionDirection::Default);
    }

    #[test]
    fn test_drag_is_relative_to_committed_not_current() {
        let s = on_drag_changed(committed_at(0.3), 20.0, 200.0);
        let s = on_drag_changed(s, 40.0, 200.0);
        assert!((s.current - 0.5).abs() < EPS);
    }

    #[test]
    fn test_zero_height_contributes_nothing() {
        let s = on_drag_changed(committed_at(0.4), 50.0, 0.0);
        assert!((s.current - 0.4).abs() < EPS);
        assert_eq!(s.direction, ExpansionDirection::Default);

        let s = on_drag_changed(committed_at(0.4), 50.0, f64::NAN);
        assert!((s.current - 0.4).abs() < EPS);

        let s = on_drag_changed(committed_at(0.4), f64::INFINITY, 10.0);
        assert!((s.current - 0.4).abs() < EPS);
    }

    #[test]
    fn test_drag_end_is_idempotent() {
        let s = on_drag_end(on_drag_changed(committed_at(0.1), 30.0, 100.0));
        assert_eq!(on_drag_end(s), s);
    }

    #[test]
    fn test_sanitize_progress() {
        assert_eq!(sanitize_progress(f64::NAN), 0.0);
        assert_eq!(sanitize_progress(-0.5), 0.0);
        assert_eq!(sanitize_progress(1.7), 1.0);
        assert_eq!(sanitize_progress(f64::INFINITY), 1.0);
        assert_eq!(sanitize_progress(0.25), 0.25);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Change { offset: f64, height: f64 },
        End,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => (-500.0f64..500.0, 0.0f64..300.0)
                .prop_map(|(offset, height)| Step::Change { offset, height }),
            1 => Just(Step::End),
        ]
    }

    proptest! {
        #[test]
        fn prop_current_stays_in_range(steps in prop::collection::vec(step(), 1..40)) {
            let mut s = ProgressState::new();
            for st in steps {
                s = match st {
                    Step::Change { offset, height } => on_drag_changed(s, offset, height),
                    Step::End => on_drag_end(s),
                };
                prop_assert!((0.0..=1.0).contains(&s.current));
                prop_assert!((0.0..=1.0).contains(&s.committed));
            }
        }

        #[test]
        fn prop_direction_matches_projection(
            committed in 0.0f64..=1.0,
            offset in -500.0f64..500.0,
            height in 1.0f64..300.0,
        ) {
            let before = committed_at(committed);
            let projected = before.projected(offset, height);
            let after = on_drag_changed(before, offset, height);
            prop_assert_eq!(after.direction == ExpansionDirection::Top, projected > 1.0);
            prop_assert_eq!(after.direction == ExpansionDirection::Bottom, projected < 0.0);
        }

        #[test]
        fn prop_end_commits_current(
            committed in 0.0f64..=1.0,
            offset in -500.0f64..500.0,
            height in 0.0f64..300.0,
        ) {
            let ended = on_drag_end(on_drag_changed(committed_at(committed), offset, height));
            prop_assert_eq!(ended.committed, ended.current);
            prop_assert_eq!(ended.direction, ExpansionDirection::Default);
        }
    }
}
