use std::time::{Duration, Instant};

use tearsheet::{Phase, TearConfig, TearModel, TearRng};

fn model_with_seed(seed: u64) -> TearModel {
    TearModel::new(
        TearConfig::default(),
        tearsheet::Assets::default(),
        TearRng::with_seed(seed),
    )
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn intro_runs_to_idle_and_settles() {
    let t0 = Instant::now();
    let mut model = model_with_seed(1);

    model.on_appear_at(t0);
    assert!(matches!(model.phase(), Phase::Intro { .. }));
    assert!(model.is_animating());

    // Still inside the delay: the sheet holds its drop-in offset.
    model.tick_at(t0 + ms(50));
    assert_eq!(model.render_state().group_y, 10.0);

    // intro_delay (100ms) + intro_duration (1100ms) + epsilon.
    model.tick_at(t0 + ms(1201));
    assert_eq!(model.phase(), Phase::Idle);
    assert!(!model.is_animating());
    assert_eq!(model.render_state().group_y, 0.0);
    assert_eq!(model.render_state().group_rot_z, 0.0);
}

#[test]
fn on_appear_is_idempotent() {
    let t0 = Instant::now();
    let mut model = model_with_seed(2);

    model.on_appear_at(t0);
    let first = model.phase();
    model.on_appear_at(t0 + ms(500));
    assert_eq!(model.phase(), first);
}

#[test]
fn short_drag_resets_back_to_idle() {
    let t0 = Instant::now();
    let mut model = model_with_seed(3);

    // 2 * 60 / 400 = 0.3, below the 1.10 complete threshold.
    model.drag_changed_at(60.0, t0);
    assert_eq!(model.phase(), Phase::Dragging);
    assert!((model.render_state().tear_amount - 0.3).abs() < 1e-6);

    model.drag_ended_at(t0);
    assert!(matches!(model.phase(), Phase::Resetting { .. }));

    model.tick_at(t0 + ms(201));
    assert_eq!(model.phase(), Phase::Idle);
    assert_eq!(model.render_state().tear_amount, 0.0);
}

#[test]
fn full_drag_throws_and_cycles_the_photo() {
    let t0 = Instant::now();
    let mut model = model_with_seed(4);
    assert_eq!(model.render_state().photo_name, "banana");

    // 2 * 400 / 400 = 2.0; past the 1.5 auto-throw threshold, so the drag
    // itself commits the throw.
    model.drag_changed_at(400.0, t0);
    assert!(matches!(model.phase(), Phase::Throwing { .. }));
    assert_eq!(model.render_state().tear_amount, 2.0);

    // Release during the throw is ignored.
    model.drag_ended_at(t0 + ms(10));
    assert!(matches!(model.phase(), Phase::Throwing { .. }));

    // throw_duration (700ms) + epsilon: photo advances and the next intro
    // starts on the same tick, with no idle frame in between.
    model.tick_at(t0 + ms(701));
    assert_eq!(model.photo_index(), 1);
    assert!(matches!(model.phase(), Phase::Intro { .. }));
    assert_eq!(model.render_state().photo_name, "mango");
    assert_eq!(model.render_state().throw_progress, 0.0);
}

#[test]
fn photo_index_wraps_around() {
    let t0 = Instant::now();
    let mut model = model_with_seed(5);

    for round in 1..=3u64 {
        let t = t0 + ms(round * 10_000);
        model.drag_changed_at(400.0, t);
        model.tick_at(t + ms(701));
        // Two photos, so the index alternates 1, 0, 1.
        assert_eq!(model.photo_index(), (round % 2) as usize);
        // Settle the chained intro before the next round.
        model.tick_at(t + ms(701 + 1201));
        assert_eq!(model.phase(), Phase::Idle);
    }
}

#[test]
fn throw_sides_mirror_and_launch_downward() {
    let t0 = Instant::now();
    let mut model = model_with_seed(6);

    model.drag_changed_at(400.0, t0);
    let Phase::Throwing { left, right, .. } = model.phase() else {
        panic!("expected throw");
    };
    assert!(left.x < 0.0 && right.x > 0.0);
    assert_eq!(left.x, -right.x);
    assert!(left.rot_z > 0.0 && right.rot_z < 0.0);
    assert!((-6.0..=-3.0).contains(&left.y));
    assert_eq!(left.y, right.y);
    assert_eq!(left.z, 1.0);

    model.tick_at(t0 + ms(350));
    let p = model.render_state().throw_progress;
    assert!(p > 0.0 && p < 1.0);
}

#[test]
fn drag_during_reset_cancels_it_without_a_snap() {
    let t0 = Instant::now();
    let mut model = model_with_seed(7);

    model.drag_changed_at(120.0, t0);
    model.drag_ended_at(t0);
    assert!(matches!(model.phase(), Phase::Resetting { .. }));

    model.tick_at(t0 + ms(100));
    let mid_reset = model.render_state().tear_amount;
    assert!(mid_reset > 0.0 && mid_reset < 0.6);

    // The finger comes back down: the tear follows it again immediately.
    model.drag_changed_at(80.0, t0 + ms(110));
    assert_eq!(model.phase(), Phase::Dragging);
    assert!((model.render_state().tear_amount - 0.4).abs() < 1e-6);
}

#[test]
fn drag_input_is_refused_during_intro_and_throw() {
    let t0 = Instant::now();
    let mut model = model_with_seed(8);

    model.on_appear_at(t0);
    model.drag_changed_at(200.0, t0 + ms(50));
    assert!(matches!(model.phase(), Phase::Intro { .. }));
    assert_eq!(model.render_state().tear_amount, 0.0);
    model.drag_ended_at(t0 + ms(60));
    assert!(matches!(model.phase(), Phase::Intro { .. }));

    model.tick_at(t0 + ms(1201));
    model.drag_changed_at(400.0, t0 + ms(1300));
    assert!(matches!(model.phase(), Phase::Throwing { .. }));
    let mid_throw = model.phase();
    model.drag_changed_at(10.0, t0 + ms(1350));
    assert_eq!(model.phase(), mid_throw);
}

#[test]
fn drag_auto_throws_exactly_at_the_threshold() {
    let t0 = Instant::now();
    let mut model = model_with_seed(9);

    // 2 * 299 / 400 = 1.495: still dragging.
    model.drag_changed_at(299.0, t0);
    assert_eq!(model.phase(), Phase::Dragging);

    // 2 * 300 / 400 = 1.5: throw starts mid-gesture.
    model.drag_changed_at(300.0, t0);
    assert!(matches!(model.phase(), Phase::Throwing { .. }));
}

#[test]
fn drag_deltas_are_clamped_not_rejected() {
    let t0 = Instant::now();
    let mut model = model_with_seed(10);

    model.drag_changed_at(-500.0, t0);
    assert_eq!(model.render_state().tear_amount, 0.0);
    assert_eq!(model.phase(), Phase::Dragging);

    model.drag_changed_at(1_000_000.0, t0);
    assert_eq!(model.render_state().tear_amount, 2.0);
}

#[test]
fn release_between_complete_and_auto_thresholds_throws() {
    let t0 = Instant::now();
    let mut model = model_with_seed(11);

    // 2 * 230 / 400 = 1.15: past complete (1.10), under auto-throw (1.5).
    model.drag_changed_at(230.0, t0);
    assert_eq!(model.phase(), Phase::Dragging);
    model.drag_ended_at(t0);
    assert!(matches!(model.phase(), Phase::Throwing { .. }));
}

#[test]
fn tick_is_harmless_while_idle() {
    let t0 = Instant::now();
    let mut model = model_with_seed(12);

    model.tick_at(t0);
    assert_eq!(model.phase(), Phase::Idle);
    let snapshot = model.render_state().clone();
    model.tick_at(t0 + ms(500));
    assert_eq!(*model.render_state(), snapshot);
}

#[test]
fn texture_names_cover_photos_and_rip() {
    let model = model_with_seed(13);
    let names = model.texture_names();
    assert_eq!(names, vec!["banana", "mango", "rip"]);
}
