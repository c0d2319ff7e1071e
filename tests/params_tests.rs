use tearsheet::math::IDENTITY;
use tearsheet::renderer::{panel_uniforms, Panel};
use tearsheet::{RenderState, SheetConfig, ThrowSide};

fn state(tear: f32, throw_progress: f32) -> RenderState {
    RenderState {
        tear_amount: tear,
        throw_progress,
        throw_left: ThrowSide {
            x: -1.5,
            y: -4.0,
            z: 1.0,
            rot_z: 2.0,
        },
        throw_right: ThrowSide {
            x: 1.5,
            y: -4.0,
            z: 1.0,
            rot_z: -2.0,
        },
        group_y: 0.0,
        group_rot_z: 0.0,
        photo_name: "banana".to_string(),
        rip_name: "rip".to_string(),
    }
}

#[test]
fn identical_input_gives_bitwise_identical_output() {
    let sheet = SheetConfig::default();
    let s = state(0.8, 0.25);
    let a = panel_uniforms(&s, Panel::Left, 0.37, IDENTITY, &sheet);
    let b = panel_uniforms(&s, Panel::Left, 0.37, IDENTITY, &sheet);
    assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
}

#[test]
fn uv_offsets_split_the_photo_between_panels() {
    let sheet = SheetConfig::default();
    let s = state(0.0, 0.0);
    let left = panel_uniforms(&s, Panel::Left, 0.0, IDENTITY, &sheet);
    let right = panel_uniforms(&s, Panel::Right, 0.0, IDENTITY, &sheet);

    assert_eq!(left.uv_offset, 0.0);
    let expected = ((sheet.full_width - sheet.tear_width) / sheet.full_width) * 0.5;
    assert_eq!(right.uv_offset, expected);
    assert_eq!(left.x_direction, -1.0);
    assert_eq!(right.x_direction, 1.0);
}

#[test]
fn wobble_is_zero_at_rest_and_fully_faded_at_throw_end() {
    let sheet = SheetConfig::default();

    let rest = panel_uniforms(&state(0.0, 0.0), Panel::Left, 0.42, IDENTITY, &sheet);
    assert_eq!(rest.tear_x_offset, 0.0);

    let thrown = panel_uniforms(&state(1.8, 1.0), Panel::Right, 0.42, IDENTITY, &sheet);
    assert_eq!(thrown.tear_x_offset, 0.0);

    let torn = panel_uniforms(&state(1.0, 0.0), Panel::Left, 0.42, IDENTITY, &sheet);
    assert!(torn.tear_x_offset.abs() > 0.0);
    assert!(torn.tear_x_offset.abs() <= 0.035);
}

#[test]
fn panels_wobble_independently() {
    let sheet = SheetConfig::default();
    let s = state(1.0, 0.0);
    let left = panel_uniforms(&s, Panel::Left, 0.42, IDENTITY, &sheet);
    let right = panel_uniforms(&s, Panel::Right, 0.42, IDENTITY, &sheet);
    assert_ne!(left.tear_x_offset, right.tear_x_offset);
}

#[test]
fn shading_grows_with_tear_and_stays_clamped() {
    let sheet = SheetConfig::default();

    let rest = panel_uniforms(&state(0.0, 0.0), Panel::Left, 0.0, IDENTITY, &sheet);
    assert_eq!(rest.shade_amount, sheet.left_shade_base);

    let torn = panel_uniforms(&state(1.5, 0.0), Panel::Left, 0.0, IDENTITY, &sheet);
    assert!(torn.shade_amount > rest.shade_amount);

    // The front panel picks up the extra boost.
    let front = panel_uniforms(&state(1.5, 0.0), Panel::Right, 0.0, IDENTITY, &sheet);
    let back_lift = torn.shade_amount - sheet.left_shade_base;
    let front_lift = front.shade_amount - sheet.right_shade_base;
    assert!(front_lift > back_lift);

    // Never past 1, even with absurd bases.
    let hot = SheetConfig {
        left_shade_base: 0.95,
        right_shade_base: 0.99,
        ..SheetConfig::default()
    };
    let clamped = panel_uniforms(&state(2.0, 0.0), Panel::Right, 0.0, IDENTITY, &hot);
    assert!(clamped.shade_amount <= 1.0);
}

#[test]
fn right_panel_sits_fractionally_in_front() {
    let sheet = SheetConfig::default();
    let s = state(0.5, 0.0);
    let left = panel_uniforms(&s, Panel::Left, 0.1, IDENTITY, &sheet);
    let right = panel_uniforms(&s, Panel::Right, 0.1, IDENTITY, &sheet);
    assert_eq!(left.z_offset, 0.0);
    assert!(right.z_offset > 0.0);
}

#[test]
fn throw_vectors_flow_through_per_panel() {
    let sheet = SheetConfig::default();
    let s = state(1.2, 0.5);
    let left = panel_uniforms(&s, Panel::Left, 0.1, IDENTITY, &sheet);
    let right = panel_uniforms(&s, Panel::Right, 0.1, IDENTITY, &sheet);

    assert_eq!(left.throw_x, s.throw_left.x);
    assert_eq!(right.throw_x, s.throw_right.x);
    assert_eq!(left.throw_rot_z, s.throw_left.rot_z);
    assert_eq!(left.throw_progress, 0.5);
    assert_eq!(right.throw_progress, 0.5);
}
