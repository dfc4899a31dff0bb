use std::f32::consts::{FRAC_PI_2, TAU};

use approx::assert_abs_diff_eq;

use bullet_battle::compute::init_state;
use bullet_battle::config::BattleConfig;
use bullet_battle::director::ClerkDirector;
use bullet_battle::entities::*;
use bullet_battle::player::*;

fn make_state(config: &BattleConfig) -> BattleState {
    init_state(config, &ClerkDirector)
}

fn player_shots(s: &BattleState) -> usize {
    s.projectiles.iter().filter(|p| !p.is_enemy()).count()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_player_spreads_options_evenly() {
    let config = BattleConfig::default();
    let p = new_player(&config);
    assert_eq!((p.x, p.y), config.player_start);
    assert_eq!(p.shoot_cooldown, 0);
    assert_eq!(p.invuln_frames, 0);
    for (i, o) in p.options.iter().enumerate() {
        assert_abs_diff_eq!(o.angle, i as f32 * TAU / 5.0, epsilon = 1e-6);
        assert_eq!(o.radius, config.option_radius);
        assert_eq!(o.color, OPTION_COLORS[i]);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn normal_and_focused_speeds() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);

    move_player(&mut p, &FrameInput { right: true, ..FrameInput::default() }, &config);
    assert_eq!(p.x, 305.0);

    move_player(&mut p, &FrameInput { right: true, focus: true, ..FrameInput::default() }, &config);
    assert_eq!(p.x, 307.0);
}

#[test]
fn diagonal_movement_is_normalized() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);
    move_player(&mut p, &FrameInput { right: true, down: true, ..FrameInput::default() }, &config);
    assert_abs_diff_eq!(p.x - 300.0, 5.0 * std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-4);
    assert_abs_diff_eq!(p.y - 700.0, 5.0 * std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-4);
}

#[test]
fn opposite_keys_cancel() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);
    move_player(&mut p, &FrameInput { left: true, right: true, ..FrameInput::default() }, &config);
    assert_eq!(p.x, 300.0);
    assert_eq!(p.bank, 0);
}

#[test]
fn player_is_clamped_below_the_wall_row() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);

    p.x = 2.0;
    move_player(&mut p, &FrameInput { left: true, ..FrameInput::default() }, &config);
    assert_eq!(p.x, 0.0);
    assert_eq!(p.bank, -1);

    p.y = 42.0;
    move_player(&mut p, &FrameInput { up: true, ..FrameInput::default() }, &config);
    assert_eq!(p.y, config.tile_size);

    p.x = 598.0;
    p.y = 798.0;
    move_player(&mut p, &FrameInput { right: true, down: true, ..FrameInput::default() }, &config);
    assert_eq!(p.x, config.field_width);
    assert_eq!(p.y, config.field_height);
    assert_eq!(p.bank, 1);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn volley_is_one_main_shot_plus_one_per_option() {
    let config = BattleConfig::default();
    let p = new_player(&config);
    let shots = volley(&p, &config);

    assert_eq!(shots.len(), 6);
    assert_eq!(shots[0].kind, ProjectileKind::PlayerDot);
    assert_eq!((shots[0].x, shots[0].y), (p.x, p.y));
    for (i, shot) in shots[1..].iter().enumerate() {
        assert_eq!(shot.kind, ProjectileKind::PlayerRice);
        assert_eq!(shot.tint, Some(OPTION_COLORS[i]));
        let (ox, oy) = p.option_position(i);
        assert_abs_diff_eq!(shot.x, ox, epsilon = 1e-4);
        assert_abs_diff_eq!(shot.y, oy, epsilon = 1e-4);
    }
    assert!(shots.iter().all(|s| s.owner == BulletOwner::Player));
    assert!(shots.iter().all(|s| (s.angle + FRAC_PI_2).abs() < 1e-6));
}

#[test]
fn fire_respects_cooldown() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    let fire = FrameInput { fire: true, ..FrameInput::default() };

    update_player(&mut s, &fire, &config);
    assert_eq!(player_shots(&s), 6);
    assert_eq!(s.player.shoot_cooldown, config.shoot_cooldown);

    for _ in 0..4 {
        update_player(&mut s, &fire, &config);
    }
    assert_eq!(player_shots(&s), 6);

    update_player(&mut s, &fire, &config);
    assert_eq!(player_shots(&s), 12);
}

#[test]
fn cooldown_drains_without_fire_held() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    s.player.shoot_cooldown = 2;
    for _ in 0..5 {
        update_player(&mut s, &FrameInput::default(), &config);
    }
    assert_eq!(s.player.shoot_cooldown, 0);
    assert_eq!(player_shots(&s), 0);
}

#[test]
fn invulnerability_counts_down() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    s.player.invuln_frames = 2;
    update_player(&mut s, &FrameInput::default(), &config);
    assert_eq!(s.player.invuln_frames, 1);
    update_player(&mut s, &FrameInput::default(), &config);
    update_player(&mut s, &FrameInput::default(), &config);
    assert_eq!(s.player.invuln_frames, 0);
}

// ── Options ───────────────────────────────────────────────────────────────────

#[test]
fn unfocused_options_revolve_at_fixed_rate() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);

    for tick in 1..=10u64 {
        update_options(&mut p, tick, &config);
        for (i, o) in p.options.iter().enumerate() {
            let expected = (tick as f32 * config.option_orbit_rate + i as f32 * TAU / 5.0).rem_euclid(TAU);
            assert_abs_diff_eq!(o.angle, expected, epsilon = 1e-4);
        }
    }
}

#[test]
fn focused_options_gather_into_a_tight_arc() {
    let config = BattleConfig::default();
    let mut p = new_player(&config);
    p.focused = true;

    for tick in 1..=100u64 {
        update_options(&mut p, tick, &config);
    }
    for (i, o) in p.options.iter().enumerate() {
        let expected = FRAC_PI_2 + (i as f32 - 2.0) * config.option_arc_spread;
        assert_abs_diff_eq!(o.angle, expected, epsilon = 1e-3);
        assert_abs_diff_eq!(o.radius, config.option_focus_radius, epsilon = 1e-3);
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn edge_trigger_fires_once_per_press() {
    let mut edge = EdgeTrigger::default();
    assert!(edge.rising(true));
    assert!(!edge.rising(true));
    assert!(!edge.rising(true));
    assert!(!edge.rising(false));
    assert!(edge.rising(true));
}

#[test]
fn frame_input_reflects_held_controls() {
    let mut input = InputState::new();
    input.press(Control::Left);
    input.set(Control::Fire, true);
    input.press(Control::Up);
    input.release(Control::Up);

    let frame = FrameInput::from_held(&input, true);
    assert!(frame.left && frame.fire && frame.bomb);
    assert!(!frame.up && !frame.right && !frame.focus);

    input.clear();
    assert_eq!(FrameInput::from_held(&input, false), FrameInput::default());
}

#[test]
fn corrupt_volley_is_dropped_at_spawn() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    s.player.x = f32::NAN;

    update_player(&mut s, &FrameInput { fire: true, ..FrameInput::default() }, &config);

    assert_eq!(player_shots(&s), 0);
    assert_eq!(s.player.shoot_cooldown, config.shoot_cooldown);
}
