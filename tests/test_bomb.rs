use rand::rngs::StdRng;
use rand::SeedableRng;

use bullet_battle::bomb;
use bullet_battle::compute::{init_state, tick};
use bullet_battle::config::BattleConfig;
use bullet_battle::director::ClerkDirector;
use bullet_battle::entities::*;
use bullet_battle::player::FrameInput;

fn make_state(config: &BattleConfig) -> BattleState {
    init_state(config, &ClerkDirector)
}

#[test]
fn trigger_starts_time_stagnation() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);

    assert!(bomb::trigger(&mut s, &config));

    assert_eq!(s.bombs, 2);
    assert_eq!(s.freeze_ticks, 300);
    assert_eq!(s.time_scale, 0.05);
    assert_eq!(s.player.invuln_frames, 300);
    assert_eq!(s.shockwaves.len(), 1);
    assert!(s.is_frozen());
}

#[test]
fn trigger_without_charges_changes_nothing() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    s.bombs = 0;
    let before = s.clone();

    assert!(!bomb::trigger(&mut s, &config));
    assert_eq!(s, before);
}

#[test]
fn trigger_during_freeze_is_ignored() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    bomb::trigger(&mut s, &config);
    bomb::update(&mut s);

    assert!(!bomb::trigger(&mut s, &config));
    assert_eq!(s.bombs, 2);
    assert_eq!(s.freeze_ticks, 299);
}

#[test]
fn freeze_thaws_after_its_duration() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    bomb::trigger(&mut s, &config);
    s.projectiles.push(Projectile::enemy(ProjectileKind::Orb, 10.0, 10.0, 1.0, 0.0, 4.0));
    s.projectiles
        .push(Projectile::player(ProjectileKind::PlayerDot, 10.0, 10.0, 1.0, 0.0, 4.0));

    for _ in 0..299 {
        assert!(!bomb::update(&mut s));
    }
    assert_eq!(s.time_scale, 0.05);
    assert_eq!(s.enemy_projectile_count(), 1);

    assert!(bomb::update(&mut s));
    assert_eq!(s.freeze_ticks, 0);
    assert_eq!(s.time_scale, 1.0);
    assert_eq!(s.enemy_projectile_count(), 0);
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.shockwaves.len(), 2);

    // Idle afterwards
    assert!(!bomb::update(&mut s));
}

#[test]
fn bomb_rescues_a_player_sitting_on_a_bullet() {
    let config = BattleConfig::default();
    let mut s = make_state(&config);
    let (px, py) = (s.player.x, s.player.y);
    s.projectiles.push(Projectile::enemy(ProjectileKind::Glitch, px, py, 0.0, 0.0, 6.0));
    let mut rng = StdRng::seed_from_u64(5);

    let bomb_input = FrameInput { bomb: true, ..FrameInput::default() };
    tick(&mut s, &ClerkDirector, &config, &bomb_input, &mut rng);
    assert_eq!(s.lives, 3);
    assert!(s.is_frozen());

    for _ in 1..300 {
        tick(&mut s, &ClerkDirector, &config, &FrameInput::default(), &mut rng);
    }

    assert!(!s.is_frozen());
    assert_eq!(s.time_scale, 1.0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.bombs, 2);
    assert!(s.projectiles.iter().all(|p| p.kind != ProjectileKind::Glitch));
}

#[test]
fn every_valid_config_thaws() {
    let config = BattleConfig::from_json_str(r#"{ "freeze_ticks": 1 }"#).expect("valid config");
    let mut s = make_state(&config);

    assert!(bomb::trigger(&mut s, &config));
    assert!(bomb::update(&mut s));
    assert_eq!(s.time_scale, 1.0);
    assert!(!s.is_frozen());
}
