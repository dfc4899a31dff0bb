use std::f32::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use bullet_battle::compute::init_state;
use bullet_battle::config::BattleConfig;
use bullet_battle::director::ClerkDirector;
use bullet_battle::entities::*;
use bullet_battle::physics::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn empty_state(config: &BattleConfig) -> BattleState {
    let mut s = init_state(config, &ClerkDirector);
    s.projectiles.clear();
    s
}

// ── step_projectile ───────────────────────────────────────────────────────────

#[test]
fn delayed_projectile_waits_exactly_delay_ticks() {
    let config = BattleConfig::default();
    let mut p = Projectile::enemy(ProjectileKind::Orb, 100.0, 100.0, 2.0, 0.0, 4.0).with_delay(3);

    for _ in 0..3 {
        assert_eq!(step_projectile(&mut p, 1.0, &config), Motion::Waiting);
        assert_eq!((p.x, p.y), (100.0, 100.0));
    }
    assert_eq!(p.delay, 0);

    // Tick d+1 integrates normally
    assert_eq!(step_projectile(&mut p, 1.0, &config), Motion::Moved);
    assert_abs_diff_eq!(p.x, 102.0, epsilon = 1e-4);
    assert_abs_diff_eq!(p.y, 100.0, epsilon = 1e-4);
}

#[test]
fn accel_and_spin_apply_before_moving() {
    let config = BattleConfig::default();
    let mut p = Projectile::enemy(ProjectileKind::Orb, 0.0, 0.0, 2.0, 0.0, 4.0)
        .with_accel(0.5)
        .with_spin(FRAC_PI_2);
    step_projectile(&mut p, 1.0, &config);
    assert_abs_diff_eq!(p.speed, 2.5, epsilon = 1e-5);
    assert_abs_diff_eq!(p.angle, FRAC_PI_2, epsilon = 1e-5);
    assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(p.y, 2.5, epsilon = 1e-4);
}

#[test]
fn enemy_motion_scales_with_time_scale_player_motion_does_not() {
    let config = BattleConfig::default();
    let mut enemy = Projectile::enemy(ProjectileKind::Orb, 0.0, 0.0, 2.0, 0.0, 4.0);
    let mut shot = Projectile::player(ProjectileKind::PlayerDot, 0.0, 0.0, 2.0, 0.0, 4.0);

    step_projectile(&mut enemy, 0.05, &config);
    step_projectile(&mut shot, 0.05, &config);

    assert_abs_diff_eq!(enemy.x, 0.1, epsilon = 1e-5);
    assert_abs_diff_eq!(shot.x, 2.0, epsilon = 1e-5);
}

#[test]
fn global_speed_multiplier_scales_displacement() {
    let config = BattleConfig { global_speed_multiplier: 2.0, ..BattleConfig::default() };
    let mut p = Projectile::enemy(ProjectileKind::Orb, 0.0, 0.0, 2.0, PI, 4.0);
    step_projectile(&mut p, 1.0, &config);
    assert_abs_diff_eq!(p.x, -4.0, epsilon = 1e-4);
}

#[test]
fn deceleration_stops_at_rest() {
    let config = BattleConfig::default();
    let mut p = Projectile::enemy(ProjectileKind::Orb, 10.0, 10.0, 0.1, 0.0, 4.0).with_accel(-0.5);
    step_projectile(&mut p, 1.0, &config);
    assert_eq!(p.speed, 0.0);
    assert_eq!((p.x, p.y), (10.0, 10.0));
}

// ── Detonation ────────────────────────────────────────────────────────────────

#[test]
fn cup_detonates_into_twelve_evenly_spaced_shards() {
    let config = BattleConfig::default();
    let mut s = empty_state(&config);
    s.projectiles
        .push(Projectile::enemy(ProjectileKind::Cup, 200.0, 200.0, 0.0, 0.0, 10.0).with_fuse(3));
    let mut rng = seeded_rng();

    advance_projectiles(&mut s, &config, &mut rng);
    advance_projectiles(&mut s, &config, &mut rng);
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.projectiles[0].fuse, Some(1));

    advance_projectiles(&mut s, &config, &mut rng);
    assert!(s.projectiles.iter().all(|p| p.kind != ProjectileKind::Cup));
    assert_eq!(s.projectiles.len(), 12);

    for (i, shard) in s.projectiles.iter().enumerate() {
        assert_eq!(shard.kind, ProjectileKind::Shard);
        assert_eq!(shard.owner, BulletOwner::Enemy);
        assert_eq!((shard.x, shard.y), (200.0, 200.0));
        assert_abs_diff_eq!(shard.angle, i as f32 * TAU / 12.0, epsilon = 1e-5);
        assert!(shard.speed >= config.shard_speed);
        assert!(shard.speed <= config.shard_speed + config.shard_speed_jitter);
    }
    assert!(s.particles.iter().any(|p| p.kind == ParticleKind::Burst));
}

#[test]
fn cup_with_spent_fuse_detonates_on_first_step() {
    let config = BattleConfig::default();
    let mut p = Projectile::enemy(ProjectileKind::Cup, 0.0, 0.0, 1.0, 0.0, 10.0).with_fuse(0);
    assert_eq!(step_projectile(&mut p, 1.0, &config), Motion::Detonated);
}

#[test]
fn fuse_holds_under_heavy_time_dilation() {
    let config = BattleConfig::default();
    let mut p = Projectile::enemy(ProjectileKind::Cup, 0.0, 0.0, 1.0, 0.0, 10.0).with_fuse(1);

    // Motion merely slows, the fuse stops outright
    assert_eq!(step_projectile(&mut p, 0.05, &config), Motion::Moved);
    assert_eq!(p.fuse, Some(1));
    assert_abs_diff_eq!(p.x, 0.05, epsilon = 1e-5);

    assert_eq!(step_projectile(&mut p, 1.0, &config), Motion::Detonated);
}

#[test]
fn shard_burst_is_reproducible_with_same_seed() {
    let config = BattleConfig::default();
    let a = shard_burst(0.0, 0.0, &config, &mut StdRng::seed_from_u64(7));
    let b = shard_burst(0.0, 0.0, &config, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}

// ── Culling ───────────────────────────────────────────────────────────────────

#[test]
fn projectiles_leaving_the_margin_are_culled() {
    let config = BattleConfig::default();
    let mut s = empty_state(&config);
    // x = -49 → -51 after one step, beyond the 50px margin
    s.projectiles.push(Projectile::enemy(ProjectileKind::Orb, -49.0, 100.0, 2.0, PI, 4.0));
    s.projectiles.push(Projectile::enemy(ProjectileKind::Orb, 10.0, 10.0, 2.0, PI, 4.0));
    s.projectiles
        .push(Projectile::player(ProjectileKind::PlayerDot, 300.0, -45.0, 14.0, -FRAC_PI_2, 4.0));

    advance_projectiles(&mut s, &config, &mut seeded_rng());

    assert_eq!(s.projectiles.len(), 1);
    assert_abs_diff_eq!(s.projectiles[0].x, 8.0, epsilon = 1e-4);
}

#[test]
fn in_bounds_respects_margin() {
    let config = BattleConfig::default();
    let inside = Projectile::enemy(ProjectileKind::Orb, 640.0, 840.0, 0.0, 0.0, 4.0);
    let outside = Projectile::enemy(ProjectileKind::Orb, 660.0, 400.0, 0.0, 0.0, 4.0);
    assert!(in_bounds(&inside, &config));
    assert!(!in_bounds(&outside, &config));
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[test]
fn effects_decay_and_expire() {
    let config = BattleConfig::default();
    let mut s = empty_state(&config);
    s.particles.push(Particle { x: 0.0, y: 0.0, vx: 1.0, vy: 0.0, life: 1, kind: ParticleKind::Hit });
    s.particles.push(Particle { x: 0.0, y: 0.0, vx: 1.0, vy: 0.0, life: 5, kind: ParticleKind::Graze });
    s.shockwaves.push(shockwave(10.0, 10.0));
    s.banner = Some(PhaseBanner { phase: 1, name: "x".to_string(), ticks_left: 1 });
    s.boss.shake = 2;

    decay_effects(&mut s);

    assert_eq!(s.particles.len(), 1);
    assert_eq!(s.particles[0].x, 1.0);
    assert_eq!(s.particles[0].life, 4);
    assert!(s.shockwaves[0].radius > 0.0);
    assert!(s.banner.is_none());
    assert_eq!(s.boss.shake, 1);
}
