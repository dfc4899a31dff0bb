/// Physics integrator: per-projectile motion, fuse countdown, detonation and
/// culling, plus decay of the purely visual effects.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::BattleConfig;
use crate::entities::{
    BattleState, BulletOwner, Particle, ParticleKind, Projectile, ProjectileKind, Shockwave,
};

/// What happened to a projectile during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Still inside its activation delay; did not move.
    Waiting,
    Moved,
    /// Fuse ran out; the caller must remove it and spawn shards.
    Detonated,
}

/// Time scale that applies to a projectile. Player fire ignores the bomb.
pub fn effective_scale(owner: &BulletOwner, time_scale: f32) -> f32 {
    match owner {
        BulletOwner::Player => 1.0,
        BulletOwner::Enemy => time_scale,
    }
}

/// Advance one projectile by one tick.
pub fn step_projectile(p: &mut Projectile, time_scale: f32, config: &BattleConfig) -> Motion {
    if p.delay > 0 {
        p.delay -= 1;
        return Motion::Waiting;
    }

    let scale = effective_scale(&p.owner, time_scale);

    if p.kind.detonates() {
        if let Some(fuse) = p.fuse.as_mut() {
            // Fuses stop outright under heavy dilation rather than slowing.
            if *fuse > 0 && scale > config.fuse_time_scale_gate {
                *fuse -= 1;
            }
            if *fuse == 0 {
                return Motion::Detonated;
            }
        }
    }

    p.speed += p.accel * scale;
    if p.accel < 0.0 && p.speed < 0.0 {
        // decelerating bullets come to rest instead of reversing
        p.speed = 0.0;
    }
    p.angle += p.angular_velocity * scale;

    let step = p.speed * scale * config.global_speed_multiplier;
    p.x += p.angle.cos() * step;
    p.y += p.angle.sin() * step;
    Motion::Moved
}

pub fn in_bounds(p: &Projectile, config: &BattleConfig) -> bool {
    let m = config.cull_margin;
    p.x >= -m && p.x <= config.field_width + m && p.y >= -m && p.y <= config.field_height + m
}

/// Evenly spaced shards for a detonation at (`x`, `y`). Speed is jittered
/// per shard.
pub fn shard_burst<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    config: &BattleConfig,
    rng: &mut R,
) -> Vec<Projectile> {
    let n = config.shard_count.max(1);
    (0..n)
        .map(|i| {
            let angle = i as f32 * TAU / n as f32;
            let speed = config.shard_speed + rng.gen::<f32>() * config.shard_speed_jitter;
            Projectile::enemy(ProjectileKind::Shard, x, y, speed, angle, config.shard_radius)
        })
        .collect()
}

/// Step every projectile, replace detonated cups with shards, and cull
/// anything that has left the field.
pub fn advance_projectiles<R: Rng + ?Sized>(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &mut R,
) {
    let time_scale = state.time_scale;
    let mut detonations: Vec<(f32, f32)> = Vec::new();

    state.projectiles.retain_mut(|p| match step_projectile(p, time_scale, config) {
        Motion::Detonated => {
            detonations.push((p.x, p.y));
            false
        }
        Motion::Waiting | Motion::Moved => in_bounds(p, config),
    });

    for (x, y) in detonations {
        let shards = shard_burst(x, y, config, rng);
        state.projectiles.extend(shards);
        state.particles.push(Particle { x, y, vx: 0.0, vy: 0.0, life: 24, kind: ParticleKind::Burst });
    }
}

/// Age particles, shockwaves, the phase banner and the boss shake. These run
/// at wall speed regardless of the bomb.
pub fn decay_effects(state: &mut BattleState) {
    for particle in state.particles.iter_mut() {
        particle.x += particle.vx;
        particle.y += particle.vy;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);

    for wave in state.shockwaves.iter_mut() {
        wave.radius += 6.0;
        wave.life = wave.life.saturating_sub(1);
    }
    state.shockwaves.retain(|w| w.life > 0);

    if let Some(banner) = state.banner.as_mut() {
        banner.ticks_left = banner.ticks_left.saturating_sub(1);
        if banner.ticks_left == 0 {
            state.banner = None;
        }
    }

    state.boss.shake = state.boss.shake.saturating_sub(1);
}

/// Cosmetic spark thrown from (`x`, `y`) away from (`from_x`, `from_y`).
pub fn spark(x: f32, y: f32, from_x: f32, from_y: f32, kind: ParticleKind) -> Particle {
    let angle = (y - from_y).atan2(x - from_x);
    Particle { x, y, vx: angle.cos() * 1.5, vy: angle.sin() * 1.5, life: 16, kind }
}

pub fn shockwave(x: f32, y: f32) -> Shockwave {
    Shockwave { x, y, radius: 0.0, life: 45 }
}
