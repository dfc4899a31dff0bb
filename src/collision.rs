/// Collision and graze resolution.
///
/// Enemy fire is tested against the player's hitbox and graze ring; player
/// fire is tested against the boss. Both passes mutate health, score and
/// the projectile list in place and report whether the battle ended.

use crate::config::BattleConfig;
use crate::entities::{BattleState, BattleStatus, ParticleKind, Player, ProjectileKind, TickOutcome};
use crate::physics::spark;

/// Collision radius of the player's hitbox for the current mode.
pub fn player_hitbox(player: &Player, config: &BattleConfig) -> f32 {
    if player.focused {
        config.focus_hitbox_radius
    } else {
        config.hitbox_radius
    }
}

fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

/// Run both passes. Enemy fire is resolved first, so a tick that both
/// kills the player and the boss ends in defeat.
pub fn resolve(state: &mut BattleState, config: &BattleConfig) -> TickOutcome {
    match resolve_enemy_fire(state, config) {
        TickOutcome::Continue => resolve_player_fire(state, config),
        ended => ended,
    }
}

/// Enemy bullets against the player. Skipped entirely while a bomb freeze
/// is active.
pub fn resolve_enemy_fire(state: &mut BattleState, config: &BattleConfig) -> TickOutcome {
    if state.is_frozen() {
        return TickOutcome::Continue;
    }

    let px = state.player.x;
    let py = state.player.y;
    let vulnerable = state.player.invuln_frames == 0;
    let hitbox = player_hitbox(&state.player, config);

    let mut hit = false;
    let mut grazes: Vec<(f32, f32)> = Vec::new();

    for p in state.projectiles.iter_mut().filter(|p| p.is_enemy() && p.delay == 0) {
        let dist = distance(p.x, p.y, px, py);
        let hit_dist = match p.kind {
            ProjectileKind::Ticket => config.ticket_hit_distance,
            _ => p.radius + hitbox,
        };
        if vulnerable && dist < hit_dist {
            hit = true;
            break;
        }
        if !p.grazed && dist < p.radius + config.graze_radius {
            p.grazed = true;
            grazes.push((p.x, p.y));
        }
    }

    for (gx, gy) in grazes {
        state.graze += 1;
        state.score += config.graze_score;
        state.particles.push(spark(gx, gy, px, py, ParticleKind::Graze));
        log::debug!("graze #{} at ({:.0}, {:.0})", state.graze, gx, gy);
    }

    if !hit {
        return TickOutcome::Continue;
    }

    state.lives = state.lives.saturating_sub(1);
    state.player.invuln_frames = config.invuln_window;
    state.clear_enemy_projectiles();
    state.boss.cooldown = config.hit_cooldown;
    state.particles.push(spark(px, py - 1.0, px, py, ParticleKind::Hit));
    log::info!("player hit, {} lives left", state.lives);

    if state.lives == 0 {
        state.status = BattleStatus::Defeat;
        return TickOutcome::Defeat;
    }
    state.bombs = config.starting_bombs;
    TickOutcome::Continue
}

/// Player shots against the boss.
pub fn resolve_player_fire(state: &mut BattleState, config: &BattleConfig) -> TickOutcome {
    let bx = state.boss.x;
    let by = state.boss.y;
    let mut hits: Vec<(f32, f32)> = Vec::new();

    state.projectiles.retain(|p| {
        if p.is_enemy() || p.delay > 0 {
            return true;
        }
        if distance(p.x, p.y, bx, by) < config.boss_radius {
            hits.push((p.x, p.y));
            false
        } else {
            true
        }
    });

    if hits.is_empty() {
        return TickOutcome::Continue;
    }

    for (hx, hy) in hits {
        state.boss.health = state.boss.health.saturating_sub(config.boss_damage_per_hit);
        state.score += config.score_per_hit;
        state.particles.push(spark(hx, hy, bx, by, ParticleKind::Hit));
    }
    state.boss.shake = config.boss_shake_ticks;

    if state.boss.health == 0 {
        state.status = BattleStatus::Victory;
        log::info!("boss defeated, final score {}", state.score);
        return TickOutcome::Victory;
    }
    TickOutcome::Continue
}
