/// Battle construction and the per-tick update.
///
/// `tick` mutates the single `BattleState` root in a fixed order: bomb
/// freeze, phase, player, boss pattern, physics, collision, effects. All
/// randomness comes through `rng` so callers control determinism (tests use
/// a seeded RNG).

use rand::Rng;

use crate::bomb;
use crate::collision;
use crate::config::BattleConfig;
use crate::director::{BossDirector, PatternContext};
use crate::entities::{BattleState, BattleStatus, Boss, Projectile, TickOutcome};
use crate::phase;
use crate::physics;
use crate::player::{self, FrameInput};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state: phase 1, full health, full lives and bombs.
pub fn init_state(config: &BattleConfig, director: &dyn BossDirector) -> BattleState {
    let (bx, by) = config.boss_start;
    let mut state = BattleState {
        player: player::new_player(config),
        boss: Boss {
            x: bx,
            y: by,
            target_x: bx,
            target_y: by,
            tick: 0,
            cooldown: 0,
            phase: 1,
            health: director.max_health(),
            max_health: director.max_health(),
            shake: 0,
        },
        projectiles: Vec::new(),
        particles: Vec::new(),
        shockwaves: Vec::new(),
        banner: None,
        aux: director.initial_aux(config),
        lives: config.starting_lives,
        bombs: config.starting_bombs,
        score: 0,
        graze: 0,
        freeze_ticks: 0,
        time_scale: 1.0,
        elapsed_ticks: 0,
        status: BattleStatus::Running,
        paused: false,
    };
    phase::announce(&mut state, director, config);
    state
}

/// Add projectiles to the field, dropping any that fail the spawn check.
/// Returns how many were accepted.
pub fn spawn(state: &mut BattleState, projectiles: impl IntoIterator<Item = Projectile>) -> usize {
    let before = state.projectiles.len();
    for p in projectiles {
        if p.is_valid() {
            state.projectiles.push(p);
        } else {
            log::warn!("dropping invalid {:?} spawn at ({}, {}) r={}", p.kind, p.x, p.y, p.radius);
        }
    }
    state.projectiles.len() - before
}

/// Seconds left on the countdown clock.
pub fn remaining_secs(state: &BattleState, config: &BattleConfig) -> u32 {
    let elapsed = (state.elapsed_ticks / u64::from(config.tick_rate)) as u32;
    config.time_limit_secs.saturating_sub(elapsed)
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Drift toward a periodically re-rolled target, then fire the current
/// phase's pattern unless a cooldown is holding the pattern clock.
pub fn update_boss<R: Rng>(
    state: &mut BattleState,
    director: &dyn BossDirector,
    config: &BattleConfig,
    rng: &mut R,
) {
    let boss = &mut state.boss;
    if config.boss_retarget_period > 0 && state.elapsed_ticks % config.boss_retarget_period == 0 {
        let margin = config.field_width * 0.2;
        boss.target_x = rng.gen_range(margin..=config.field_width - margin);
        boss.target_y = config.boss_start.1 + rng.gen_range(-config.tile_size..=config.tile_size);
    }
    boss.x += (boss.target_x - boss.x) * config.boss_lerp;
    boss.y += (boss.target_y - boss.y) * config.boss_lerp;

    if boss.cooldown > 0 {
        boss.cooldown -= 1;
        return;
    }
    boss.tick += 1;

    let ctx = PatternContext {
        tick: boss.tick,
        boss_x: boss.x,
        boss_y: boss.y,
        player_x: state.player.x,
        player_y: state.player.y,
        field_width: config.field_width,
        field_height: config.field_height,
        tile_size: config.tile_size,
    };
    let phase = boss.phase;
    let volley = director.pattern_for(phase, &ctx, &mut state.aux, rng);
    spawn(state, volley);
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the battle by one tick. Returns `Victory`/`Defeat` on the tick
/// the battle ends; a finished battle no longer changes.
pub fn tick<R: Rng>(
    state: &mut BattleState,
    director: &dyn BossDirector,
    config: &BattleConfig,
    input: &FrameInput,
    rng: &mut R,
) -> TickOutcome {
    if state.status != BattleStatus::Running {
        return TickOutcome::Continue;
    }
    state.elapsed_ticks += 1;

    // ── 1. Bomb and time scale ───────────────────────────────────────────────
    if input.bomb {
        bomb::trigger(state, config);
    }
    bomb::update(state);

    // ── 2. Phase ─────────────────────────────────────────────────────────────
    phase::update_phase(state, director, config);

    // ── 3. Player movement, options and shots ────────────────────────────────
    player::update_player(state, input, config);

    // ── 4. Boss movement and pattern ─────────────────────────────────────────
    update_boss(state, director, config, rng);

    // ── 5. Integrate, detonate, cull ─────────────────────────────────────────
    physics::advance_projectiles(state, config, rng);

    // ── 6. Hits and grazes ───────────────────────────────────────────────────
    let outcome = collision::resolve(state, config);

    // ── 7. Visual effects ────────────────────────────────────────────────────
    physics::decay_effects(state);

    log::trace!(
        "tick {}: {} projectiles, boss {}/{}, phase {}, scale {}",
        state.elapsed_ticks,
        state.projectiles.len(),
        state.boss.health,
        state.boss.max_health,
        state.boss.phase,
        state.time_scale
    );
    outcome
}
