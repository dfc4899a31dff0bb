/// Phase state machine: derives the boss phase from its health ratio and
/// applies phase-entry effects.

use crate::config::BattleConfig;
use crate::director::BossDirector;
use crate::entities::{BattleState, PhaseBanner};

/// Put up the cut-in banner for the boss's current phase.
pub fn announce(state: &mut BattleState, director: &dyn BossDirector, config: &BattleConfig) {
    let phase = state.boss.phase;
    state.banner = Some(PhaseBanner {
        phase,
        name: director.phase_name(phase).to_string(),
        ticks_left: config.banner_ticks,
    });
}

/// Recompute the phase and run the transition if it moved. Returns `true`
/// on a transition. Phases never move backwards.
pub fn update_phase(state: &mut BattleState, director: &dyn BossDirector, config: &BattleConfig) -> bool {
    if state.boss.health == 0 {
        return false;
    }
    let target = director.phase_for(state.boss.hp_ratio()).max(state.boss.phase);
    if target == state.boss.phase {
        return false;
    }
    enter_phase(state, director, config, target);
    true
}

/// Switch to `phase`: purge enemy fire, restart the pattern clock, give the
/// player a grace period and announce the new phase.
pub fn enter_phase(state: &mut BattleState, director: &dyn BossDirector, config: &BattleConfig, phase: u8) {
    log::info!(
        "{}: phase {} -> {} \"{}\" at {}/{} hp",
        director.name(),
        state.boss.phase,
        phase,
        director.phase_name(phase),
        state.boss.health,
        state.boss.max_health
    );
    state.boss.phase = phase;
    state.boss.tick = 0;
    state.boss.cooldown = config.phase_grace_cooldown;
    state.clear_enemy_projectiles();
    announce(state, director, config);
}
