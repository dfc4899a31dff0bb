/// Time-stagnation bomb: a limited charge that slows enemy time to a crawl
/// and makes the player untouchable until the freeze thaws.

use crate::config::BattleConfig;
use crate::entities::BattleState;
use crate::physics::shockwave;

/// Spend a charge and start a freeze. Returns `false`, changing nothing,
/// when no charge is left or a freeze is already running.
pub fn trigger(state: &mut BattleState, config: &BattleConfig) -> bool {
    if state.bombs == 0 || state.is_frozen() {
        return false;
    }
    state.bombs -= 1;
    state.freeze_ticks = config.freeze_ticks;
    state.time_scale = config.freeze_time_scale;
    state.player.invuln_frames = config.freeze_ticks;
    state.shockwaves.push(shockwave(state.player.x, state.player.y));
    log::info!("bomb: time stagnation for {} ticks, {} charges left", config.freeze_ticks, state.bombs);
    true
}

/// Count the freeze down. On thaw every enemy bullet is cleared and normal
/// time resumes. Returns `true` on the tick the freeze ends.
pub fn update(state: &mut BattleState) -> bool {
    if !state.is_frozen() {
        return false;
    }
    state.freeze_ticks -= 1;
    if state.freeze_ticks > 0 {
        return false;
    }
    state.clear_enemy_projectiles();
    state.time_scale = 1.0;
    state.shockwaves.push(shockwave(state.player.x, state.player.y));
    log::debug!("bomb: thaw");
    true
}
