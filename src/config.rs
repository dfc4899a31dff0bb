/// Tunable battle constants.
///
/// Every value has a default, so a JSON file only needs to name the fields
/// it overrides. Durations are in ticks unless the name says otherwise.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // ── Field ─────────────────────────────────────────────────────────────────
    pub field_width: f32,
    pub field_height: f32,
    /// Height of the top row reserved for the wall mechanic.
    pub tile_size: f32,
    /// Bullets further than this outside the field are culled.
    pub cull_margin: f32,
    pub tick_rate: u32,
    pub max_catch_up_ticks: u32,
    pub time_limit_secs: u32,

    // ── Session ───────────────────────────────────────────────────────────────
    pub starting_lives: u32,
    pub starting_bombs: u32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_start: (f32, f32),
    pub player_speed: f32,
    pub player_focus_speed: f32,
    pub hitbox_radius: f32,
    pub focus_hitbox_radius: f32,
    /// Fixed hit distance used for ticket bullets.
    pub ticket_hit_distance: f32,
    pub graze_radius: f32,
    pub graze_score: u64,
    pub invuln_window: u32,
    pub shoot_cooldown: i32,
    pub shot_speed: f32,
    pub shot_radius: f32,
    pub option_shot_speed: f32,
    pub option_shot_radius: f32,
    pub option_radius: f32,
    pub option_focus_radius: f32,
    pub option_orbit_rate: f32,
    pub option_easing: f32,
    pub option_arc_spread: f32,

    // ── Boss ──────────────────────────────────────────────────────────────────
    pub boss_start: (f32, f32),
    pub boss_radius: f32,
    pub boss_damage_per_hit: u32,
    pub score_per_hit: u64,
    pub boss_shake_ticks: u32,
    pub hit_cooldown: u32,
    pub phase_grace_cooldown: u32,
    pub boss_retarget_period: u64,
    pub boss_lerp: f32,
    pub banner_ticks: u32,

    // ── Bomb ──────────────────────────────────────────────────────────────────
    pub freeze_ticks: u32,
    pub freeze_time_scale: f32,
    /// Fuses only count down while the time scale exceeds this.
    pub fuse_time_scale_gate: f32,

    // ── Detonation ────────────────────────────────────────────────────────────
    pub shard_count: u32,
    pub shard_speed: f32,
    pub shard_speed_jitter: f32,
    pub shard_radius: f32,

    pub global_speed_multiplier: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            field_width: 600.0,
            field_height: 800.0,
            tile_size: 40.0,
            cull_margin: 50.0,
            tick_rate: 60,
            max_catch_up_ticks: 5,
            time_limit_secs: 180,

            starting_lives: 3,
            starting_bombs: 3,

            player_start: (300.0, 700.0),
            player_speed: 5.0,
            player_focus_speed: 2.0,
            hitbox_radius: 3.0,
            focus_hitbox_radius: 4.5,
            ticket_hit_distance: 12.0,
            graze_radius: 20.0,
            graze_score: 20,
            invuln_window: 120,
            shoot_cooldown: 4,
            shot_speed: 14.0,
            shot_radius: 4.0,
            option_shot_speed: 12.0,
            option_shot_radius: 3.0,
            option_radius: 48.0,
            option_focus_radius: 24.0,
            option_orbit_rate: 0.06,
            option_easing: 0.2,
            option_arc_spread: 0.35,

            boss_start: (300.0, 150.0),
            boss_radius: 40.0,
            boss_damage_per_hit: 2,
            score_per_hit: 10,
            boss_shake_ticks: 8,
            hit_cooldown: 90,
            phase_grace_cooldown: 60,
            boss_retarget_period: 120,
            boss_lerp: 0.02,
            banner_ticks: 150,

            freeze_ticks: 300,
            freeze_time_scale: 0.05,
            fuse_time_scale_gate: 0.5,

            shard_count: 12,
            shard_speed: 3.0,
            shard_speed_jitter: 1.5,
            shard_radius: 5.0,

            global_speed_multiplier: 1.0,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive finite number, got {}", value),
        })
    }
}

fn non_zero(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        })
    }
}

impl BattleConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("tile_size", self.tile_size)?;
        positive("player_speed", self.player_speed)?;
        positive("player_focus_speed", self.player_focus_speed)?;
        positive("hitbox_radius", self.hitbox_radius)?;
        positive("focus_hitbox_radius", self.focus_hitbox_radius)?;
        positive("ticket_hit_distance", self.ticket_hit_distance)?;
        positive("graze_radius", self.graze_radius)?;
        positive("shot_radius", self.shot_radius)?;
        positive("option_shot_radius", self.option_shot_radius)?;
        positive("boss_radius", self.boss_radius)?;
        positive("freeze_time_scale", self.freeze_time_scale)?;
        positive("shard_radius", self.shard_radius)?;
        positive("global_speed_multiplier", self.global_speed_multiplier)?;
        non_zero("tick_rate", self.tick_rate)?;
        non_zero("max_catch_up_ticks", self.max_catch_up_ticks)?;
        non_zero("starting_lives", self.starting_lives)?;
        non_zero("boss_damage_per_hit", self.boss_damage_per_hit)?;
        non_zero("freeze_ticks", self.freeze_ticks)?;

        // Glitch spawns need room between the wall row and mid-field.
        if self.tile_size >= self.field_height / 2.0 {
            return Err(ConfigError::InvalidValue {
                field: "tile_size",
                reason: "must be less than half of field_height".to_string(),
            });
        }
        if self.freeze_time_scale > 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "freeze_time_scale",
                reason: "must not exceed 1.0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.option_easing) {
            return Err(ConfigError::InvalidValue {
                field: "option_easing",
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        Ok(())
    }

    /// Wall-clock length of one tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}
