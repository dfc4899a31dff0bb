/// Player controller: held-input bookkeeping, movement, the five orbiting
/// options and the firing cadence.

use std::collections::HashSet;
use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI, TAU};

use crate::compute;
use crate::config::BattleConfig;
use crate::entities::{
    BattleState, OptionSatellite, Player, Projectile, ProjectileKind, OPTION_COLORS, OPTION_COUNT,
};

// ── Input ─────────────────────────────────────────────────────────────────────

/// Logical controls. Front-ends map their physical keys (and aliases) here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Focus,
    Fire,
    Bomb,
    Pause,
}

/// Persistent "is held" map, updated by the input layer between ticks.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Control>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn set(&mut self, control: Control, held: bool) {
        if held {
            self.press(control);
        } else {
            self.release(control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Reports a press once, on the tick the control goes down.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTrigger {
    was_held: bool,
}

impl EdgeTrigger {
    pub fn rising(&mut self, held: bool) -> bool {
        let fired = held && !self.was_held;
        self.was_held = held;
        fired
    }
}

/// Input as seen by a single tick. `bomb` is already edge-filtered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub focus: bool,
    pub fire: bool,
    pub bomb: bool,
}

impl FrameInput {
    pub fn from_held(input: &InputState, bomb_pressed: bool) -> Self {
        FrameInput {
            up: input.is_held(Control::Up),
            down: input.is_held(Control::Down),
            left: input.is_held(Control::Left),
            right: input.is_held(Control::Right),
            focus: input.is_held(Control::Focus),
            fire: input.is_held(Control::Fire),
            bomb: bomb_pressed,
        }
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

fn spread_angle(i: usize) -> f32 {
    i as f32 * TAU / OPTION_COUNT as f32
}

pub fn new_player(config: &BattleConfig) -> Player {
    let options: [OptionSatellite; OPTION_COUNT] = std::array::from_fn(|i| OptionSatellite {
        angle: spread_angle(i),
        target_angle: spread_angle(i),
        radius: config.option_radius,
        color: OPTION_COLORS[i],
    });
    Player {
        x: config.player_start.0,
        y: config.player_start.1,
        focused: false,
        shoot_cooldown: 0,
        invuln_frames: 0,
        options,
        bank: 0,
    }
}

// ── Per-tick update ───────────────────────────────────────────────────────────

/// Signed shortest rotation from `from` to `to`.
fn angle_delta(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

pub fn update_player(state: &mut BattleState, input: &FrameInput, config: &BattleConfig) {
    let player = &mut state.player;
    player.invuln_frames = player.invuln_frames.saturating_sub(1);
    player.focused = input.focus;

    move_player(player, input, config);
    update_options(player, state.elapsed_ticks, config);

    if input.fire && player.shoot_cooldown <= 0 {
        let shots = volley(player, config);
        player.shoot_cooldown = config.shoot_cooldown;
        compute::spawn(state, shots);
    } else {
        player.shoot_cooldown = (player.shoot_cooldown - 1).max(0);
    }
}

pub fn move_player(player: &mut Player, input: &FrameInput, config: &BattleConfig) {
    let dx = input.right as i8 - input.left as i8;
    let dy = input.down as i8 - input.up as i8;
    player.bank = dx;

    let speed = if input.focus { config.player_focus_speed } else { config.player_speed };
    let norm = if dx != 0 && dy != 0 { FRAC_1_SQRT_2 } else { 1.0 };

    player.x = (player.x + dx as f32 * speed * norm).clamp(0.0, config.field_width);
    player.y = (player.y + dy as f32 * speed * norm).clamp(config.tile_size, config.field_height);
}

/// Unfocused options revolve at a fixed rate, evenly spaced; focused ones
/// ease into a tight arc behind the player.
pub fn update_options(player: &mut Player, tick: u64, config: &BattleConfig) {
    let focused = player.focused;
    let rotation = (tick as f32 * config.option_orbit_rate).rem_euclid(TAU);
    let goal_radius = if focused { config.option_focus_radius } else { config.option_radius };

    for (i, option) in player.options.iter_mut().enumerate() {
        option.target_angle = if focused {
            FRAC_PI_2 + (i as f32 - (OPTION_COUNT as f32 - 1.0) / 2.0) * config.option_arc_spread
        } else {
            (rotation + spread_angle(i)).rem_euclid(TAU)
        };

        let delta = angle_delta(option.angle, option.target_angle);
        if !focused && delta.abs() <= config.option_orbit_rate * 2.0 {
            option.angle = option.target_angle;
        } else {
            option.angle = (option.angle + delta * config.option_easing).rem_euclid(TAU);
        }
        option.radius += (goal_radius - option.radius) * config.option_easing;
    }
}

/// One main shot plus one shot per option, all straight up.
pub fn volley(player: &Player, config: &BattleConfig) -> Vec<Projectile> {
    let up = -FRAC_PI_2;
    let mut shots = Vec::with_capacity(OPTION_COUNT + 1);
    shots.push(Projectile::player(
        ProjectileKind::PlayerDot,
        player.x,
        player.y,
        config.shot_speed,
        up,
        config.shot_radius,
    ));
    for (i, option) in player.options.iter().enumerate() {
        let (ox, oy) = player.option_position(i);
        shots.push(
            Projectile::player(ProjectileKind::PlayerRice, ox, oy, config.option_shot_speed, up, config.option_shot_radius)
                .with_tint(option.color),
        );
    }
    shots
}
