//! Boss directors: phase thresholds plus one pattern generator per phase.
//!
//! A director is chosen once when a battle is built. Pattern generators are
//! plain functions of a [`PatternContext`], the explicit [`AuxState`] and an
//! injected random source, so a seeded RNG reproduces a volley exactly.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use rand::{Rng, RngCore};

use crate::config::BattleConfig;
use crate::entities::{AuxState, Projectile, ProjectileKind};
use crate::error::ConfigError;

/// Everything a pattern may read about the current tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternContext {
    /// Boss pattern clock; 1 on the first firing tick of a phase.
    pub tick: u64,
    pub boss_x: f32,
    pub boss_y: f32,
    pub player_x: f32,
    pub player_y: f32,
    pub field_width: f32,
    pub field_height: f32,
    pub tile_size: f32,
}

impl PatternContext {
    /// Angle from the boss to the player.
    pub fn aim(&self) -> f32 {
        (self.player_y - self.boss_y).atan2(self.player_x - self.boss_x)
    }
}

pub type PatternFn = fn(&PatternContext, &mut AuxState, &mut dyn RngCore) -> Vec<Projectile>;

/// One phase: its display name and generator.
#[derive(Clone, Copy, Debug)]
pub struct PhaseSpec {
    pub name: &'static str,
    pub pattern: Option<PatternFn>,
}

pub trait BossDirector {
    fn name(&self) -> &str;

    fn max_health(&self) -> u32;

    /// Health ratios at which the next phase begins, strictly descending.
    fn thresholds(&self) -> &[f32];

    /// One entry per phase, phase 1 first.
    fn phases(&self) -> &[PhaseSpec];

    fn initial_aux(&self, config: &BattleConfig) -> AuxState {
        AuxState { wall_gap_x: config.field_width / 2.0, wall_gap_dir: 1.0 }
    }

    /// Phase whose band contains `hp_ratio`.
    fn phase_for(&self, hp_ratio: f32) -> u8 {
        let crossed = self.thresholds().iter().filter(|&&t| hp_ratio < t).count();
        (crossed + 1) as u8
    }

    fn phase_name(&self, phase: u8) -> &str {
        self.phases()
            .get(usize::from(phase).saturating_sub(1))
            .map(|spec| spec.name)
            .unwrap_or("")
    }

    fn pattern_for(
        &self,
        phase: u8,
        ctx: &PatternContext,
        aux: &mut AuxState,
        rng: &mut dyn RngCore,
    ) -> Vec<Projectile> {
        match self
            .phases()
            .get(usize::from(phase).saturating_sub(1))
            .and_then(|spec| spec.pattern)
        {
            Some(pattern) => pattern(ctx, aux, rng),
            None => Vec::new(),
        }
    }
}

/// Reject directors whose difficulty curve would be silently wrong.
pub fn validate(director: &dyn BossDirector) -> Result<(), ConfigError> {
    if director.max_health() == 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_health",
            reason: "boss must start with health".to_string(),
        });
    }

    let thresholds = director.thresholds();
    for &t in thresholds {
        if !(t > 0.0 && t < 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(t));
        }
    }
    for pair in thresholds.windows(2) {
        if pair[1] >= pair[0] {
            return Err(ConfigError::ThresholdsNotDescending { previous: pair[0], next: pair[1] });
        }
    }

    let phases = director.phases();
    if phases.len() != thresholds.len() + 1 || phases.len() > usize::from(u8::MAX) {
        return Err(ConfigError::PhaseCountMismatch {
            thresholds: thresholds.len(),
            phases: phases.len(),
        });
    }
    for (i, spec) in phases.iter().enumerate() {
        if spec.pattern.is_none() {
            return Err(ConfigError::MissingPattern { phase: (i + 1) as u8, name: spec.name.to_string() });
        }
    }
    Ok(())
}

// ── Shared volley shapes ──────────────────────────────────────────────────────

fn fan(
    ctx: &PatternContext,
    kind: ProjectileKind,
    count: u32,
    spread: f32,
    speed: f32,
    radius: f32,
) -> Vec<Projectile> {
    let base = ctx.aim() - spread * (count as f32 - 1.0) / 2.0;
    (0..count)
        .map(|i| Projectile::enemy(kind, ctx.boss_x, ctx.boss_y, speed, base + spread * i as f32, radius))
        .collect()
}

fn ring(ctx: &PatternContext, count: u32, offset: f32, speed: f32, radius: f32) -> Vec<Projectile> {
    (0..count)
        .map(|i| {
            let angle = offset + i as f32 * TAU / count as f32;
            Projectile::enemy(ProjectileKind::Orb, ctx.boss_x, ctx.boss_y, speed, angle, radius)
        })
        .collect()
}

// ── The Night Clerk ───────────────────────────────────────────────────────────

/// Aimed ticket fans over a slowly turning orb ring.
fn ticket_barrage(ctx: &PatternContext, _aux: &mut AuxState, _rng: &mut dyn RngCore) -> Vec<Projectile> {
    let mut out = Vec::new();
    if ctx.tick % 30 == 0 {
        out.extend(fan(ctx, ProjectileKind::Ticket, 5, 0.22, 3.2, 6.0));
    }
    if ctx.tick % 45 == 0 {
        out.extend(ring(ctx, 16, ctx.tick as f32 * 0.05, 2.2, 7.0));
    }
    out
}

/// Horizontal ticket wall from the top row with a moving gap.
fn scan_line_audit(ctx: &PatternContext, aux: &mut AuxState, _rng: &mut dyn RngCore) -> Vec<Projectile> {
    let mut out = Vec::new();
    if ctx.tick % 80 == 0 {
        let spacing = ctx.tile_size / 2.0;
        let half_gap = ctx.tile_size * 1.5;
        let columns = (ctx.field_width / spacing) as u32;
        for col in 0..columns {
            let x = spacing / 2.0 + col as f32 * spacing;
            if (x - aux.wall_gap_x).abs() < half_gap {
                continue;
            }
            out.push(
                Projectile::enemy(ProjectileKind::Ticket, x, ctx.tile_size / 2.0, 2.5, FRAC_PI_2, 6.0)
                    .with_delay(col),
            );
        }

        aux.wall_gap_x += aux.wall_gap_dir * ctx.tile_size * 1.5;
        if aux.wall_gap_x > ctx.field_width - half_gap {
            aux.wall_gap_x = ctx.field_width - half_gap;
            aux.wall_gap_dir = -1.0;
        } else if aux.wall_gap_x < half_gap {
            aux.wall_gap_x = half_gap;
            aux.wall_gap_dir = 1.0;
        }
    }
    if ctx.tick % 40 == 20 {
        out.extend(fan(ctx, ProjectileKind::Orb, 2, 0.3, 3.0, 6.0));
    }
    out
}

/// Slow aimed cups that stop and burst, between spinning orb pairs.
fn coffee_break(ctx: &PatternContext, _aux: &mut AuxState, _rng: &mut dyn RngCore) -> Vec<Projectile> {
    let mut out = Vec::new();
    if ctx.tick % 100 == 0 {
        out.push(
            Projectile::enemy(ProjectileKind::Cup, ctx.boss_x, ctx.boss_y, 4.0, ctx.aim(), 10.0)
                .with_accel(-0.05)
                .with_fuse(90),
        );
    }
    if ctx.tick % 20 == 0 {
        let angle = ctx.tick as f32 * 0.1;
        for (offset, spin) in [(0.0, 0.01), (PI, -0.01)] {
            out.push(
                Projectile::enemy(ProjectileKind::Orb, ctx.boss_x, ctx.boss_y, 2.6, angle + offset, 6.0)
                    .with_spin(spin),
            );
        }
    }
    out
}

/// Glitch squares appearing anywhere in the upper half.
fn system_glitch(ctx: &PatternContext, _aux: &mut AuxState, rng: &mut dyn RngCore) -> Vec<Projectile> {
    let mut out = Vec::new();
    if ctx.tick % 6 == 0 {
        let x = rng.gen_range(0.0..ctx.field_width);
        let y = rng.gen_range(ctx.tile_size..(ctx.field_height / 2.0).max(ctx.tile_size + 1.0));
        let angle = rng.gen_range(0.0..TAU);
        let speed = 1.5 + rng.gen::<f32>() * 1.5;
        out.push(Projectile::enemy(ProjectileKind::Glitch, x, y, speed, angle, 6.0).with_delay(10));
    }
    if ctx.tick % 60 == 0 {
        out.extend(fan(ctx, ProjectileKind::Orb, 3, 0.15, 4.0, 6.0));
    }
    out
}

const CLERK_THRESHOLDS: [f32; 3] = [0.8, 0.5, 0.2];

const CLERK_PHASES: [PhaseSpec; 4] = [
    PhaseSpec { name: "Ticket Barrage", pattern: Some(ticket_barrage) },
    PhaseSpec { name: "Scan-Line Audit", pattern: Some(scan_line_audit) },
    PhaseSpec { name: "Coffee Break", pattern: Some(coffee_break) },
    PhaseSpec { name: "System Glitch", pattern: Some(system_glitch) },
];

/// The built-in four-phase boss.
#[derive(Clone, Debug, Default)]
pub struct ClerkDirector;

impl BossDirector for ClerkDirector {
    fn name(&self) -> &str {
        "The Night Clerk"
    }

    fn max_health(&self) -> u32 {
        1200
    }

    fn thresholds(&self) -> &[f32] {
        &CLERK_THRESHOLDS
    }

    fn phases(&self) -> &[PhaseSpec] {
        &CLERK_PHASES
    }
}
