//! The `Battle` facade driven by a front-end's frame loop.
//!
//! Wall time is accumulated and turned into whole fixed-length ticks, so
//! physics runs the same at any display refresh rate. Pause and bomb keys
//! are edge-triggered here; the terminal outcome is handed out exactly once.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{Sprite, SpriteAtlas, SpriteKey};
use crate::compute;
use crate::config::BattleConfig;
use crate::director::{self, BossDirector};
use crate::entities::{BattleState, BattleStatus, PhaseBanner, TickOutcome};
use crate::error::ConfigError;
use crate::player::{Control, EdgeTrigger, FrameInput, InputState};

/// Read-only numbers for the HUD, health bar and cut-in banner.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub boss_name: String,
    pub boss_health: u32,
    pub boss_max_health: u32,
    pub phase: u8,
    pub phase_name: String,
    pub lives: u32,
    pub bombs: u32,
    pub score: u64,
    pub graze: u32,
    pub clock_secs: u32,
    pub paused: bool,
    pub banner: Option<PhaseBanner>,
}

pub struct Battle<H> {
    state: BattleState,
    director: Box<dyn BossDirector>,
    config: BattleConfig,
    atlas: SpriteAtlas<H>,
    rng: StdRng,
    input: InputState,
    bomb_edge: EdgeTrigger,
    pause_edge: EdgeTrigger,
    accumulator: f32,
    outcome_reported: bool,
}

impl<H> Battle<H> {
    /// Validate the configuration and director, then set up phase 1.
    pub fn new(
        config: BattleConfig,
        director: Box<dyn BossDirector>,
        atlas: SpriteAtlas<H>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        director::validate(director.as_ref())?;

        let state = compute::init_state(&config, director.as_ref());
        log::info!(
            "battle start: {} ({} hp, {} phases), seed {}",
            director.name(),
            director.max_health(),
            director.phases().len(),
            seed
        );
        Ok(Battle {
            state,
            director,
            config,
            atlas,
            rng: StdRng::seed_from_u64(seed),
            input: InputState::new(),
            bomb_edge: EdgeTrigger::default(),
            pause_edge: EdgeTrigger::default(),
            accumulator: 0.0,
            outcome_reported: false,
        })
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn director(&self) -> &dyn BossDirector {
        self.director.as_ref()
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_over(&self) -> bool {
        self.state.status != BattleStatus::Running
    }

    pub fn sprite(&self, key: SpriteKey) -> Sprite<'_, H> {
        self.atlas.resolve(key)
    }

    pub fn hud(&self) -> Hud {
        let phase = self.state.boss.phase;
        Hud {
            boss_name: self.director.name().to_string(),
            boss_health: self.state.boss.health,
            boss_max_health: self.state.boss.max_health,
            phase,
            phase_name: self.director.phase_name(phase).to_string(),
            lives: self.state.lives,
            bombs: self.state.bombs,
            score: self.state.score,
            graze: self.state.graze,
            clock_secs: compute::remaining_secs(&self.state, &self.config),
            paused: self.state.paused,
            banner: self.state.banner.clone(),
        }
    }

    /// Feed `dt` seconds of wall time. Runs as many whole ticks as have
    /// accumulated, capped at `max_catch_up_ticks`; the excess is dropped.
    pub fn advance(&mut self, dt: f32) -> TickOutcome {
        if self.pause_edge.rising(self.input.is_held(Control::Pause)) && !self.is_over() {
            self.state.paused = !self.state.paused;
            self.accumulator = 0.0;
            log::info!("battle {}", if self.state.paused { "paused" } else { "resumed" });
        }
        if self.state.paused || self.outcome_reported {
            return TickOutcome::Continue;
        }

        let step = self.config.tick_seconds();
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let mut ticks = 0;
        while self.accumulator >= step && ticks < self.config.max_catch_up_ticks {
            self.accumulator -= step;
            ticks += 1;
            let outcome = self.step();
            if outcome != TickOutcome::Continue {
                return outcome;
            }
        }
        if self.accumulator >= step {
            self.accumulator = 0.0;
        }
        TickOutcome::Continue
    }

    /// Run exactly one tick, ignoring accumulated time.
    pub fn step(&mut self) -> TickOutcome {
        if self.outcome_reported {
            return TickOutcome::Continue;
        }
        let bomb = self.bomb_edge.rising(self.input.is_held(Control::Bomb));
        let frame_input = FrameInput::from_held(&self.input, bomb);
        let outcome = compute::tick(
            &mut self.state,
            self.director.as_ref(),
            &self.config,
            &frame_input,
            &mut self.rng,
        );
        if outcome != TickOutcome::Continue {
            self.outcome_reported = true;
            self.accumulator = 0.0;
            log::info!("battle over: {:?}, score {}", outcome, self.state.score);
        }
        outcome
    }
}
