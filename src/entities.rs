/// Battle entity types. Pure data; behaviour lives in the update modules.

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Plain round bullet.
    Orb,
    /// Rectangular ticket; collides at a fixed enlarged distance.
    Ticket,
    /// Explosive cup; carries a fuse and bursts into shards.
    Cup,
    /// Fragment thrown out by a detonating cup.
    Shard,
    /// Square glitch block.
    Glitch,
    /// Player main shot.
    PlayerDot,
    /// Option shot.
    PlayerRice,
}

impl ProjectileKind {
    /// True for kinds that self-destruct when their fuse runs out.
    pub fn detonates(self) -> bool {
        self == ProjectileKind::Cup
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A single live bullet. Velocity is polar: `speed` along `angle` (radians,
/// screen space, +y pointing down).
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub angle: f32,
    /// Added to `speed` every tick.
    pub accel: f32,
    /// Added to `angle` every tick.
    pub angular_velocity: f32,
    pub radius: f32,
    pub kind: ProjectileKind,
    pub owner: BulletOwner,
    /// Latched once the player has grazed it. Enemy bullets only.
    pub grazed: bool,
    /// Ticks before the bullet starts moving or colliding.
    pub delay: u32,
    /// Ticks until detonation, detonating kinds only.
    pub fuse: Option<u32>,
    /// Cosmetic tint for option shots.
    pub tint: Option<[u8; 3]>,
}

impl Projectile {
    fn new(
        owner: BulletOwner,
        kind: ProjectileKind,
        x: f32,
        y: f32,
        speed: f32,
        angle: f32,
        radius: f32,
    ) -> Self {
        Projectile {
            x,
            y,
            speed,
            angle,
            accel: 0.0,
            angular_velocity: 0.0,
            radius,
            kind,
            owner,
            grazed: false,
            delay: 0,
            fuse: None,
            tint: None,
        }
    }

    pub fn enemy(kind: ProjectileKind, x: f32, y: f32, speed: f32, angle: f32, radius: f32) -> Self {
        Self::new(BulletOwner::Enemy, kind, x, y, speed, angle, radius)
    }

    pub fn player(kind: ProjectileKind, x: f32, y: f32, speed: f32, angle: f32, radius: f32) -> Self {
        Self::new(BulletOwner::Player, kind, x, y, speed, angle, radius)
    }

    pub fn with_accel(mut self, accel: f32) -> Self {
        self.accel = accel;
        self
    }

    pub fn with_spin(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_fuse(mut self, fuse: u32) -> Self {
        self.fuse = Some(fuse);
        self
    }

    pub fn with_tint(mut self, tint: [u8; 3]) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn is_enemy(&self) -> bool {
        self.owner == BulletOwner::Enemy
    }

    /// Spawn-time sanity check: finite kinematics, positive radius, and a
    /// fuse on every detonating kind.
    pub fn is_valid(&self) -> bool {
        let finite = [self.x, self.y, self.speed, self.angle, self.accel, self.angular_velocity]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.radius.is_finite()
            && self.radius > 0.0
            && (!self.kind.detonates() || self.fuse.is_some())
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

pub const OPTION_COUNT: usize = 5;

/// Fixed identity colours of the five options.
pub const OPTION_COLORS: [[u8; 3]; OPTION_COUNT] = [
    [255, 96, 96],
    [255, 200, 64],
    [96, 255, 128],
    [96, 176, 255],
    [200, 120, 255],
];

/// One orbiting satellite emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSatellite {
    pub angle: f32,
    pub target_angle: f32,
    pub radius: f32,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub focused: bool,
    /// Ticks until the next shot; fires when `<= 0`.
    pub shoot_cooldown: i32,
    pub invuln_frames: u32,
    pub options: [OptionSatellite; OPTION_COUNT],
    /// -1 leaning left, 1 leaning right, 0 level. Presentation only.
    pub bank: i8,
}

impl Player {
    /// Current world position of option `i`.
    pub fn option_position(&self, i: usize) -> (f32, f32) {
        let o = &self.options[i];
        (self.x + o.angle.cos() * o.radius, self.y + o.angle.sin() * o.radius)
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    /// Pattern clock; reset on every phase transition.
    pub tick: u64,
    /// While non-zero the pattern clock is held and nothing is fired.
    pub cooldown: u32,
    pub phase: u8,
    pub health: u32,
    pub max_health: u32,
    /// Remaining ticks of the hit-shake effect. Presentation only.
    pub shake: u32,
}

impl Boss {
    pub fn hp_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

// ── Visual-only effects ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Graze,
    Hit,
    Burst,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub kind: ParticleKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shockwave {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub life: u32,
}

/// Cut-in announcement shown when a phase begins.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseBanner {
    pub phase: u8,
    pub name: String,
    pub ticks_left: u32,
}

// ── Master battle state ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleStatus {
    Running,
    Victory,
    Defeat,
}

/// What one tick ended with. Terminal values are reported once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Victory,
    Defeat,
}

/// Crushing-wall state carried between pattern invocations.
#[derive(Clone, Debug, PartialEq)]
pub struct AuxState {
    /// Centre of the gap in the scan-line wall.
    pub wall_gap_x: f32,
    /// +1 moving right, -1 moving left.
    pub wall_gap_dir: f32,
}

/// The entire battle. Sole mutable root; every subsystem borrows it.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleState {
    pub player: Player,
    pub boss: Boss,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub shockwaves: Vec<Shockwave>,
    pub banner: Option<PhaseBanner>,
    pub aux: AuxState,
    pub lives: u32,
    pub bombs: u32,
    pub score: u64,
    pub graze: u32,
    /// Remaining bomb freeze ticks; zero when no freeze is active.
    pub freeze_ticks: u32,
    /// 1.0 normally, reduced while a bomb freeze is active.
    pub time_scale: f32,
    pub elapsed_ticks: u64,
    pub status: BattleStatus,
    pub paused: bool,
}

impl BattleState {
    pub fn is_frozen(&self) -> bool {
        self.freeze_ticks > 0
    }

    /// Drop every live enemy bullet; player shots survive.
    pub fn clear_enemy_projectiles(&mut self) {
        self.projectiles.retain(|p| !p.is_enemy());
    }

    pub fn enemy_projectile_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_enemy()).count()
    }
}
