//! Sprite lookup with procedural fallbacks.
//!
//! The asset pipeline hands over a map from [`SpriteKey`] to whatever handle
//! type the front-end draws with. Missing entries never fail: they resolve to
//! a fixed primitive shape and colour per key.

use std::collections::HashMap;

use crate::entities::ProjectileKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Orb,
    Ticket,
    Cup,
    Shard,
    Glitch,
    PlayerDot,
    PlayerRice,
    Player,
    Boss,
    LifeIcon,
    BombIcon,
}

impl SpriteKey {
    pub fn for_projectile(kind: ProjectileKind) -> Self {
        match kind {
            ProjectileKind::Orb => SpriteKey::Orb,
            ProjectileKind::Ticket => SpriteKey::Ticket,
            ProjectileKind::Cup => SpriteKey::Cup,
            ProjectileKind::Shard => SpriteKey::Shard,
            ProjectileKind::Glitch => SpriteKey::Glitch,
            ProjectileKind::PlayerDot => SpriteKey::PlayerDot,
            ProjectileKind::PlayerRice => SpriteKey::PlayerRice,
        }
    }

    /// Shape drawn when no image is loaded for this key.
    pub fn fallback(self) -> FallbackShape {
        let (shape, color) = match self {
            SpriteKey::Orb => (Shape::Circle, [255, 80, 80]),
            SpriteKey::Ticket => (Shape::Rect, [240, 240, 200]),
            SpriteKey::Cup => (Shape::Circle, [160, 100, 50]),
            SpriteKey::Shard => (Shape::Diamond, [255, 160, 60]),
            SpriteKey::Glitch => (Shape::Square, [0, 255, 200]),
            SpriteKey::PlayerDot => (Shape::Rect, [120, 220, 255]),
            SpriteKey::PlayerRice => (Shape::Diamond, [200, 255, 255]),
            SpriteKey::Player => (Shape::Diamond, [255, 255, 255]),
            SpriteKey::Boss => (Shape::Square, [180, 60, 220]),
            SpriteKey::LifeIcon => (Shape::Circle, [255, 60, 120]),
            SpriteKey::BombIcon => (Shape::Diamond, [80, 160, 255]),
        };
        FallbackShape { shape, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Rect,
    Diamond,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackShape {
    pub shape: Shape,
    pub color: [u8; 3],
}

/// A resolved sprite: either the loaded handle or its fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite<'a, H> {
    Image(&'a H),
    Fallback(FallbackShape),
}

/// Loaded sprite handles, supplied once when a battle is built.
#[derive(Debug, Clone)]
pub struct SpriteAtlas<H> {
    handles: HashMap<SpriteKey, H>,
}

impl<H> Default for SpriteAtlas<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SpriteAtlas<H> {
    pub fn new() -> Self {
        Self { handles: HashMap::new() }
    }

    pub fn insert(&mut self, key: SpriteKey, handle: H) {
        self.handles.insert(key, handle);
    }

    pub fn with(mut self, key: SpriteKey, handle: H) -> Self {
        self.insert(key, handle);
        self
    }

    pub fn contains(&self, key: SpriteKey) -> bool {
        self.handles.contains_key(&key)
    }

    pub fn resolve(&self, key: SpriteKey) -> Sprite<'_, H> {
        match self.handles.get(&key) {
            Some(handle) => Sprite::Image(handle),
            None => {
                log::trace!("sprite {:?} not loaded, using fallback shape", key);
                Sprite::Fallback(key.fallback())
            }
        }
    }
}

impl<H> FromIterator<(SpriteKey, H)> for SpriteAtlas<H> {
    fn from_iter<I: IntoIterator<Item = (SpriteKey, H)>>(iter: I) -> Self {
        Self { handles: iter.into_iter().collect() }
    }
}
