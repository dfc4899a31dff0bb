/// Terminal renderer for a running battle.
///
/// Each function receives a mutable writer and an immutable view of the
/// battle.  No game logic is performed; this module only translates state
/// into terminal commands.  Field coordinates are scaled to whatever size
/// the terminal currently has.

use std::f32::consts::TAU;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use bullet_battle::assets::{Shape, Sprite, SpriteKey};
use bullet_battle::engine::Battle;
use bullet_battle::entities::{BulletOwner, ParticleKind, TickOutcome, OPTION_COUNT};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BOMBS: Color = Color::Cyan;
const C_HP_BAR: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_BOSS: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Red;
const C_GRAZE: Color = Color::White;
const C_SHOCKWAVE: Color = Color::Blue;
const C_BANNER: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Maps field coordinates onto terminal cells inside the border.
struct Viewport {
    width: u16,
    height: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(width: u16, height: u16, field_w: f32, field_h: f32) -> Self {
        let inner_w = width.saturating_sub(2).max(1) as f32;
        let inner_h = height.saturating_sub(4).max(1) as f32;
        Viewport { width, height, sx: inner_w / field_w, sy: inner_h / field_h }
    }

    /// Cell for a field position, or `None` when it falls outside the border.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x * self.sx).round() + 1.0;
        let row = (y * self.sy).round() + 2.0;
        let max_col = self.width.saturating_sub(2) as f32;
        let max_row = self.height.saturating_sub(3) as f32;
        if col < 1.0 || row < 2.0 || col > max_col || row > max_row {
            None
        } else {
            Some((col as u16, row as u16))
        }
    }
}

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb { r: c[0], g: c[1], b: c[2] }
}

fn shape_glyph(shape: Shape) -> char {
    match shape {
        Shape::Circle => 'o',
        Shape::Rect => '=',
        Shape::Diamond => '◆',
        Shape::Square => '■',
    }
}

/// Glyph and colour for a sprite, using the fallback shape when unloaded.
fn glyph(battle: &Battle<char>, key: SpriteKey, loaded_color: Color) -> (char, Color) {
    match battle.sprite(key) {
        Sprite::Image(c) => (*c, loaded_color),
        Sprite::Fallback(f) => (shape_glyph(f.shape), rgb(f.color)),
    }
}

fn put<W: Write>(out: &mut W, cell: Option<(u16, u16)>, c: char, color: Color) -> std::io::Result<()> {
    if let Some((col, row)) = cell {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(c))?;
    }
    Ok(())
}

fn centered<W: Write>(out: &mut W, width: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    battle: &Battle<char>,
    ending: Option<TickOutcome>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let config = battle.config();
    let view = Viewport::new(width, height, config.field_width, config.field_height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, battle, &view)?;
    draw_effects(out, battle, &view)?;
    draw_projectiles(out, battle, &view)?;
    draw_boss(out, battle, &view)?;
    draw_player(out, battle, &view)?;
    draw_banner(out, battle, &view)?;
    draw_controls_hint(out, &view)?;

    if let Some(outcome) = ending {
        draw_ending(out, battle, &view, outcome)?;
    } else if battle.is_paused() {
        centered(out, view.width, view.height / 2, "── PAUSED ──", Color::White)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    let hud = battle.hud();

    // Boss health bar, left
    let bar_len = 20usize;
    let filled = if hud.boss_max_health == 0 {
        0
    } else {
        (hud.boss_health as usize * bar_len).div_ceil(hud.boss_max_health as usize)
    };
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HP_BAR))?;
    out.queue(Print(format!(
        "{} [{}{}] P{}",
        hud.boss_name,
        "█".repeat(filled),
        "·".repeat(bar_len - filled),
        hud.phase
    )))?;

    // Lives, bombs, score, graze and clock on the right
    let (life, life_color) = glyph(battle, SpriteKey::LifeIcon, C_HUD_LIVES);
    let (bomb, bomb_color) = glyph(battle, SpriteKey::BombIcon, C_HUD_BOMBS);
    let lives: String = std::iter::repeat(life).take(hud.lives as usize).collect();
    let bombs: String = std::iter::repeat(bomb).take(hud.bombs as usize).collect();
    let stats = format!(" Score:{:>8} Graze:{:>4} {:>3}s", hud.score, hud.graze, hud.clock_secs);

    let right_len = lives.chars().count() + 1 + bombs.chars().count() + stats.chars().count();
    let rx = view.width.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(life_color))?;
    out.queue(Print(&lives))?;
    out.queue(Print(" "))?;
    out.queue(style::SetForegroundColor(bomb_color))?;
    out.queue(Print(&bombs))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&stats))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_effects<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    let state = battle.state();
    for wave in &state.shockwaves {
        for i in 0..24 {
            let a = i as f32 * TAU / 24.0;
            let cell = view.cell(wave.x + a.cos() * wave.radius, wave.y + a.sin() * wave.radius);
            put(out, cell, '·', C_SHOCKWAVE)?;
        }
    }
    for p in &state.particles {
        let (c, color) = match p.kind {
            ParticleKind::Graze => ('+', C_GRAZE),
            ParticleKind::Hit => ('*', Color::Yellow),
            ParticleKind::Burst => ('※', Color::DarkYellow),
        };
        put(out, view.cell(p.x, p.y), c, color)?;
    }
    Ok(())
}

fn draw_projectiles<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    let state = battle.state();
    let frozen = state.is_frozen();
    for p in &state.projectiles {
        let base = match p.owner {
            BulletOwner::Player => p.tint.map(rgb).unwrap_or(C_BULLET_PLAYER),
            BulletOwner::Enemy if frozen => Color::DarkGrey,
            BulletOwner::Enemy => C_BULLET_ENEMY,
        };
        let (c, color) = glyph(battle, SpriteKey::for_projectile(p.kind), base);
        // delayed bullets are shown dim until they activate
        let color = if p.delay > 0 { Color::DarkGrey } else { color };
        put(out, view.cell(p.x, p.y), c, color)?;
    }
    Ok(())
}

fn draw_boss<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    let boss = &battle.state().boss;
    let jitter = if boss.shake % 2 == 1 { 3.0 } else { 0.0 };
    let (c, color) = glyph(battle, SpriteKey::Boss, C_BOSS);
    put(out, view.cell(boss.x + jitter, boss.y), c, color)
}

fn draw_player<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    let player = &battle.state().player;

    for i in 0..OPTION_COUNT {
        let (ox, oy) = player.option_position(i);
        put(out, view.cell(ox, oy), 'o', rgb(player.options[i].color))?;
    }

    // Blink while invulnerable
    if player.invuln_frames > 0 && (player.invuln_frames / 4) % 2 == 0 {
        return Ok(());
    }
    let (c, color) = glyph(battle, SpriteKey::Player, C_PLAYER);
    let c = match player.bank {
        -1 => '<',
        1 => '>',
        _ => c,
    };
    let color = if player.focused { Color::Red } else { color };
    put(out, view.cell(player.x, player.y), c, color)
}

fn draw_banner<W: Write>(out: &mut W, battle: &Battle<char>, view: &Viewport) -> std::io::Result<()> {
    if let Some(banner) = &battle.state().banner {
        let text = format!("« Phase {}: {} »", banner.phase, banner.name);
        centered(out, view.width, 3, &text, C_BANNER)?;
    }
    if battle.state().is_frozen() {
        centered(out, view.width, 4, "TIME STAGNATION", C_HUD_BOMBS)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→/WASD : Move  Z : Focus  SPACE/X : Shoot  B : Bomb  P : Pause  Q : Quit",
    ))?;
    Ok(())
}

// ── Victory / defeat overlay ──────────────────────────────────────────────────

fn draw_ending<W: Write>(
    out: &mut W,
    battle: &Battle<char>,
    view: &Viewport,
    outcome: TickOutcome,
) -> std::io::Result<()> {
    let (title, color) = match outcome {
        TickOutcome::Victory => ("║      VICTORY       ║", Color::Green),
        _ => ("║      DEFEAT        ║", Color::Red),
    };
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", color),
        (title, color),
        ("╚════════════════════╝", color),
    ];

    let start_row = (view.height / 2).saturating_sub(3);
    for (i, (msg, color)) in lines.iter().enumerate() {
        centered(out, view.width, start_row + i as u16, msg, *color)?;
    }

    let hud = battle.hud();
    let score_line = format!("Final Score: {:>8}   Graze: {:>4}", hud.score, hud.graze);
    centered(out, view.width, start_row + 3, &score_line, Color::Yellow)?;
    centered(out, view.width, start_row + 4, "R - Retry  Q - Quit", Color::White)?;

    Ok(())
}
