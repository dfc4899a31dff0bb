mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use bullet_battle::assets::{SpriteAtlas, SpriteKey};
use bullet_battle::config::BattleConfig;
use bullet_battle::director::ClerkDirector;
use bullet_battle::engine::Battle;
use bullet_battle::entities::TickOutcome;
use bullet_battle::error::{ConfigError, Result};
use bullet_battle::player::Control;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈130 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Physical keys (with aliases) for each logical control.
fn bindings(control: Control) -> &'static [KeyCode] {
    match control {
        Control::Up => &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
        Control::Down => &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
        Control::Left => &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
        Control::Right => &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
        Control::Focus => &[KeyCode::Char('z'), KeyCode::Char('Z')],
        Control::Fire => &[KeyCode::Char(' '), KeyCode::Char('x'), KeyCode::Char('X')],
        Control::Bomb => &[KeyCode::Char('b'), KeyCode::Char('B'), KeyCode::Char('c'), KeyCode::Char('C')],
        Control::Pause => &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::Esc],
    }
}

const CONTROLS: [Control; 8] = [
    Control::Up,
    Control::Down,
    Control::Left,
    Control::Right,
    Control::Focus,
    Control::Fire,
    Control::Bomb,
    Control::Pause,
];

// ── Battle setup ──────────────────────────────────────────────────────────────

/// Config from the file named by `BATTLE_CONFIG`, or the defaults.
fn load_config() -> Result<BattleConfig> {
    match std::env::var("BATTLE_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)?;
            log::info!("loading battle config from {}", path);
            Ok(BattleConfig::from_json_str(&text)?)
        }
        Err(_) => Ok(BattleConfig::default()),
    }
}

/// Terminal glyphs standing in for loaded images. Shards are left out on
/// purpose and draw with their fallback shape.
fn glyph_atlas() -> SpriteAtlas<char> {
    [
        (SpriteKey::Orb, '●'),
        (SpriteKey::Ticket, '▬'),
        (SpriteKey::Cup, 'U'),
        (SpriteKey::Glitch, '▓'),
        (SpriteKey::PlayerDot, '|'),
        (SpriteKey::PlayerRice, '\''),
        (SpriteKey::Player, 'A'),
        (SpriteKey::Boss, '@'),
        (SpriteKey::LifeIcon, '♥'),
        (SpriteKey::BombIcon, '✦'),
    ]
    .into_iter()
    .collect()
}

fn new_battle(config: &BattleConfig) -> std::result::Result<Battle<char>, ConfigError> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Battle::new(config.clone(), Box::new(ClerkDirector), glyph_atlas(), seed)
}

/// Apply every queued event to `key_frame`. Returns `Some(true)` to quit,
/// `Some(false)` to restart a finished battle, `None` to keep playing.
fn drain_events(
    rx: &mpsc::Receiver<Event>,
    key_frame: &mut HashMap<KeyCode, u64>,
    frame: u64,
    battle_over: bool,
) -> Option<bool> {
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            // Resize and focus events: the next render rescales anyway.
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Some(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(true);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if battle_over => return Some(false),
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                key_frame.remove(&code);
            }
        }
    }
    None
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → restart the battle.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the fresh keys are copied
/// into the battle's held-input map, so Space + arrows + Z can be held at
/// the same time.  Keyboard-enhancement terminals also deliver `Release`
/// events, which remove the key immediately.
fn game_loop<W: Write>(
    out: &mut W,
    battle: &mut Battle<char>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();
    let mut ending: Option<TickOutcome> = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        if let Some(quit) = drain_events(rx, &mut key_frame, frame, battle.is_over()) {
            return Ok(quit);
        }

        // ── Sync held keys into the battle ────────────────────────────────────
        let input = battle.input_mut();
        for control in CONTROLS {
            let held = bindings(control).iter().any(|k| is_held(&key_frame, k, frame));
            input.set(control, held);
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        match battle.advance(dt) {
            TickOutcome::Continue => {}
            outcome => ending = Some(outcome),
        }

        display::render(out, battle, ending)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let config = load_config()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &BattleConfig) -> Result<()> {
    loop {
        let mut battle = new_battle(config)?;
        if game_loop(out, &mut battle, rx)? {
            break;
        }
    }
    Ok(())
}
