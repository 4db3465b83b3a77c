/// Presentation layer: redraws the whole screen from the world on demand.
///
/// Layout (top to bottom):
///   1. Title bar (level name)
///   2. HUD: health, attack, boost, potions, treasure
///   3. Map (fogged cells blank, one terminal column per tile)
///   4. Last action + recent battle log
///   5. Message line and key help
///
/// The game is turn-based, so the renderer only runs when an observer
/// reported a change. Every frame is batched with `queue!` and flushed once.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Fightable;
use crate::domain::item::PotionKind;
use crate::sim::combat::BattleResult;
use crate::sim::event::Action;
use crate::sim::map::WorldMap;
use crate::sim::world::World;

const HUD_ROW: u16 = 1;
const MAP_ROW: u16 = 3;
/// How many battle results to show under the map.
const BATTLE_LOG_LINES: usize = 3;

const HELP: &str = "arrows/wasd move+attack  g pick up  1 heal  2 power  q quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { writer: BufWriter::with_capacity(8192, io::stdout()) }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render<M: WorldMap>(&mut self, world: &World<M>, title: &str, message: &str) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All))?;

        // ── Title + HUD ──
        queue!(
            self.writer,
            MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print(format!("== {title} ==")),
        )?;

        let p = world.active_player();
        let hud = format!(
            "{} the {:?}  HP {}/{}  ATK {}  DEF {}  boost {}  potions {}!/{}+  treasure {}",
            p.name,
            p.class,
            p.health(),
            p.max_health(),
            p.attack_power(),
            p.defense(),
            p.power_boost_remaining(),
            p.potion_count(PotionKind::Healing),
            p.potion_count(PotionKind::Power),
            p.treasure_points(),
        );
        let hud_color = if p.is_dead() { Color::Red } else { Color::White };
        queue!(self.writer, MoveTo(0, HUD_ROW), SetForegroundColor(hud_color), Print(hud))?;

        // ── Map ──
        let map_text = world.map().to_string();
        let mut row = MAP_ROW;
        for line in map_text.lines() {
            queue!(self.writer, MoveTo(0, row))?;
            for ch in line.chars() {
                queue!(self.writer, SetForegroundColor(glyph_color(ch)), Print(ch))?;
            }
            row += 1;
        }
        row += 1;

        // ── Log ──
        queue!(self.writer, SetForegroundColor(Color::Grey))?;
        if let (Some(action), Some(pos)) = (world.last_action(), world.last_action_pos()) {
            let verb = match action {
                Action::Combat => "combat",
                Action::Pickup => "pickup",
                Action::Move => "move",
            };
            queue!(self.writer, MoveTo(0, row), Print(format!("last: {verb} at {pos}")))?;
        }
        row += 1;

        let results = world.battle_results();
        let tail = results.len().saturating_sub(BATTLE_LOG_LINES);
        for result in &results[tail..] {
            queue!(
                self.writer,
                MoveTo(0, row),
                SetForegroundColor(battle_color(result)),
                Print(result.to_string()),
            )?;
            row += 1;
        }
        row += 1;

        // ── Message + help ──
        if !message.is_empty() {
            queue!(
                self.writer,
                MoveTo(0, row),
                SetForegroundColor(Color::Yellow),
                Print(message),
            )?;
        }
        queue!(
            self.writer,
            MoveTo(0, row + 1),
            SetForegroundColor(Color::DarkGrey),
            Print(HELP),
            ResetColor,
        )?;

        self.writer.flush()
    }
}

fn glyph_color(ch: char) -> Color {
    match ch {
        '@' => Color::Yellow,
        'g' | 'o' | 's' => Color::Red,
        'D' => Color::Magenta,
        '!' | '+' => Color::Green,
        '$' => Color::DarkYellow,
        '#' => Color::DarkGrey,
        _ => Color::Grey,
    }
}

/// Deaths stand out in the battle log.
fn battle_color(result: &BattleResult) -> Color {
    if result.attacker_defeated() {
        Color::Red
    } else if result.defender_defeated() {
        Color::Green
    } else {
        Color::Grey
    }
}
