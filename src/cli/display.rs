//! Terminal display and UI rendering
//!
//! Features:
//! - Stage indicator and progress bar
//! - Large letter (block glyph in rich mode, plain in minimal mode)
//! - Feedback line and on-screen keyboard with hint highlight
//! - Particle overlay and bell sound cues

use super::keyboard::{KeyCell, KeyboardLayout};
use crate::effects::glyphs::{self, CELL_WIDTH};
use crate::effects::scene::{AnimationKind, Scene, SoundCue, Style, Tone};
use crate::session::Phase;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout, Write};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "Letter Stages";
const TITLE_ROW: u16 = 0;
const STAGE_ROW: u16 = 2;
const PROGRESS_ROW: u16 = 3;
/// Minimal mode prints the letter on the glyph's middle row
const PLAIN_LETTER_ROW: u16 = glyphs::LETTER_TOP + 2;
const FEEDBACK_ROW: u16 = 12;
const KEYBOARD_TOP: u16 = 14;
const HELP_ROW: u16 = 18;
const PROGRESS_WIDTH: usize = 30;

/// Read-only view of the game handed to the display each frame
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub phase: Phase,
    pub accepting: bool,
}

/// Terminal display manager
pub struct Display {
    out: Stdout,
    width: u16,
    height: u16,
    keyboard: KeyboardLayout,
    sound: bool,
    active: bool,
}

impl Display {
    /// Take over the terminal: raw mode, alternate screen, mouse capture
    pub fn enter(sound: bool) -> std::io::Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;
        // from here on, Drop restores the terminal if setup fails
        let mut display = Display {
            out: stdout(),
            width,
            height,
            keyboard: KeyboardLayout::centered(width, KEYBOARD_TOP),
            sound,
            active: true,
        };
        execute!(
            display.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(display)
    }

    pub fn keyboard(&self) -> &KeyboardLayout {
        &self.keyboard
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.keyboard = KeyboardLayout::centered(width, KEYBOARD_TOP);
    }

    /// Draw one frame inside a synchronized update
    pub fn render(&mut self, frame: &Frame<'_>, now: Instant) -> std::io::Result<()> {
        queue!(self.out, terminal::BeginSynchronizedUpdate)?;
        clear_rows(&mut self.out, self.height)?;
        self.draw_frame(frame, now)?;
        queue!(self.out, terminal::EndSynchronizedUpdate)?;
        self.out.flush()
    }

    fn draw_frame(&mut self, frame: &Frame<'_>, now: Instant) -> std::io::Result<()> {
        self.print_centered(TITLE_ROW, TITLE, Color::Cyan)?;

        if frame.phase == Phase::Idle {
            return self.print_centered(
                PLAIN_LETTER_ROW,
                "Press ENTER to start  |  Esc to exit",
                Color::Yellow,
            );
        }

        if let Some(label) = &frame.scene.stage_label {
            self.print_centered(STAGE_ROW, label, Color::Magenta)?;
        }
        let bar = progress_bar(frame.scene.progress, PROGRESS_WIDTH);
        self.print_centered(PROGRESS_ROW, &bar, Color::Green)?;

        self.draw_letter(frame, now)?;
        self.draw_feedback(frame.scene)?;
        self.draw_keyboard(frame.scene)?;
        self.draw_particles(frame.scene)?;

        let help = if frame.phase == Phase::Completed {
            "ENTER to play again  |  Esc to exit"
        } else {
            "Type the letter or click its key  |  Esc to exit"
        };
        self.print_centered(HELP_ROW, help, Color::DarkGrey)
    }

    /// Ring the terminal bell for queued cues
    pub fn play(&mut self, cues: &[SoundCue]) -> std::io::Result<()> {
        if !self.sound || cues.is_empty() {
            return Ok(());
        }
        for cue in cues {
            tracing::trace!(asset = %cue.asset_path(), "sound cue");
        }
        queue!(self.out, Print('\x07'))?;
        self.out.flush()
    }

    fn draw_letter(&mut self, frame: &Frame<'_>, now: Instant) -> std::io::Result<()> {
        let Some(letter) = frame.scene.letter else {
            return Ok(());
        };
        if frame.phase == Phase::Completed || frame.phase == Phase::StageTransition {
            return Ok(());
        }

        let color = if frame.accepting {
            Color::White
        } else {
            Color::DarkGrey
        };

        if frame.scene.style == Style::Minimal {
            let text = letter.upper().to_string();
            return self.print_centered(PLAIN_LETTER_ROW, &text, color);
        }

        // shattered letters are drawn by their debris
        let mut lift = 0;
        if let Some(anim) = frame.scene.animation {
            match anim.kind {
                AnimationKind::Disintegrate | AnimationKind::Celebrate => return Ok(()),
                AnimationKind::Bounce => lift = bounce_offset(anim.progress(now)),
            }
        }

        let (ox, oy) = glyphs::origin(self.width);
        let top = oy.saturating_sub(lift);
        let (fill, gap) = (
            "█".repeat(CELL_WIDTH as usize),
            " ".repeat(CELL_WIDTH as usize),
        );
        for (dy, row) in glyphs::rows(letter).iter().enumerate() {
            let line: String = row
                .chars()
                .map(|c| if c == '#' { fill.as_str() } else { gap.as_str() })
                .collect();
            queue!(
                self.out,
                cursor::MoveTo(ox, top + dy as u16),
                SetForegroundColor(color),
                Print(line),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn draw_feedback(&mut self, scene: &Scene) -> std::io::Result<()> {
        let Some(feedback) = &scene.feedback else {
            return Ok(());
        };
        let color = match feedback.tone {
            Tone::Correct => Color::Green,
            Tone::Wrong => Color::Red,
            Tone::Celebration => Color::Yellow,
            Tone::Complete => Color::Magenta,
        };
        self.print_centered(FEEDBACK_ROW, &feedback.text, color)
    }

    fn draw_keyboard(&mut self, scene: &Scene) -> std::io::Result<()> {
        for cell in self.keyboard.cells() {
            draw_key(&mut self.out, cell, Color::Grey)?;
        }
        // hint for the letter that should have been pressed
        if let Some(cell) = scene.highlighted_key.and_then(|l| self.keyboard.cell(l)) {
            draw_key(&mut self.out, cell, Color::Red)?;
        }
        Ok(())
    }

    fn draw_particles(&mut self, scene: &Scene) -> std::io::Result<()> {
        for particle in &scene.particles {
            let (x, y) = (particle.x as u16, particle.y as u16);
            if x >= self.width || y >= self.height {
                continue;
            }
            queue!(
                self.out,
                cursor::MoveTo(x, y),
                SetForegroundColor(Color::AnsiValue(particle.color)),
                Print(particle.glyph),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn print_centered(&mut self, row: u16, text: &str, color: Color) -> std::io::Result<()> {
        let column = center_column(self.width, text);
        queue!(
            self.out,
            cursor::MoveTo(column, row),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&mut self) -> std::io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.out,
            DisableMouseCapture,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}

/// Blank every row in place
fn clear_rows(out: &mut impl Write, height: u16) -> std::io::Result<()> {
    for row in 0..height {
        queue!(out, cursor::MoveTo(0, row), terminal::Clear(ClearType::CurrentLine))?;
    }
    Ok(())
}

fn draw_key(out: &mut impl Write, cell: &KeyCell, color: Color) -> std::io::Result<()> {
    queue!(
        out,
        cursor::MoveTo(cell.column, cell.row),
        SetForegroundColor(color),
        Print(format!("[{}]", cell.letter.upper())),
        ResetColor
    )
}

/// Column that centres `text` in a terminal `width` wide (display width aware)
pub fn center_column(width: u16, text: &str) -> u16 {
    let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    width.saturating_sub(text_width) / 2
}

/// `[██████░░░░]`-style bar for a 0.0-1.0 fraction
pub fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Rows the letter is lifted during its entrance bounce
fn bounce_offset(progress: f32) -> u16 {
    let height = (1.0 - progress) * (progress * std::f32::consts::PI).sin() * 3.0;
    height.max(0.0).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 10), format!("[{}]", "░".repeat(10)));
        assert_eq!(progress_bar(1.0, 10), format!("[{}]", "█".repeat(10)));
        assert_eq!(
            progress_bar(0.4, 10),
            format!("[{}{}]", "█".repeat(4), "░".repeat(6))
        );
        assert_eq!(progress_bar(3.0, 4), format!("[{}]", "█".repeat(4)));
    }

    #[test]
    fn test_center_column_uses_display_width() {
        assert_eq!(center_column(20, "abcd"), 8);
        // CJK characters are two columns wide
        assert_eq!(center_column(20, "好棒"), 8);
        assert_eq!(center_column(2, "too wide"), 0);
    }

    #[test]
    fn test_clear_rows_blanks_lines_without_full_clear() {
        let mut out = Vec::new();
        clear_rows(&mut out, 3).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("\x1b[2K").count(), 3);
        assert!(!text.contains("\x1b[2J"));
        assert!(text.contains("\x1b[3;1H"));
    }

    #[test]
    fn test_bounce_starts_and_ends_on_baseline() {
        assert_eq!(bounce_offset(0.0), 0);
        assert_eq!(bounce_offset(1.0), 0);
        assert!(bounce_offset(0.3) > 0);
    }
}
