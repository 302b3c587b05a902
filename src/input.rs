use crate::params::{Params, PatternKind, Species};
use crate::palette;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    Quit,
    TogglePause,
    Reset,
    ResetNoisy,
    NextPreset,
    NextPalette,
    NextMode,
    ToggleInvert,
    ToggleField,
    Pattern(PatternKind),
    Feed(f32),
    Kill(f32),
    Steps(i32),
    Contrast(f32),
    Gain(f32),
    Offset(f32),
    Zoom(i32),
    Snapshot,
}

pub(crate) fn collect_actions(timeout: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                if let Some(a) = map_key(k.code, k.modifiers) {
                    out.push(a);
                }
            }
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_key(code: KeyCode, mods: KeyModifiers) -> Option<Action> {
    let coarse = mods.contains(KeyModifiers::SHIFT);
    let fk = if coarse { 0.002 } else { 0.0005 };
    match code {
        KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('R') => Some(Action::ResetNoisy),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::NextPreset),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::NextPalette),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Action::NextMode),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(Action::ToggleInvert),
        KeyCode::Char('u') | KeyCode::Char('U') => Some(Action::ToggleField),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(Action::Pattern(PatternKind::Noise)),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::Pattern(PatternKind::Fractal)),
        KeyCode::Up => Some(Action::Feed(fk)),
        KeyCode::Down => Some(Action::Feed(-fk)),
        KeyCode::Right => Some(Action::Kill(fk)),
        KeyCode::Left => Some(Action::Kill(-fk)),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::Steps(1)),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::Steps(-1)),
        KeyCode::Char(']') => Some(Action::Contrast(0.1)),
        KeyCode::Char('[') => Some(Action::Contrast(-0.1)),
        KeyCode::Char('\'') => Some(Action::Gain(0.1)),
        KeyCode::Char(';') => Some(Action::Gain(-0.1)),
        KeyCode::Char('.') => Some(Action::Offset(0.02)),
        KeyCode::Char(',') => Some(Action::Offset(-0.02)),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Action::Zoom(10)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Action::Zoom(-10)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Snapshot),
        _ => None,
    }
}

/// Applies the actions that only touch parameters. Returns false for the
/// ones the caller has to handle.
pub(crate) fn apply_to_params(action: Action, p: &mut Params) -> bool {
    let c = &mut p.sim.coeffs;
    let r = &mut p.render;
    match action {
        Action::Feed(d) => c.feed = (c.feed + d).clamp(0.0, 0.1),
        Action::Kill(d) => c.kill = (c.kill + d).clamp(0.0, 0.1),
        Action::Steps(d) => {
            p.sim.steps_per_frame = p.sim.steps_per_frame.saturating_add_signed(d).clamp(1, 50)
        }
        Action::Zoom(d) => {
            p.sim.zoom_percent = p.sim.zoom_percent.saturating_add_signed(d).clamp(40, 640)
        }
        Action::Contrast(d) => r.contrast = (r.contrast + d).clamp(0.1, 5.0),
        Action::Gain(d) => r.gain = (r.gain + d).clamp(0.1, 5.0),
        Action::Offset(d) => r.offset = (r.offset + d).clamp(-1.0, 1.0),
        Action::NextPalette => r.palette = palette::next_id(&r.palette).to_string(),
        Action::NextMode => r.mode = r.mode.next(),
        Action::ToggleInvert => r.invert = !r.invert,
        Action::ToggleField => {
            r.field = match r.field {
                Species::U => Species::V,
                Species::V => Species::U,
            }
        }
        _ => return false,
    }
    true
}
