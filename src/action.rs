//! Action resolver - turns one scan into at most one HID action.
//!
//! The [`ButtonMapping`] table is ordered by priority. The first active
//! line in table order wins and every other active line is ignored for
//! that tick, so a held high-priority line starves the ones below it.

use crate::config::LINE_COUNT;
use crate::hid::keyboard::{keycode, modifier, KeyboardReport};
use crate::hid::mouse::{button, MouseReport};
use crate::hid::HidReport;
use crate::input::{ActiveLines, InputLine};

/// What a poll tick asks the host to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionKind {
    None,
    KeyboardKeys(KeyboardReport),
    MouseButtons(MouseReport),
}

impl ActionKind {
    pub fn is_none(&self) -> bool {
        matches!(self, ActionKind::None)
    }

    /// The report this action transmits, if any.
    pub fn report(&self) -> Option<HidReport> {
        match *self {
            ActionKind::None => None,
            ActionKind::KeyboardKeys(k) => Some(HidReport::Keyboard(k)),
            ActionKind::MouseButtons(m) => Some(HidReport::Mouse(m)),
        }
    }
}

/// One row of the mapping table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub line: InputLine,
    pub action: ActionKind,
}

impl Binding {
    pub const fn new(line: InputLine, action: ActionKind) -> Self {
        Self { line, action }
    }
}

/// Priority-ordered line → action table. Index 0 is the highest priority.
#[derive(Debug)]
pub struct ButtonMapping {
    bindings: [Binding; LINE_COUNT],
}

impl ButtonMapping {
    pub const fn new(bindings: [Binding; LINE_COUNT]) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Action of the highest-priority active line, or [`ActionKind::None`].
    pub fn resolve(&self, active: ActiveLines) -> ActionKind {
        self.bindings
            .iter()
            .find(|binding| active.contains(binding.line))
            .map_or(ActionKind::None, |binding| binding.action)
    }
}

/// Toggle-line-comment chord on line 4: Left Ctrl + Left Shift + 7.
const COMMENT_CHORD: KeyboardReport =
    KeyboardReport::with_key(modifier::LEFT_CTRL | modifier::LEFT_SHIFT, keycode::NUM_7);

/// The board's fixed mapping.
pub static BUTTON_MAPPING: ButtonMapping = ButtonMapping::new([
    Binding::new(InputLine::Line0, ActionKind::KeyboardKeys(KeyboardReport::with_key(0, keycode::B))),
    Binding::new(InputLine::Line1, ActionKind::KeyboardKeys(KeyboardReport::with_key(0, keycode::C))),
    Binding::new(InputLine::Line2, ActionKind::KeyboardKeys(KeyboardReport::with_key(0, keycode::D))),
    Binding::new(InputLine::Line3, ActionKind::MouseButtons(MouseReport::with_buttons(button::BACK))),
    Binding::new(InputLine::Line4, ActionKind::KeyboardKeys(COMMENT_CHORD)),
    Binding::new(InputLine::Line5, ActionKind::MouseButtons(MouseReport::with_buttons(button::FORWARD))),
]);

/// Resolve against [`BUTTON_MAPPING`].
pub fn resolve(active: ActiveLines) -> ActionKind {
    BUTTON_MAPPING.resolve(active)
}
