//! Input scanner - samples the six digital input lines.
//!
//! Lines are active-low with pull-ups: a line is active when its pin
//! reads low. Every scan is a fresh, unfiltered sample; there is no
//! debouncing and no memory of earlier scans.

use crate::config::LINE_COUNT;
use embedded_hal::digital::InputPin;

/// One physical input line. The discriminant is the line index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InputLine {
    Line0 = 0,
    Line1 = 1,
    Line2 = 2,
    Line3 = 3,
    Line4 = 4,
    Line5 = 5,
}

impl InputLine {
    /// Every line, in index order.
    pub const ALL: [InputLine; LINE_COUNT] = [
        InputLine::Line0,
        InputLine::Line1,
        InputLine::Line2,
        InputLine::Line3,
        InputLine::Line4,
        InputLine::Line5,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// The set of lines found active during one scan.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveLines(u8);

impl ActiveLines {
    pub const NONE: ActiveLines = ActiveLines(0);

    pub fn from_lines(lines: &[InputLine]) -> Self {
        let mut set = Self::NONE;
        for &line in lines {
            set.insert(line);
        }
        set
    }

    pub fn insert(&mut self, line: InputLine) {
        self.0 |= line.mask();
    }

    pub fn contains(self, line: InputLine) -> bool {
        self.0 & line.mask() != 0
    }

    /// `true` if at least one line is active.
    pub fn any(self) -> bool {
        self.0 != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Bitmask with bit N set for active line N.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Active lines in index order.
    pub fn iter(self) -> impl Iterator<Item = InputLine> {
        InputLine::ALL.into_iter().filter(move |&line| self.contains(line))
    }
}

/// Samples a fixed array of input pins, one per [`InputLine`].
pub struct InputScanner<P> {
    pins: [P; LINE_COUNT],
}

impl<P: InputPin> InputScanner<P> {
    /// `pins[n]` is wired to line `n`.
    pub fn new(pins: [P; LINE_COUNT]) -> Self {
        Self { pins }
    }

    /// Read every line once.
    ///
    /// A pin that fails to read is treated as released.
    pub fn scan(&mut self) -> ActiveLines {
        let mut active = ActiveLines::NONE;
        for (line, pin) in InputLine::ALL.into_iter().zip(self.pins.iter_mut()) {
            if pin.is_low().unwrap_or(false) {
                active.insert(line);
            }
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Pin stub reporting a fixed level.
    struct Level(bool);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl InputPin for Level {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    fn levels(high: [bool; LINE_COUNT]) -> InputScanner<Level> {
        InputScanner::new(high.map(Level))
    }

    #[test]
    fn all_high_means_nothing_active() {
        let mut scanner = levels([true; LINE_COUNT]);
        assert_eq!(scanner.scan(), ActiveLines::NONE);
        assert!(!scanner.scan().any());
    }

    #[test]
    fn line_is_active_iff_its_pin_reads_low() {
        for line in InputLine::ALL {
            let mut high = [true; LINE_COUNT];
            high[line.index()] = false;
            let active = levels(high).scan();

            for other in InputLine::ALL {
                assert_eq!(active.contains(other), other == line);
            }
        }
    }

    #[test]
    fn several_low_pins_are_all_reported() {
        let mut scanner = levels([false, true, true, false, true, false]);
        let active = scanner.scan();
        assert_eq!(active.bits(), 0b101001);
        assert_eq!(active.count(), 3);
        let lines: Vec<InputLine> = active.iter().collect();
        assert_eq!(lines, vec![InputLine::Line0, InputLine::Line3, InputLine::Line5]);
    }

    #[test]
    fn from_lines_matches_insert() {
        let set = ActiveLines::from_lines(&[InputLine::Line4, InputLine::Line1]);
        assert!(set.contains(InputLine::Line1));
        assert!(set.contains(InputLine::Line4));
        assert!(!set.contains(InputLine::Line0));
        assert_eq!(set.bits(), 0b010010);
    }

    #[test]
    fn line_index_matches_discriminant() {
        for (i, line) in InputLine::ALL.iter().enumerate() {
            assert_eq!(line.index(), i);
        }
    }
}
