//! Morse symbol table and element decoder
//!
//! Each supported character maps to a packed code: the low `length` bits of
//! `code`, read most significant first, spell the character. A set bit is a
//! dit and a clear bit is a dah (see [`SymbolEntry::element_at`]).
//!
//! The alphabet is the fixed beacon subset: lowercase letters except
//! g, v, x and z, the digits, `/` and the word space.

use crate::config::{
    DAH_UNITS, DIT_UNITS, ELEMENT_GAP_UNITS, LETTER_SPACE_UNITS, WORD_SPACE_UNITS,
};

/// One keying step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Element {
    /// Short tone followed by an element gap
    Dit,
    /// Long tone followed by an element gap
    Dah,
    /// Silence closing a letter (stacks on the last element gap)
    LetterSpace,
    /// Silence standing for a space character
    WordSpace,
}

impl Element {
    /// Key-down time in units
    #[must_use]
    pub const fn on_units(self) -> u32 {
        match self {
            Self::Dit => DIT_UNITS,
            Self::Dah => DAH_UNITS,
            Self::LetterSpace | Self::WordSpace => 0,
        }
    }

    /// Key-up time in units
    #[must_use]
    pub const fn off_units(self) -> u32 {
        match self {
            Self::Dit | Self::Dah => ELEMENT_GAP_UNITS,
            Self::LetterSpace => LETTER_SPACE_UNITS,
            Self::WordSpace => WORD_SPACE_UNITS,
        }
    }

    /// Total duration in units
    #[must_use]
    pub const fn units(self) -> u32 {
        self.on_units() + self.off_units()
    }

    /// Check if this element produces a tone
    #[must_use]
    pub const fn is_tone(self) -> bool {
        matches!(self, Self::Dit | Self::Dah)
    }
}

/// Packed Morse code for one character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct SymbolEntry {
    /// ASCII character
    pub character: u8,
    /// Element bits, only the low `length` bits are significant
    pub code: u8,
    /// Number of elements (0 for the word space)
    pub length: u8,
}

impl SymbolEntry {
    /// Longest code in the table
    pub const MAX_LENGTH: u8 = 5;

    const fn new(character: u8, code: u8, length: u8) -> Self {
        Self {
            character,
            code,
            length,
        }
    }

    /// Check for the word-space sentinel
    #[must_use]
    pub const fn is_word_space(&self) -> bool {
        self.length == 0
    }

    /// Element at bit position `bit` (0 = last element sent)
    ///
    /// The table is inverted relative to the usual "1 = dah" packing: a set
    /// bit keys a dit and a clear bit keys a dah. Every code in
    /// [`SYMBOL_TABLE`] depends on this, so do not flip it.
    #[must_use]
    pub const fn element_at(&self, bit: u8) -> Element {
        if self.code & (1 << bit) != 0 {
            Element::Dit
        } else {
            Element::Dah
        }
    }

    /// Decode into the element sequence the keyer plays
    #[must_use]
    pub const fn elements(&self) -> MorseEncoder {
        MorseEncoder::for_entry(*self)
    }
}

/// Character table, scanned linearly by [`lookup`]
pub static SYMBOL_TABLE: [SymbolEntry; 34] = [
    SymbolEntry::new(b'a', 0x06, 2),
    SymbolEntry::new(b'b', 0x17, 4),
    SymbolEntry::new(b'c', 0x15, 4),
    SymbolEntry::new(b'd', 0x0b, 3),
    SymbolEntry::new(b'e', 0x03, 1),
    SymbolEntry::new(b'f', 0x1d, 4),
    SymbolEntry::new(b'h', 0x1f, 4),
    SymbolEntry::new(b'i', 0x07, 2),
    SymbolEntry::new(b'j', 0x18, 4),
    SymbolEntry::new(b'k', 0x0a, 3),
    SymbolEntry::new(b'l', 0x1b, 4),
    SymbolEntry::new(b'm', 0x04, 2),
    SymbolEntry::new(b'n', 0x05, 2),
    SymbolEntry::new(b'o', 0x08, 3),
    SymbolEntry::new(b'p', 0x19, 4),
    SymbolEntry::new(b'q', 0x12, 4),
    SymbolEntry::new(b'r', 0x0d, 3),
    SymbolEntry::new(b's', 0x0f, 3),
    SymbolEntry::new(b't', 0x02, 1),
    SymbolEntry::new(b'u', 0x0e, 3),
    SymbolEntry::new(b'w', 0x0c, 3),
    SymbolEntry::new(b'y', 0x14, 4),
    SymbolEntry::new(b'/', 0x2d, 5),
    SymbolEntry::new(b'0', 0x20, 5),
    SymbolEntry::new(b'1', 0x30, 5),
    SymbolEntry::new(b'2', 0x38, 5),
    SymbolEntry::new(b'3', 0x3c, 5),
    SymbolEntry::new(b'4', 0x3e, 5),
    SymbolEntry::new(b'5', 0x3f, 5),
    SymbolEntry::new(b'6', 0x2f, 5),
    SymbolEntry::new(b'7', 0x27, 5),
    SymbolEntry::new(b'8', 0x23, 5),
    SymbolEntry::new(b'9', 0x21, 5),
    SymbolEntry::new(b' ', 0x00, 0),
];

/// Find the table entry for `c`
///
/// Case-sensitive: only lowercase letters are present.
#[must_use]
pub fn lookup(c: char) -> Option<&'static SymbolEntry> {
    if !c.is_ascii() {
        return None;
    }
    let byte = c as u8;
    SYMBOL_TABLE.iter().find(|entry| entry.character == byte)
}

/// Element sequence for one character
///
/// Yields the character's dits and dahs followed by a single
/// [`Element::LetterSpace`], or a single [`Element::WordSpace`] for the
/// space character.
#[derive(Clone, Debug)]
pub struct MorseEncoder {
    entry: Option<SymbolEntry>,
    /// Bits still to send
    remaining: u8,
}

impl MorseEncoder {
    /// Create an idle encoder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entry: None,
            remaining: 0,
        }
    }

    const fn for_entry(entry: SymbolEntry) -> Self {
        Self {
            entry: Some(entry),
            remaining: entry.length,
        }
    }

    /// Load a character to send; unsupported characters leave the encoder idle
    pub fn load(&mut self, c: char) {
        *self = lookup(c).map_or(Self::new(), |entry| Self::for_entry(*entry));
    }

    /// Check if encoder is idle
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.entry.is_none()
    }

    /// Get next element to send
    pub fn next_element(&mut self) -> Option<Element> {
        let entry = self.entry?;

        if entry.is_word_space() {
            self.entry = None;
            return Some(Element::WordSpace);
        }

        if self.remaining == 0 {
            self.entry = None;
            return Some(Element::LetterSpace);
        }

        self.remaining -= 1;
        Some(entry.element_at(self.remaining))
    }
}

impl Default for MorseEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for MorseEncoder {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        self.next_element()
    }
}
