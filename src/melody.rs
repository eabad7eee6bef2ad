//! The fixed note sequence the game is played on.

use crate::config::REFERENCE_MELODY;
use crate::types::Note;
use heapless::Vec;

/// Melody validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MelodyError {
    /// No notes provided.
    Empty,

    /// An index outside 1..=6.
    InvalidNote {
        /// Position of the offending entry.
        position: usize,
        /// The value found there.
        index: u8,
    },

    /// Melody capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for MelodyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MelodyError::Empty => write!(f, "melody must have at least one note"),
            MelodyError::InvalidNote { position, index } => {
                write!(
                    f,
                    "note index {} at position {} is outside 1..=6",
                    index, position
                )
            }
            MelodyError::CapacityExceeded => write!(f, "melody capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MelodyError {}

/// An immutable, non-empty sequence of notes.
///
/// Round `turn` of the game asks for the prefix `notes[..=turn]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Melody<'a> {
    notes: &'a [Note],
}

impl<'a> Melody<'a> {
    /// Wraps a note slice.
    ///
    /// # Errors
    /// * `Empty` - The slice has no notes
    pub fn new(notes: &'a [Note]) -> Result<Self, MelodyError> {
        if notes.is_empty() {
            return Err(MelodyError::Empty);
        }
        Ok(Self { notes })
    }

    /// Number of notes, which is also the number of rounds to win.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Note at `position`, if any.
    pub fn get(&self, position: usize) -> Option<Note> {
        self.notes.get(position).copied()
    }

    /// All notes in order.
    pub fn notes(&self) -> &'a [Note] {
        self.notes
    }
}

impl Melody<'static> {
    /// The built-in fifteen-note melody.
    pub const fn reference() -> Self {
        Self {
            notes: &REFERENCE_MELODY,
        }
    }
}

/// Converts one-based note indices (1=C .. 6=A) into notes.
///
/// # Errors
/// * `Empty` - No indices were given
/// * `InvalidNote` - An index is outside 1..=6
/// * `CapacityExceeded` - More than `N` indices
pub fn parse_indices<const N: usize>(indices: &[u8]) -> Result<Vec<Note, N>, MelodyError> {
    if indices.is_empty() {
        return Err(MelodyError::Empty);
    }

    let mut notes = Vec::new();
    for (position, &index) in indices.iter().enumerate() {
        let note = Note::from_index(index).ok_or(MelodyError::InvalidNote { position, index })?;
        notes
            .push(note)
            .map_err(|_| MelodyError::CapacityExceeded)?;
    }
    Ok(notes)
}
