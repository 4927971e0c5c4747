//! A predetermined dice sequence for reproducing exact scenarios.

use super::{DiceSource, SIDES};

/// Replays a fixed list of faces in order, wrapping around when exhausted.
///
/// Faces are clamped into `1..=6`. An empty script always yields 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a script from the given faces.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().map(|f| f.clamp(1, SIDES)).collect(),
            cursor: 0,
        }
    }

    /// Append `count` copies of `face` to the script.
    pub fn then(mut self, face: u32, count: usize) -> Self {
        self.faces
            .extend(std::iter::repeat_n(face.clamp(1, SIDES), count));
        self
    }

    /// Faces not yet consumed before the script wraps.
    pub fn remaining(&self) -> usize {
        self.faces.len().saturating_sub(self.cursor)
    }
}

impl DiceSource for ScriptedDice {
    fn d6(&mut self) -> u32 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_and_wraps() {
        let mut dice = ScriptedDice::new([2, 5]);
        assert_eq!(dice.d6(), 2);
        assert_eq!(dice.d6(), 5);
        assert_eq!(dice.remaining(), 0);
        assert_eq!(dice.d6(), 2);
    }

    #[test]
    fn clamps_faces() {
        let mut dice = ScriptedDice::new([0, 9]);
        assert_eq!(dice.d6(), 1);
        assert_eq!(dice.d6(), 6);
    }

    #[test]
    fn builder_appends() {
        let mut dice = ScriptedDice::default().then(6, 2).then(1, 1);
        assert_eq!(dice.remaining(), 3);
        assert_eq!((dice.d6(), dice.d6(), dice.d6()), (6, 6, 1));
    }

    #[test]
    fn empty_script_yields_one() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.d6(), 1);
    }
}
