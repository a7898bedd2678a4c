use serde::{Deserialize, Serialize};

/// Looping list of exercise names with a rotation cursor.
///
/// The cursor only moves through [`ExerciseSchedule::advance`], which the
/// engine calls once per finished rest interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSchedule {
    exercises: Vec<String>,
    #[serde(default)]
    cursor: usize,
}

impl ExerciseSchedule {
    pub fn new<I, S>(exercises: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exercises: clean(exercises),
            cursor: 0,
        }
    }

    /// Parse editor text: one exercise per line, trimmed, blank lines dropped.
    pub fn parse(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn exercises(&self) -> &[String] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&str> {
        self.exercises.get(self.cursor).map(String::as_str)
    }

    /// The exercise after the current one.
    ///
    /// `None` for an empty list and for a single-entry list, which has no
    /// distinct next exercise.
    pub fn next(&self) -> Option<&str> {
        if self.exercises.len() < 2 {
            return None;
        }
        let next = (self.cursor + 1) % self.exercises.len();
        self.exercises.get(next).map(String::as_str)
    }

    /// Move the cursor one step, wrapping at the end. No-op when empty.
    pub fn advance(&mut self) {
        if !self.exercises.is_empty() {
            self.cursor = (self.cursor + 1) % self.exercises.len();
        }
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Swap in a new list, keeping the cursor when it still points at an
    /// entry and falling back to 0 otherwise.
    pub fn replace<I, S>(&mut self, exercises: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exercises = clean(exercises);
        if self.cursor >= self.exercises.len() {
            self.cursor = 0;
        }
    }

    pub fn clear(&mut self) {
        self.exercises.clear();
        self.cursor = 0;
    }
}

fn clean<I, S>(exercises: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    exercises
        .into_iter()
        .map(Into::into)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schedule_has_no_current_or_next() {
        let s = ExerciseSchedule::default();
        assert!(s.is_empty());
        assert_eq!(s.current(), None);
        assert_eq!(s.next(), None);
    }

    #[test]
    fn single_entry_has_no_next() {
        let mut s = ExerciseSchedule::new(["Burpees"]);
        assert_eq!(s.current(), Some("Burpees"));
        assert_eq!(s.next(), None);
        s.advance();
        assert_eq!(s.current(), Some("Burpees"));
        assert_eq!(s.next(), None);
    }

    #[test]
    fn advance_wraps_around() {
        let mut s = ExerciseSchedule::new(["Squats", "Push-ups", "Plank"]);
        assert_eq!(s.next(), Some("Push-ups"));
        s.advance();
        s.advance();
        assert_eq!(s.current(), Some("Plank"));
        assert_eq!(s.next(), Some("Squats"));
        s.advance();
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn parse_trims_and_drops_blank_lines() {
        let s = ExerciseSchedule::parse("  Jumping Jacks \n\n\tLunges\n   \nMountain Climbers");
        assert_eq!(
            s.exercises(),
            &["Jumping Jacks", "Lunges", "Mountain Climbers"]
        );
    }

    #[test]
    fn replace_with_shorter_list_resets_out_of_range_cursor() {
        let mut s = ExerciseSchedule::new(["a", "b", "c", "d", "e", "f"]);
        for _ in 0..5 {
            s.advance();
        }
        assert_eq!(s.cursor(), 5);
        s.replace(["x", "y", "z"]);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.current(), Some("x"));
    }

    #[test]
    fn replace_keeps_cursor_in_range() {
        let mut s = ExerciseSchedule::new(["a", "b", "c"]);
        s.advance();
        s.replace(["x", "y", "z", "w"]);
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.current(), Some("y"));
    }

    #[test]
    fn clear_empties_and_rewinds() {
        let mut s = ExerciseSchedule::new(["a", "b"]);
        s.advance();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.cursor(), 0);
    }
}
