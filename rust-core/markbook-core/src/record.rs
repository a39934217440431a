// SPDX-License-Identifier: PMPL-1.0-or-later
//! The record type: one student row, plus grade-band classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MarkbookError;

/// Lowest admissible mark.
pub const MIN_MARK: f64 = 0.0;
/// Highest admissible mark.
pub const MAX_MARK: f64 = 100.0;

/// One student entry.
///
/// The `id` is the immutable identity key; it is never reassigned by an
/// update. Marks are constrained to `[MIN_MARK, MAX_MARK]` and rendered
/// with two decimal places everywhere (display and snapshot format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub programme: String,
    pub mark: f64,
}

impl Record {
    pub fn new(id: u32, name: impl Into<String>, programme: impl Into<String>, mark: f64) -> Self {
        Self {
            id,
            name: name.into(),
            programme: programme.into(),
            mark,
        }
    }

    /// Check the record invariants: positive id, non-empty name and
    /// programme, finite mark within `[MIN_MARK, MAX_MARK]`.
    pub fn validate(&self) -> Result<(), MarkbookError> {
        if self.id == 0 {
            return Err(MarkbookError::InvalidId);
        }
        if self.name.trim().is_empty() {
            return Err(MarkbookError::MissingField("NAME".into()));
        }
        if self.programme.trim().is_empty() {
            return Err(MarkbookError::MissingField("PROGRAMME".into()));
        }
        if !self.mark.is_finite() || !(MIN_MARK..=MAX_MARK).contains(&self.mark) {
            return Err(MarkbookError::InvalidMark);
        }
        Ok(())
    }

    /// The grade band this record's mark falls into.
    pub fn grade_band(&self) -> GradeBand {
        GradeBand::of(self.mark)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{:.2}",
            self.id, self.name, self.programme, self.mark
        )
    }
}

/// Classification of a mark into one of five fixed bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    F,
}

impl GradeBand {
    /// Band thresholds: A >= 80, B >= 70, C >= 60, D >= 50, F below.
    pub fn of(mark: f64) -> Self {
        if mark >= 80.0 {
            GradeBand::A
        } else if mark >= 70.0 {
            GradeBand::B
        } else if mark >= 60.0 {
            GradeBand::C
        } else if mark >= 50.0 {
            GradeBand::D
        } else {
            GradeBand::F
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            GradeBand::A => "A",
            GradeBand::B => "B",
            GradeBand::C => "C",
            GradeBand::D => "D",
            GradeBand::F => "F",
        };
        write!(f, "{letter}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record_passes() {
        let r = Record::new(2401234, "Michelle Lee", "Information Security", 73.2);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_zero_id_rejected() {
        let r = Record::new(0, "Someone", "CS", 50.0);
        assert!(matches!(r.validate(), Err(MarkbookError::InvalidId)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let r = Record::new(1, "   ", "CS", 50.0);
        assert!(matches!(r.validate(), Err(MarkbookError::MissingField(_))));
    }

    #[test]
    fn test_mark_out_of_range_rejected() {
        for mark in [-0.1, 100.1, f64::NAN, f64::INFINITY] {
            let r = Record::new(1, "Ann", "CS", mark);
            assert!(matches!(r.validate(), Err(MarkbookError::InvalidMark)));
        }
    }

    #[test]
    fn test_mark_boundaries_accepted() {
        for mark in [0.0, 100.0] {
            let r = Record::new(1, "Ann", "CS", mark);
            assert!(r.validate().is_ok());
        }
    }

    #[test]
    fn test_grade_band_thresholds() {
        assert_eq!(GradeBand::of(80.0), GradeBand::A);
        assert_eq!(GradeBand::of(79.99), GradeBand::B);
        assert_eq!(GradeBand::of(70.0), GradeBand::B);
        assert_eq!(GradeBand::of(69.99), GradeBand::C);
        assert_eq!(GradeBand::of(60.0), GradeBand::C);
        assert_eq!(GradeBand::of(59.99), GradeBand::D);
        assert_eq!(GradeBand::of(50.0), GradeBand::D);
        assert_eq!(GradeBand::of(49.99), GradeBand::F);
        assert_eq!(GradeBand::of(0.0), GradeBand::F);
    }
}
