use serde::{Deserialize, Serialize};

pub const UNDERGRAD_GRADES: [&str; 5] = ["1年生", "2年生", "3年生", "4年生", "4年助産"];
pub const GRADUATE_GRADES: [&str; 4] = ["M1", "M2", "D1", "D2/D3"];

/// Weekday names indexed by `num_days_from_sunday`.
pub const WEEKDAY_NAMES: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

pub const PERIODS: std::ops::RangeInclusive<u8> = 1..=5;

/// Undergraduate grades first, then graduate grades.
pub fn all_grades() -> impl Iterator<Item = &'static str> {
    UNDERGRAD_GRADES
        .iter()
        .chain(GRADUATE_GRADES.iter())
        .copied()
}

/// Resolves a raw grade label to its entry in the grade universe.
/// Matching is exact; "m1" is not "M1".
pub fn canonical_grade(raw: &str) -> Option<&'static str> {
    all_grades().find(|g| *g == raw)
}

pub fn first_grade() -> &'static str {
    UNDERGRAD_GRADES[0]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Day,
    Week,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Day => "day",
            Mode::Week => "week",
        }
    }

    /// Case-insensitive; anything other than "day"/"week" is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Mode::Day),
            "week" => Some(Mode::Week),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Undergrad,
    Graduate,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Undergrad => "undergrad",
            Target::Graduate => "graduate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "undergrad" => Some(Target::Undergrad),
            "graduate" => Some(Target::Graduate),
            _ => None,
        }
    }

    pub fn grades(self) -> &'static [&'static str] {
        match self {
            Target::Undergrad => &UNDERGRAD_GRADES,
            Target::Graduate => &GRADUATE_GRADES,
        }
    }

    /// Label shown on the day-mode dropdown toggle.
    pub fn label(self) -> &'static str {
        match self {
            Target::Undergrad => "学部",
            Target::Graduate => "研究課程部",
        }
    }
}
