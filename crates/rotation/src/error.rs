use chorebot_core::calendar::MonthKey;
use chorebot_core::error::CalendarError;
use thiserror::Error;

/// Rejections from the rotation engine. None of them mutate stored state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("Invalid roommate index {index}: must be between 0 and {}", .len - 1)]
    InvalidIndex { index: i64, len: usize },

    #[error("Unknown roommate: {0}")]
    InvalidRoommateName(String),

    #[error("Week {ordinal} does not exist in {month} ({weeks} weeks)")]
    InvalidWeek {
        month: MonthKey,
        ordinal: u32,
        weeks: usize,
    },

    #[error("No schedule has been generated for {0} yet")]
    MonthNotGenerated(MonthKey),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_index_names_range() {
        let err = RotationError::InvalidIndex { index: 3, len: 3 };
        assert_eq!(err.to_string(), "Invalid roommate index 3: must be between 0 and 2");
    }
}
