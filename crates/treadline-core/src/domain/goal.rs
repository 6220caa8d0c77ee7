use crate::domain::ids::GoalId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const MIN_GOAL_YEAR: i32 = 2000;
pub const MAX_GOAL_YEAR: i32 = 2100;

/// Monthly lead and conversion targets, unique per `(month, year)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionGoal {
    pub id: GoalId,
    pub month: u32,
    pub year: i32,
    pub target_leads: i64,
    pub target_conversions: i64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ConversionGoal {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_goal_period(self.month, self.year)?;
        for target in [self.target_leads, self.target_conversions] {
            if target < 0 {
                return Err(CoreError::InvalidGoalTarget(target));
            }
        }
        Ok(())
    }

    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

pub fn validate_goal_period(month: u32, year: i32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidGoalMonth(month));
    }
    if !(MIN_GOAL_YEAR..=MAX_GOAL_YEAR).contains(&year) {
        return Err(CoreError::InvalidGoalYear(year));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_goal_period, ConversionGoal};
    use crate::domain::GoalId;
    use crate::error::CoreError;

    #[test]
    fn validate_goal_period_bounds() {
        assert!(validate_goal_period(1, 2025).is_ok());
        assert_eq!(
            validate_goal_period(13, 2025),
            Err(CoreError::InvalidGoalMonth(13))
        );
        assert_eq!(
            validate_goal_period(0, 2025),
            Err(CoreError::InvalidGoalMonth(0))
        );
        assert_eq!(
            validate_goal_period(5, 1999),
            Err(CoreError::InvalidGoalYear(1999))
        );
    }

    #[test]
    fn negative_targets_are_rejected() {
        let goal = ConversionGoal {
            id: GoalId::new(),
            month: 3,
            year: 2025,
            target_leads: 40,
            target_conversions: -1,
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(goal.validate(), Err(CoreError::InvalidGoalTarget(-1)));
        assert_eq!(goal.period_label(), "2025-03");
    }
}
