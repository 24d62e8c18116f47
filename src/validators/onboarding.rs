//! The multi-step onboarding form.

use std::fmt;

use crate::api::{Gender, GoalType, ProfileData, ProfileUpdateRequest};

use super::profile::{parse_age, parse_positive, DEFAULT_ACTIVITY_LEVEL};
use super::{validate_activity_level, validate_name, FieldErrors, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Personal,
    Physical,
    Activity,
    Goals,
    Complete,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 6] = [
        Self::Welcome,
        Self::Personal,
        Self::Physical,
        Self::Activity,
        Self::Goals,
        Self::Complete,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Personal => "personal",
            Self::Physical => "physical",
            Self::Activity => "activity",
            Self::Goals => "goals",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the onboarding screens collect. Numeric fields hold the raw
/// text the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    pub first_name: String,
    pub last_name: String,
    pub weight: String,
    pub height: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub activity_level: f64,
    pub fitness_goal: Option<GoalType>,
}

impl Default for OnboardingForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            weight: String::new(),
            height: String::new(),
            age: String::new(),
            gender: None,
            activity_level: DEFAULT_ACTIVITY_LEVEL,
            fitness_goal: None,
        }
    }
}

/// A fully validated form, ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingSubmission {
    pub profile: ProfileUpdateRequest,
    pub profile_data: ProfileData,
    pub goal_type: GoalType,
}

impl OnboardingForm {
    /// Validates the fields shown on `step`. Steps without inputs always
    /// pass.
    pub fn validate_step(&self, step: OnboardingStep) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        match step {
            OnboardingStep::Personal => {
                errors.check("first_name", validate_name(&self.first_name));
                errors.check("last_name", validate_name(&self.last_name));
            }
            OnboardingStep::Physical => {
                errors.check("weight", parse_positive(&self.weight).map(drop));
                errors.check("height", parse_positive(&self.height).map(drop));
                errors.check("age", parse_age(&self.age).map(drop));
                if self.gender.is_none() {
                    errors.insert("gender", ValidationError::InvalidChoice);
                }
            }
            OnboardingStep::Activity => {
                errors.check("activity_level", validate_activity_level(self.activity_level));
            }
            OnboardingStep::Goals => {
                if self.fitness_goal.is_none() {
                    errors.insert("fitness_goal", ValidationError::InvalidChoice);
                }
            }
            OnboardingStep::Welcome | OnboardingStep::Complete => {}
        }

        errors.into_result()
    }

    /// Validates every step and builds the submission.
    pub fn validate(&self) -> Result<OnboardingSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();
        for step in OnboardingStep::ALL {
            if let Err(step_errors) = self.validate_step(step) {
                errors.merge(step_errors);
            }
        }
        errors.into_result()?;

        let mut errors = FieldErrors::new();
        let weight = parse_positive(&self.weight).map_err(|e| errors.insert("weight", e));
        let height = parse_positive(&self.height).map_err(|e| errors.insert("height", e));
        let age = parse_age(&self.age).map_err(|e| errors.insert("age", e));
        let (Ok(weight), Ok(height), Ok(age), Some(gender), Some(goal_type)) =
            (weight, height, age, self.gender, self.fitness_goal)
        else {
            return Err(errors);
        };

        Ok(OnboardingSubmission {
            profile: ProfileUpdateRequest {
                first_name: Some(self.first_name.trim().to_owned()),
                last_name: Some(self.last_name.trim().to_owned()),
                weight: Some(weight),
                height: Some(height),
                age: Some(age),
                gender: Some(gender),
                activity_level: Some(self.activity_level),
            },
            profile_data: ProfileData {
                weight,
                height,
                age,
                gender,
                activity_level: self.activity_level,
            },
            goal_type,
        })
    }
}

/// Step-by-step walk through the onboarding screens. Moving forward
/// validates the current step; moving back never does.
#[derive(Debug, Clone, Default)]
pub struct OnboardingFlow {
    step: OnboardingStep,
    form: OnboardingForm,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn form(&self) -> &OnboardingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut OnboardingForm {
        &mut self.form
    }

    /// Advances one step if the current one validates. Stays on
    /// `Complete` once there.
    pub fn next(&mut self) -> Result<OnboardingStep, FieldErrors> {
        self.form.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn prev(&mut self) -> OnboardingStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step == OnboardingStep::Complete
    }

    pub fn into_form(self) -> OnboardingForm {
        self.form
    }
}
