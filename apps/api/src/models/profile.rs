use serde::{Deserialize, Serialize};

/// Answers collected during onboarding. Every field is optional; unknown
/// values are ignored by the task generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingProfile {
    pub main_goals: Vec<String>,
    pub role: Option<String>,
    pub age_group: Option<String>,
    pub neurodiversity_types: Vec<String>,
    pub sensory_preferences: Vec<String>,
}
