// Task catalog: onboarding profile -> starter life-skills tasks.

pub mod catalog;
pub mod handlers;
