//! Task Catalog — maps an onboarding profile to a starter list of life-skills tasks.
//!
//! Pure and deterministic: the same profile always yields the same list in the
//! same order. Unknown categorical values contribute nothing; a profile that
//! matches nothing gets the generic wellness fallback.

use std::collections::HashSet;

use crate::models::profile::OnboardingProfile;
use crate::models::task::{Difficulty, Task};

/// Upper bound on the number of tasks handed to a user after onboarding.
pub const MAX_GENERATED_TASKS: usize = 15;

struct TaskTemplate {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    estimated_time: &'static str,
    tips: &'static [&'static str],
    xp: u32,
    difficulty: Difficulty,
}

impl TaskTemplate {
    fn to_task(&self) -> Task {
        Task {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            category: self.category.to_string(),
            estimated_time: self.estimated_time.to_string(),
            tips: self.tips.iter().map(|t| t.to_string()).collect(),
            xp: self.xp,
            difficulty: self.difficulty,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Goal templates (three tasks each: easy, medium, hard)
// ────────────────────────────────────────────────────────────────────────────

const GOAL_SELF_CARE: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-self-care-1",
        title: "Morning check-in",
        description: "Notice how your body and mind feel before starting the day.",
        category: "self-care",
        estimated_time: "5 minutes",
        tips: &["Rate your energy from 1 to 5", "Write one word for your mood"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-self-care-2",
        title: "Build a calm-down kit",
        description: "Gather a few items that help you feel settled when overwhelmed.",
        category: "self-care",
        estimated_time: "20 minutes",
        tips: &["Include something to hold", "Keep it somewhere easy to reach"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-self-care-3",
        title: "Plan a restful week",
        description: "Schedule recovery time around your busiest days.",
        category: "self-care",
        estimated_time: "45 minutes",
        tips: &["Block rest like an appointment", "Protect one evening with no plans"],
        xp: 70,
        difficulty: Difficulty::Hard,
    },
];

const GOAL_ORGANIZATION: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-organization-1",
        title: "Clear one surface",
        description: "Pick a single desk, shelf or counter and tidy only that.",
        category: "organization",
        estimated_time: "10 minutes",
        tips: &["Set a timer", "Stop when the timer ends"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-organization-2",
        title: "Set up a visual planner",
        description: "Create a weekly board with colours for each kind of activity.",
        category: "organization",
        estimated_time: "30 minutes",
        tips: &["Use no more than four colours", "Put it where you will see it daily"],
        xp: 45,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-organization-3",
        title: "Create a weekly reset routine",
        description: "Write a short checklist you run every week to reset your space and plans.",
        category: "organization",
        estimated_time: "1 hour",
        tips: &["Keep the list under ten items", "Pair it with music you enjoy"],
        xp: 75,
        difficulty: Difficulty::Hard,
    },
];

const GOAL_SOCIAL_SKILLS: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-social-1",
        title: "Send a friendly message",
        description: "Reach out to someone you trust with a short hello.",
        category: "social",
        estimated_time: "5 minutes",
        tips: &["A simple emoji counts", "No need to start a long chat"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-social-2",
        title: "Prepare conversation starters",
        description: "Write three questions you can use when meeting someone new.",
        category: "social",
        estimated_time: "15 minutes",
        tips: &["Ask about interests, not personal details", "Practise saying them aloud"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-social-3",
        title: "Join a small group activity",
        description: "Attend a club, class or online meetup built around something you enjoy.",
        category: "social",
        estimated_time: "1-2 hours",
        tips: &["Plan an exit time in advance", "Bring a comfort item"],
        xp: 80,
        difficulty: Difficulty::Hard,
    },
];

const GOAL_EMOTIONAL_REGULATION: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-emotions-1",
        title: "Name the feeling",
        description: "When a strong emotion shows up, pause and name it.",
        category: "emotional-wellbeing",
        estimated_time: "2 minutes",
        tips: &["Use a feelings wheel if words are hard"],
        xp: 15,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-emotions-2",
        title: "Practise box breathing",
        description: "Breathe in, hold, out and hold for four counts each, five times.",
        category: "emotional-wellbeing",
        estimated_time: "5 minutes",
        tips: &["Trace a square with your finger", "Try it when already calm first"],
        xp: 35,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-emotions-3",
        title: "Map your triggers",
        description: "List situations that overwhelm you and one coping step for each.",
        category: "emotional-wellbeing",
        estimated_time: "40 minutes",
        tips: &["Look back over the last two weeks", "Share the map with someone supportive"],
        xp: 70,
        difficulty: Difficulty::Hard,
    },
];

const GOAL_INDEPENDENT_LIVING: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-living-1",
        title: "Make a simple snack",
        description: "Prepare a snack that needs no cooking.",
        category: "daily-living",
        estimated_time: "10 minutes",
        tips: &["Lay out everything before starting"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-living-2",
        title: "Do one load of laundry",
        description: "Wash, dry and put away a single load from start to finish.",
        category: "daily-living",
        estimated_time: "2 hours (mostly waiting)",
        tips: &["Set phone reminders for each step", "Fold while listening to a podcast"],
        xp: 45,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-living-3",
        title: "Plan and shop for three meals",
        description: "Choose three meals, write a list and buy the ingredients.",
        category: "daily-living",
        estimated_time: "1.5 hours",
        tips: &["Shop at quieter times", "Use a list grouped by aisle"],
        xp: 80,
        difficulty: Difficulty::Hard,
    },
];

const GOAL_CAREER_GROWTH: &[TaskTemplate] = &[
    TaskTemplate {
        id: "goal-career-1",
        title: "List your strengths",
        description: "Write down five things you do well, at work or anywhere else.",
        category: "career",
        estimated_time: "10 minutes",
        tips: &["Special interests count as strengths"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "goal-career-2",
        title: "Update one section of your CV",
        description: "Refresh a single section instead of the whole document.",
        category: "career",
        estimated_time: "30 minutes",
        tips: &["Start with the easiest section", "Use plain, concrete wording"],
        xp: 45,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "goal-career-3",
        title: "Request an informational chat",
        description: "Ask someone in a field you like for a short conversation about their work.",
        category: "career",
        estimated_time: "1 hour",
        tips: &["Prepare your questions in writing", "Ask if a video or text chat works for them"],
        xp: 85,
        difficulty: Difficulty::Hard,
    },
];

fn goal_templates(goal: &str) -> &'static [TaskTemplate] {
    match goal {
        "self-care" => GOAL_SELF_CARE,
        "organization" | "organisation" => GOAL_ORGANIZATION,
        "social-skills" => GOAL_SOCIAL_SKILLS,
        "emotional-regulation" => GOAL_EMOTIONAL_REGULATION,
        "independent-living" => GOAL_INDEPENDENT_LIVING,
        "career-growth" => GOAL_CAREER_GROWTH,
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Role templates
// ────────────────────────────────────────────────────────────────────────────

const ROLE_STUDENT: &[TaskTemplate] = &[
    TaskTemplate {
        id: "role-student-1",
        title: "Pack your bag the night before",
        description: "Get tomorrow's materials ready before bed.",
        category: "organization",
        estimated_time: "10 minutes",
        tips: &["Keep a checklist taped inside the bag"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "role-student-2",
        title: "Break an assignment into steps",
        description: "Split your next assignment into small steps with dates.",
        category: "learning",
        estimated_time: "20 minutes",
        tips: &["Each step should take under 30 minutes"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "role-student-3",
        title: "Ask about accommodations",
        description: "Contact student support about adjustments that would help you.",
        category: "self-advocacy",
        estimated_time: "30 minutes",
        tips: &["Write down what helps before you reach out", "Email is fine if calls are hard"],
        xp: 70,
        difficulty: Difficulty::Hard,
    },
];

const ROLE_PROFESSIONAL: &[TaskTemplate] = &[
    TaskTemplate {
        id: "role-professional-1",
        title: "Plan focus blocks",
        description: "Reserve two distraction-free blocks in tomorrow's calendar.",
        category: "career",
        estimated_time: "10 minutes",
        tips: &["Turn off notifications during the block"],
        xp: 25,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "role-professional-2",
        title: "Write a working-with-me note",
        description: "Describe how you communicate and work best, to share with colleagues.",
        category: "self-advocacy",
        estimated_time: "45 minutes",
        tips: &["Keep it to one page", "Include preferred communication channels"],
        xp: 60,
        difficulty: Difficulty::Medium,
    },
];

const ROLE_JOB_SEEKER: &[TaskTemplate] = &[
    TaskTemplate {
        id: "role-job-seeker-1",
        title: "Save three job listings",
        description: "Find and bookmark three roles that match your interests.",
        category: "career",
        estimated_time: "20 minutes",
        tips: &["Look for employers with neurodiversity programmes"],
        xp: 25,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "role-job-seeker-2",
        title: "Practise an interview answer",
        description: "Rehearse your answer to 'Tell me about yourself'.",
        category: "career",
        estimated_time: "20 minutes",
        tips: &["Record yourself and listen back", "Aim for about one minute"],
        xp: 45,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "role-job-seeker-3",
        title: "Submit an application",
        description: "Complete and send one job application.",
        category: "career",
        estimated_time: "1-2 hours",
        tips: &["Reuse your saved CV sections", "Take breaks between form pages"],
        xp: 90,
        difficulty: Difficulty::Hard,
    },
];

const ROLE_CAREGIVER: &[TaskTemplate] = &[TaskTemplate {
    id: "role-caregiver-1",
    title: "Schedule time for yourself",
    description: "Set aside thirty minutes this week that is only for you.",
    category: "self-care",
    estimated_time: "5 minutes",
    tips: &["Ask someone to cover if needed"],
    xp: 30,
    difficulty: Difficulty::Easy,
}];

fn role_templates(role: &str) -> &'static [TaskTemplate] {
    match role {
        "student" => ROLE_STUDENT,
        "professional" | "employee" => ROLE_PROFESSIONAL,
        "job-seeker" => ROLE_JOB_SEEKER,
        "caregiver" | "parent" => ROLE_CAREGIVER,
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Age-group templates
// ────────────────────────────────────────────────────────────────────────────

const AGE_TEEN: &[TaskTemplate] = &[
    TaskTemplate {
        id: "age-teen-1",
        title: "Set a screen wind-down time",
        description: "Pick a time each night to put screens away.",
        category: "self-care",
        estimated_time: "5 minutes",
        tips: &["Charge your phone outside the bedroom"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "age-teen-2",
        title: "Learn to make a phone call",
        description: "Call to ask a simple question, such as a shop's opening hours.",
        category: "daily-living",
        estimated_time: "10 minutes",
        tips: &["Write a script first"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
];

const AGE_YOUNG_ADULT: &[TaskTemplate] = &[
    TaskTemplate {
        id: "age-young-adult-1",
        title: "Track spending for a week",
        description: "Write down everything you spend for seven days.",
        category: "finance",
        estimated_time: "5 minutes a day",
        tips: &["Use a notes app or a simple spreadsheet"],
        xp: 35,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "age-young-adult-2",
        title: "Book your own appointment",
        description: "Arrange a doctor, dentist or haircut appointment yourself.",
        category: "daily-living",
        estimated_time: "15 minutes",
        tips: &["Online booking counts"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
];

const AGE_ADULT: &[TaskTemplate] = &[
    TaskTemplate {
        id: "age-adult-1",
        title: "Review recurring bills",
        description: "List your regular payments and due dates in one place.",
        category: "finance",
        estimated_time: "30 minutes",
        tips: &["Set reminders two days before each due date"],
        xp: 50,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "age-adult-2",
        title: "Plan a recharge day",
        description: "Choose a day this month with low demands and plan it around rest.",
        category: "self-care",
        estimated_time: "15 minutes",
        tips: &["Let others know in advance"],
        xp: 30,
        difficulty: Difficulty::Easy,
    },
];

const AGE_SENIOR: &[TaskTemplate] = &[
    TaskTemplate {
        id: "age-senior-1",
        title: "Gentle stretching",
        description: "Follow a short seated stretching routine.",
        category: "health",
        estimated_time: "10 minutes",
        tips: &["Move slowly and stop if anything hurts"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "age-senior-2",
        title: "Call a friend or relative",
        description: "Have a catch-up conversation with someone you care about.",
        category: "social",
        estimated_time: "20 minutes",
        tips: &["Agree a regular time to talk"],
        xp: 30,
        difficulty: Difficulty::Easy,
    },
];

fn age_group_templates(age_group: &str) -> &'static [TaskTemplate] {
    match age_group {
        "teen" | "13-17" => AGE_TEEN,
        "young-adult" | "18-25" => AGE_YOUNG_ADULT,
        "adult" | "26-64" => AGE_ADULT,
        "senior" | "65+" => AGE_SENIOR,
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Neurodiversity templates (pairs)
// ────────────────────────────────────────────────────────────────────────────

const ND_ADHD: &[TaskTemplate] = &[
    TaskTemplate {
        id: "nd-adhd-1",
        title: "Try a body-doubling session",
        description: "Work on a task alongside someone else, in person or online.",
        category: "focus",
        estimated_time: "25 minutes",
        tips: &["Virtual co-working rooms work too"],
        xp: 35,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "nd-adhd-2",
        title: "Set up a launch pad",
        description: "Create one spot by the door for keys, wallet and bag.",
        category: "organization",
        estimated_time: "15 minutes",
        tips: &["Use a bowl or tray with a clear label"],
        xp: 25,
        difficulty: Difficulty::Easy,
    },
];

const ND_AUTISM: &[TaskTemplate] = &[
    TaskTemplate {
        id: "nd-autism-1",
        title: "Plan for a change in routine",
        description: "Write what will happen, step by step, for an upcoming change.",
        category: "routine",
        estimated_time: "20 minutes",
        tips: &["Include what you will do if plans shift again"],
        xp: 40,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "nd-autism-2",
        title: "Schedule special-interest time",
        description: "Book guilt-free time for something you love.",
        category: "self-care",
        estimated_time: "5 minutes",
        tips: &["Treat it as essential, not a reward"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
];

const ND_DYSLEXIA: &[TaskTemplate] = &[
    TaskTemplate {
        id: "nd-dyslexia-1",
        title: "Set up text-to-speech",
        description: "Turn on a read-aloud tool on your phone or computer.",
        category: "learning",
        estimated_time: "15 minutes",
        tips: &["Try a few voices and speeds"],
        xp: 25,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "nd-dyslexia-2",
        title: "Choose a readable font",
        description: "Change your default documents to a font and spacing that suit you.",
        category: "learning",
        estimated_time: "10 minutes",
        tips: &["Increase line spacing as well"],
        xp: 20,
        difficulty: Difficulty::Easy,
    },
];

const ND_DYSPRAXIA: &[TaskTemplate] = &[
    TaskTemplate {
        id: "nd-dyspraxia-1",
        title: "Practise a tricky movement",
        description: "Spend a few minutes on a motor skill you find challenging.",
        category: "health",
        estimated_time: "10 minutes",
        tips: &["Break it into smaller movements"],
        xp: 30,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "nd-dyspraxia-2",
        title: "Simplify one daily routine",
        description: "Find a tool or shortcut that makes a daily routine easier.",
        category: "daily-living",
        estimated_time: "20 minutes",
        tips: &["Elastic laces and slip-on shoes count"],
        xp: 30,
        difficulty: Difficulty::Easy,
    },
];

fn neurodiversity_templates(tag: &str) -> &'static [TaskTemplate] {
    match tag {
        "adhd" => ND_ADHD,
        "autism" | "autistic" => ND_AUTISM,
        "dyslexia" => ND_DYSLEXIA,
        "dyspraxia" => ND_DYSPRAXIA,
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sensory templates (one each)
// ────────────────────────────────────────────────────────────────────────────

const SENSORY_NOISE: &[TaskTemplate] = &[TaskTemplate {
    id: "sensory-noise-1",
    title: "Find your quiet tools",
    description: "Test earplugs or noise-cancelling headphones in a busy place.",
    category: "sensory",
    estimated_time: "15 minutes",
    tips: &["Keep a pair in every bag"],
    xp: 25,
    difficulty: Difficulty::Easy,
}];

const SENSORY_LIGHT: &[TaskTemplate] = &[TaskTemplate {
    id: "sensory-light-1",
    title: "Adjust your lighting",
    description: "Swap a harsh light for a warmer or dimmable one.",
    category: "sensory",
    estimated_time: "15 minutes",
    tips: &["Turn on night mode on your screens"],
    xp: 25,
    difficulty: Difficulty::Easy,
}];

const SENSORY_TEXTURE: &[TaskTemplate] = &[TaskTemplate {
    id: "sensory-texture-1",
    title: "Sort your comfortable clothes",
    description: "Set aside clothing whose texture bothers you.",
    category: "sensory",
    estimated_time: "30 minutes",
    tips: &["Remove scratchy labels"],
    xp: 30,
    difficulty: Difficulty::Medium,
}];

const SENSORY_MOVEMENT: &[TaskTemplate] = &[TaskTemplate {
    id: "sensory-movement-1",
    title: "Add a movement break",
    description: "Take a five-minute movement break between tasks.",
    category: "sensory",
    estimated_time: "5 minutes",
    tips: &["Jumping, rocking or a brisk walk all work"],
    xp: 15,
    difficulty: Difficulty::Easy,
}];

fn sensory_templates(tag: &str) -> &'static [TaskTemplate] {
    match tag {
        "noise-sensitive" | "sound" => SENSORY_NOISE,
        "light-sensitive" | "light" => SENSORY_LIGHT,
        "texture-sensitive" | "touch" => SENSORY_TEXTURE,
        "movement-seeking" | "movement" => SENSORY_MOVEMENT,
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback
// ────────────────────────────────────────────────────────────────────────────

const FALLBACK: &[TaskTemplate] = &[
    TaskTemplate {
        id: "wellness-water",
        title: "Drink a glass of water",
        description: "Pause and drink a full glass of water.",
        category: "wellness",
        estimated_time: "2 minutes",
        tips: &["Keep a bottle within reach"],
        xp: 10,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "wellness-breathing",
        title: "Take three deep breaths",
        description: "Slowly breathe in and out three times.",
        category: "wellness",
        estimated_time: "1 minute",
        tips: &["Breathe out longer than you breathe in"],
        xp: 10,
        difficulty: Difficulty::Easy,
    },
    TaskTemplate {
        id: "wellness-walk",
        title: "Go for a short walk",
        description: "Walk for ten minutes, indoors or outside.",
        category: "wellness",
        estimated_time: "10 minutes",
        tips: &["Notice three things you can see"],
        xp: 25,
        difficulty: Difficulty::Medium,
    },
    TaskTemplate {
        id: "wellness-gratitude",
        title: "Write down one good thing",
        description: "Note one thing that went well today, however small.",
        category: "wellness",
        estimated_time: "5 minutes",
        tips: &["It can be as small as a good cup of tea"],
        xp: 15,
        difficulty: Difficulty::Easy,
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Lowercases, trims and hyphenates a categorical answer so that
/// "Self Care", "self_care" and "self-care" all match.
fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Builds the starter task list for a profile.
///
/// Accumulation order: goals, role, age group, neurodiversity tags, sensory
/// preferences. Falls back to generic wellness tasks when nothing matched,
/// then dedups by id (first wins) and truncates to `MAX_GENERATED_TASKS`.
pub fn generate_tasks(profile: &OnboardingProfile) -> Vec<Task> {
    let mut templates: Vec<&TaskTemplate> = Vec::new();

    for goal in &profile.main_goals {
        templates.extend(goal_templates(&normalize(goal)));
    }
    if let Some(role) = &profile.role {
        templates.extend(role_templates(&normalize(role)));
    }
    if let Some(age_group) = &profile.age_group {
        templates.extend(age_group_templates(&normalize(age_group)));
    }
    for tag in &profile.neurodiversity_types {
        templates.extend(neurodiversity_templates(&normalize(tag)));
    }
    for tag in &profile.sensory_preferences {
        templates.extend(sensory_templates(&normalize(tag)));
    }

    if templates.is_empty() {
        templates.extend(FALLBACK);
    }

    let mut seen = HashSet::new();
    templates
        .into_iter()
        .filter(|t| seen.insert(t.id))
        .take(MAX_GENERATED_TASKS)
        .map(TaskTemplate::to_task)
        .collect()
}
