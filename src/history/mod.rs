mod activity;
mod kudos;
mod milestones;

pub use activity::{activity_feed, changed_units_since, unit_contributors, ActivityEntry};
pub use kudos::{grouped_contributions, AuthorContributions, ContributionWindow, DEFAULT_MESSAGES};
pub use milestones::{completion_milestones, Milestone, MilestoneKind};
