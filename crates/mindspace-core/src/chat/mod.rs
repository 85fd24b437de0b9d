//! Chat: completion service port, the turn pipeline and the dashboard
//! view-model (greeting, suggested prompts, input buffer).

pub mod completion;
pub mod dashboard;
pub mod pipeline;
