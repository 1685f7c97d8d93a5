mod release_selector;
mod tag_plan;
mod test_environment;

pub use release_selector::ReleaseSelector;
pub use tag_plan::{RefConflict, TagPlan, TagPlanner, TagTarget};
pub use test_environment::{binding_for, EnvBinding, TestEnvironment};
