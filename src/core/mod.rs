mod builder;
mod registry;
mod report;
mod scheduler;
mod validate;

pub use builder::SchedulerBuilder;
pub use registry::ExecState;
pub use scheduler::{CompletionHandle, Scheduler};
