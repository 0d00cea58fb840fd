//! OS scheduled-execution service adapter

mod task_scheduler;

pub use task_scheduler::SystemTaskScheduler;
