pub mod core;
pub mod runs;

pub use self::core::{AssistantService, AssistantsClient, Run, RunStatus};
pub use self::runs::{RunError, RunPoller};
