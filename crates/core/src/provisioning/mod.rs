//! Table and index provisioning.
//!
//! [`plan`] holds the pure deploy/destroy planning, [`poller`] the backoff
//! loop, and the async operations that combine them with a store live at
//! the module root.

mod deploy;
mod error;
pub mod plan;
pub mod poller;

pub use deploy::{
    add_index_and_wait, check_index, check_table, create_table_and_wait, execute_deploy_plan,
    execute_destroy_plan,
};
pub use error::{ProvisioningError, Result};
pub use plan::{
    calculate_deploy_plan, calculate_destroy_plan, format_deploy_plan, format_destroy_plan,
    DeployPlan, DestroyPlan,
};
pub use poller::{
    await_active, next_delay, PollSettings, PollStatus, Poller, ProvisioningState,
    ProvisioningTask, Sleeper, TokioSleeper,
};
