#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]
#![allow(clippy::manual_is_multiple_of)]

pub mod logging;
pub mod models;
pub mod time;
pub mod realisation;
pub mod adjust;
pub mod transfer;
pub mod scaling;
pub mod suggest;
pub mod validation;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use adjust::{adjusted_plan, compute_realised_cycle_adjusted};
pub use realisation::{compute_realised_cycle, RealisationError, RealisedCycle, StageDetail};
pub use scaling::{apply_scale, compute_scaled_plan, scale_preview, ScaledPlan};
pub use suggest::{suggest_min_cycle, MinCycleSuggestion};
pub use transfer::{calculate_stage_time_transfer, TransferOutcome};
pub use validation::{run_validation, validate_junction};
