mod adjustments;
mod config;
mod junction;
mod plan;
mod project;
mod stage;

pub use adjustments::{FixedPoint, StageTransfer, TempAdjustments};
pub use config::{Bounds, InitConfig, IntergreenConfig, LowerBound};
pub use junction::{IntergreenMatrix, IntergreenSet, Junction, NOT_PERMITTED};
pub use plan::{is_rotation, sort_plan, sorted_plan, ChangeRequest};
pub use project::{PlanContext, Project};
pub use stage::{DirectionDescriptor, Stage, StageDirection};
