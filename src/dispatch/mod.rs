//! Parameter dispatch for tmc2209-uart.
//!
//! Maps logical parameters onto the motion generator or the register engine.

mod dispatcher;
mod motion;
mod parameter;

pub use dispatcher::ParameterDispatch;
pub use motion::MotionGenerator;
pub use parameter::{LogicalParameter, ParamAccess, Resolution};
