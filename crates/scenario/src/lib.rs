//! Scenario selection and content-request compilation.
//!
//! Classifies the current moment into one operating scenario using the
//! venue clock and the cruise-event calendar, then turns that scenario into
//! the text request sent to the generative-text provider.

pub mod calendar;
pub mod compiler;
pub mod selector;
pub mod time;

pub use calendar::EventCalendar;
pub use compiler::compile;
pub use selector::{pick_restaurant, Scenario, ScenarioDescriptor, ScenarioSelector};
pub use time::{DepartureWindow, TimeContext, TimeOfDay};
