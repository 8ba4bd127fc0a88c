//! Client tools exposed to the conversational widget
//!
//! The widget invokes tools by name with a JSON argument object and
//! expects a JSON answer back. Tools never fail at the tool level.

mod greeting;
mod registry;
mod show_image;
mod traits;

pub use greeting::{GreetingTool, GREETING};
pub use registry::ToolRegistry;
pub use show_image::{ShowImageOutput, ShowImageTool, SHOW_IMAGE};
pub use traits::*;
