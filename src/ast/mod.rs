mod equiv;
mod kind;
mod literal;
mod node;
mod op;
mod render;
mod walk;

pub mod token;

pub use kind::*;
pub use literal::*;
pub use node::*;
pub use op::*;
pub use walk::*;
