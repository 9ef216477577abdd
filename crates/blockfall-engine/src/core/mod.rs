pub use self::{color::*, grid::*, shape::*};

pub(crate) mod color;
pub(crate) mod grid;
pub(crate) mod shape;
