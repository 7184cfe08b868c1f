//! # Selective Disclosure Request Types

mod credential;
mod manifest;
mod validation;

pub use self::credential::*;
pub use self::manifest::*;
pub use self::validation::*;
