//! Convert numbers to and from human readable magnitude strings
//!
//! ```
//! use nicenum::{to_human, to_numeric, Family};
//!
//! assert_eq!(to_human(69420.0, 1, Family::Number).unwrap(), "69.4K");
//! assert_eq!(to_numeric("4.51k", Family::Number).unwrap(), 4510.0);
//! ```

pub mod color;
pub mod config;
mod error;
pub mod fmt;
pub mod magnitude;
pub mod parse;
pub mod table;

pub use color::to_color;
pub use error::Error;
pub use fmt::{to_human, HumanFormatter};
pub use magnitude::Family;
pub use parse::to_numeric;
