mod pence;

pub mod helpers;
pub mod op;
mod secret;

pub use pence::{Pence, PenceConversionError, GBP_CURRENCY_CODE, GBP_CURRENCY_CODE_LOWER};
pub use secret::Secret;
