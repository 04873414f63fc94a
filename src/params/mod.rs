// mod.rs - Parameter binding core

pub mod bind;
pub mod date;
pub mod gather;
pub mod spec;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use bind::{bind, bind_at, bind_flags, bind_flags_at, ArityContract, BoundCommand};
pub use date::{parse_date, parse_date_now, Timestamp};
pub use gather::{gather_arguments, gather_arguments_at, gather_flags, gather_flags_at};
pub use spec::ParameterSpec;
pub use types::ParameterType;
pub use value::{ParamValue, ParsedValues, RawValue};
