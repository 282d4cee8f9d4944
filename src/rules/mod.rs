//! Built-in rule families.
//!
//! - Bounds: [`MinValue`], [`MaxValue`], [`InRange`]
//! - String shape: [`MinLength`], [`MaxLength`], [`Contains`], [`BeginsWith`], [`Pattern`]
//! - Membership: [`OneOf`], [`NotIn`], [`IsEnum`]
//! - Transforms: [`Trim`], [`Lowercase`]
//! - Caller-supplied: [`Custom`]
//!
//! Every rule assumes its candidate is present, non-null and of the field's
//! declared type, because the engine checks those first. Rules still fail
//! cleanly on an unexpected type for fields declared `any`.

mod bounds;
mod custom;
mod membership;
mod text;

pub use bounds::{InRange, MaxValue, MinValue};
pub use custom::{not_equals, Custom};
pub use membership::{IsEnum, NotIn, OneOf};
pub use text::{BeginsWith, Contains, Lowercase, MaxLength, MinLength, Pattern, Trim};
