//! Concrete runtypes
//!
//! Every runtype here is built with [`Runtype::create`](crate::Runtype::create).
//! Composites (dictionary, array, tuple, record) descend through
//! [`traverse_members`](crate::traversal::traverse_members) and are therefore
//! safe on cyclic values.

pub mod array;
pub mod constraint;
pub mod dictionary;
pub mod instance_of;
pub mod intersect;
pub mod lazy;
pub mod literal;
pub mod primitives;
pub mod record;
pub mod tuple;
pub mod union;

pub use array::array;
pub use dictionary::{dictionary, number_dictionary, string_dictionary};
pub use instance_of::instance_of;
pub use intersect::intersect;
pub use lazy::{lazy, LazyRuntype};
pub use literal::{literal, null, undefined};
pub use primitives::{boolean, function, never, number, string, unknown};
pub use record::{partial, record};
pub use tuple::tuple;
pub use union::union;
