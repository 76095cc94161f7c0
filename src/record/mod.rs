mod capability;
mod descriptor;
mod normalize;
mod record;
mod snapshot;

pub use descriptor::{Capability, Entity, EntityDescriptor};
pub use record::{LoadCriteria, Record};
