// One error type per layer, with the conversions kept in one place.
// We do not allow string errors. This is RUST damn it, not python!

pub mod device;
pub mod protocol;
pub mod volume;

mod conversions;
