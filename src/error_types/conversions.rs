// Conversions between the layers.

// Not every error type can be converted upwards willy-nilly; each impl here
// is a deliberate statement that the lower failure means the higher one.

use crate::error_types::device::DeviceError;
use crate::error_types::protocol::HexError;
use crate::error_types::protocol::ProtocolError;
use crate::error_types::volume::NameFault;
use crate::error_types::volume::OpenError;
use crate::error_types::volume::SpaceFault;
use crate::error_types::volume::VolumeError;
use crate::volume::layout::layout_struct::GeometryError;
use crate::volume::nodes::node_struct::ChainFault;

//
// Into VolumeError
//

impl From<DeviceError> for VolumeError {
    fn from(value: DeviceError) -> Self {
        // Backing-file failures surface as-is. The manager has already
        // rolled back whatever it could by the time this propagates.
        VolumeError::Io(value)
    }
}

impl From<ChainFault> for VolumeError {
    fn from(value: ChainFault) -> Self {
        // An impossible link value means the chain metadata is lying.
        // Only the file that owns the chain is affected.
        VolumeError::Corrupt(value)
    }
}

impl From<NameFault> for VolumeError {
    fn from(value: NameFault) -> Self {
        VolumeError::InvalidName(value)
    }
}

impl From<SpaceFault> for VolumeError {
    fn from(value: SpaceFault) -> Self {
        VolumeError::NoSpace(value)
    }
}

//
// Into OpenError
//

impl From<GeometryError> for OpenError {
    fn from(value: GeometryError) -> Self {
        OpenError::Geometry(value)
    }
}

impl From<DeviceError> for OpenError {
    fn from(value: DeviceError) -> Self {
        OpenError::Io(value)
    }
}

//
// Into ProtocolError
//

impl From<HexError> for ProtocolError {
    fn from(value: HexError) -> Self {
        ProtocolError::BadHex(value)
    }
}
