pub(crate) mod device_struct;

mod device_methods;
