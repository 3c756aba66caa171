pub(crate) mod pool_struct;

mod pool_methods;
