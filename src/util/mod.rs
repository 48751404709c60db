pub(crate) mod lock;
pub(crate) mod value;
