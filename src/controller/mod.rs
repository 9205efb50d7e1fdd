pub(crate) mod driver;
pub(crate) mod events;
pub(crate) mod machine;
pub(crate) mod state;
