pub(crate) mod api;
pub(crate) mod soft;
pub(crate) mod state;
