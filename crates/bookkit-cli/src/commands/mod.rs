//! Handlers for the supported actions.

pub(crate) mod delete;
pub(crate) mod set_state;
