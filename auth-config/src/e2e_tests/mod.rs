//! End-to-end tests at the untyped record level.
//!
//! Each test file covers a specific scenario, decoding and encoding records
//! the way a persistence or admin collaborator would.

#![cfg(test)]

mod helpers;

mod test_auth_type_not_settable;
mod test_enable_enforcement;
mod test_registry_reload;
mod test_round_trip;
mod test_source_dispatch;
