// Life of an auth config:
// 1. An untyped record comes in (admin submission or stored JSON)
// 2. `source` is resolved against the active registry
// 3. The variant for that source reads its fields and pins its auth type
// 4. Enabled configs are checked for their mandatory provider fields
// 5. The immutable config is handed to whoever consumes it, and encoded
//    back to the same record shape for storage or display
//
// System components:
//  - Auth config model and codec (`auth`)
//  - Stored config loading (`store`)
//  - Admin HTTP surface (`admin`)

pub mod admin;
pub mod auth;
pub mod config;
pub mod store;

mod e2e_tests;
