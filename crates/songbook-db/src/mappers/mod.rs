//! Model -> entity conversions
//!
//! Rows come back as `*Model` structs and are converted into the domain
//! entities from songbook-core. Accounts use `TryFrom` because the provider
//! column is free text at the SQL level.

mod account;
mod song;
mod verification_code;
