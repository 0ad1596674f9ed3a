//! Domain types and the storage ports the service is written against.

pub mod account;
pub mod ports;
pub mod principal;
pub mod search;
pub mod transaction;
