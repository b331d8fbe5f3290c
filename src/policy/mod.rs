//! Channel and guild access policy.

pub mod access;

pub use access::AccessPolicy;
