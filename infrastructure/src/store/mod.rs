//! Storage adapters

mod memory;

pub use memory::{
    DEFAULT_FREE_ANALYSES, MemorySessionStore, MemoryUsageLedger, Plan, UserAccount,
};
