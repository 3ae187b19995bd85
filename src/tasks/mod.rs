//! Background Tasks Module
//!
//! # Tasks
//! - Cache GC: sweeps expired entries at the configured interval

mod gc;

pub use gc::spawn_gc_task;
