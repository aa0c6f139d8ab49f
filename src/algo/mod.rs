//! Mesh processing algorithms.
//!
//! - **Retopology**: edge-loop operations that change how many face strips
//!   run through a quad patch ([`retopo`])

pub mod retopo;
