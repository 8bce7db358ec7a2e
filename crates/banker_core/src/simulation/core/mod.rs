//! Algorithmic core: state model, safety checker, sequence enumerator, and
//! admission control. Everything here is synchronous and side-effect free on
//! live state; the service layer owns sessions and commits.

pub mod admission;
pub mod enumeration;
pub mod safety;
pub mod state;
