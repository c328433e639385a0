//! Spanish subjunctive learning progress engine.
//!
//! Core pieces: a rule-driven conjugation engine with answer validation
//! ([`conjugation`]), an error classifier ([`analysis`]), an SM-2 scheduler
//! ([`srs`]), an adaptive difficulty controller ([`adaptive`]), and the
//! [`session`] orchestrator that ties them together over external
//! [`repository`] and [`content`] boundary traits.

pub mod adaptive;
pub mod analysis;
pub mod config;
pub mod conjugation;
pub mod content;
pub mod domain;
pub mod repository;
pub mod session;
pub mod srs;
pub mod testing;
