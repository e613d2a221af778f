//! Rail journey board.
//!
//! Answers: "which trains get me from here to there in the next couple of
//! hours, either directly or with one change at a given interchange?"

pub mod batch;
pub mod cli;
pub mod darwin;
pub mod domain;
pub mod output;
pub mod planner;
pub mod provider;
