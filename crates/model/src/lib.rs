#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod quiz;
pub mod score;
pub mod wiki;

pub use quiz::{Kind, Question, QuizResult};
pub use score::{NewUser, Score};
