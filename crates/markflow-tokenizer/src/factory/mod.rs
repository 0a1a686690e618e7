//! Reusable sub-machines shared by constructs.
//!
//! A factory is entered with `Tokenizer::attempt(ok, nok)` followed by
//! `State::Retry(start)`; it settles with `Ok` or `Nok`. Its parameters
//! (token kinds, limits) are set in `TokenizeState` first.

pub mod destination;
pub mod label;
pub mod space;
pub mod title;
pub mod whitespace;
