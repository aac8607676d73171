//! Source text to cells: scanning, symbol interning and loading.

pub mod interner;
pub mod lexer;
pub mod loader;
pub mod symbol;
pub mod token;

#[cfg(test)]
mod lexer_test;
