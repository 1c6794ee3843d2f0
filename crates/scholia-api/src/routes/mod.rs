pub mod analysis;
pub mod categories;
pub mod flashcards;
pub mod health;
