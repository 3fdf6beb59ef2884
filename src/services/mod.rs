pub mod chatbot;
pub mod music;
