pub mod article;
pub mod generation;
pub mod media;
pub mod persona;
pub mod publish;
