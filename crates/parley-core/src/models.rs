pub mod archive;
pub mod completion;
pub mod image;
pub mod turn;
