pub mod badge;
pub mod icon_gen;
pub mod png;
