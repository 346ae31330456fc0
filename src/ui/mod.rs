pub mod interactive;
pub mod sound_bar;
pub mod styles;

pub use interactive::run_interactive;
