pub mod application;

pub use application::TrainerService;
