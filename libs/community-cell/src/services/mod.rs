pub mod forum;
pub mod newsletter;

pub use forum::ForumService;
pub use newsletter::NewsletterService;
