pub mod payment;
pub mod stats;

pub use payment::PaymentService;
pub use stats::StatsService;
