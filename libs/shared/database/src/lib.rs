pub mod memory;
pub mod store;
pub mod supabase;

pub use memory::MemoryStore;
pub use store::*;
pub use supabase::SupabaseStore;
