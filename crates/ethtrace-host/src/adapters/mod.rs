pub mod fetch;
pub mod handler;
pub mod mock;
pub mod traits;

pub use fetch::FetchTracesAdapter;
pub use handler::HandlerAdapter;
