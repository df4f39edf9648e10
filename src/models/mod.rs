pub mod paging;
pub mod task;
pub mod user;

pub use paging::{Paging, DEFAULT_LIMIT};
pub use task::{Task, TaskCreate, TaskQuery, TaskUpdate};
pub use user::{NewUser, User, UserChanges, UserCreate, UserQuery, UserResponse, UserUpdate};
