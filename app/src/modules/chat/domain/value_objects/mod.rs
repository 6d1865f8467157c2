// Chat Domain - Value Objects
// 值对象是不可变的，通过值而非标识来比较

mod bubble_role;
mod message_id;
mod message_status;

pub use bubble_role::*;
pub use message_id::*;
pub use message_status::*;
