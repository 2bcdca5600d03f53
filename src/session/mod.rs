//! 会话层：每个用户的对话状态与进程级注册表

pub mod registry;
pub mod state;

pub use registry::{MemorySessionRegistry, SessionRegistry};
pub use state::{FormField, FormKind, FormProgress, Phase, SessionState};
