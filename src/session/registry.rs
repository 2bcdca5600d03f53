//! 会话注册表
//!
//! 定义统一的会话状态存取接口；默认实现为内存版，按用户分槽加锁，不同用户之间互不阻塞。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::SessionState;

/// 会话注册表接口
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// 获取用户状态；不存在时返回默认状态（并登记该用户）
    async fn get(&self, user_id: &str) -> SessionState;

    async fn put(&self, user_id: &str, state: SessionState);

    /// 丢弃进行中的表单
    async fn clear_form(&self, user_id: &str);

    /// 丢弃表单、FAQ 计数与结束标记，保留已完成表单
    async fn clear_session(&self, user_id: &str);

    /// 已登记的用户数
    async fn len(&self) -> usize;
}

type Slot = Arc<Mutex<SessionState>>;

/// 内存会话注册表：外层锁只用于查找/插入用户槽位，状态读写在各自槽位锁下进行
#[derive(Default)]
pub struct MemorySessionRegistry {
    slots: RwLock<HashMap<String, Slot>>,
}

impl MemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, user_id: &str) -> Slot {
        if let Some(slot) = self.slots.read().await.get(user_id) {
            return slot.clone();
        }
        let mut slots = self.slots.write().await;
        slots
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("new session for user {}", user_id);
                Arc::new(Mutex::new(SessionState::default()))
            })
            .clone()
    }
}

#[async_trait]
impl SessionRegistry for MemorySessionRegistry {
    async fn get(&self, user_id: &str) -> SessionState {
        self.slot(user_id).await.lock().await.clone()
    }

    async fn put(&self, user_id: &str, state: SessionState) {
        *self.slot(user_id).await.lock().await = state;
    }

    async fn clear_form(&self, user_id: &str) {
        self.slot(user_id).await.lock().await.form = None;
    }

    async fn clear_session(&self, user_id: &str) {
        self.slot(user_id).await.lock().await.reset_session();
    }

    async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FormKind, FormProgress};

    #[tokio::test]
    async fn test_get_creates_default() {
        let reg = MemorySessionRegistry::new();
        assert_eq!(reg.len().await, 0);
        assert_eq!(reg.get("u1").await, SessionState::default());
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let reg = MemorySessionRegistry::new();
        let mut state = SessionState::default();
        state.faq_turns = 2;
        state.form = Some(FormProgress::new(FormKind::Client));
        reg.put("u1", state.clone()).await;
        assert_eq!(reg.get("u1").await, state);
        assert_eq!(reg.get("u2").await, SessionState::default());
    }

    #[tokio::test]
    async fn test_clear_form_and_session() {
        let reg = MemorySessionRegistry::new();
        let mut state = SessionState::default();
        state.form = Some(FormProgress::new(FormKind::Jobseeker));
        state.faq_turns = 1;
        state.mark_submitted();
        reg.put("u1", state).await;

        reg.clear_form("u1").await;
        let s = reg.get("u1").await;
        assert!(s.form.is_none());
        assert_eq!(s.faq_turns, 1);

        reg.clear_session("u1").await;
        let s = reg.get("u1").await;
        assert_eq!(s.faq_turns, 0);
        assert_eq!(s.completed.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_users_do_not_interfere() {
        let reg = Arc::new(MemorySessionRegistry::new());
        let mut handles = Vec::new();
        for i in 0..16u32 {
            let reg = reg.clone();
            handles.push(tokio::spawn(async move {
                let user = format!("user-{i}");
                for _ in 0..50 {
                    let mut s = reg.get(&user).await;
                    s.faq_turns += 1;
                    reg.put(&user, s).await;
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(reg.len().await, 16);
        for i in 0..16u32 {
            assert_eq!(reg.get(&format!("user-{i}")).await.faq_turns, 50);
        }
    }
}
