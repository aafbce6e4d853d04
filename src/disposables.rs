//! 可清理资源列表：
//! - 每个资源登记一个清理回调，返回句柄以便资源自然结束时注销
//! - `dispose` 一次性释放全部资源；列表被 drop 时也会释放

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

type Dispose = Box<dyn FnOnce() + Send>;

/// 登记后返回的句柄，资源自然结束时用它注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DisposeKey(u64);

#[derive(Default)]
pub(crate) struct Disposables {
    next: AtomicU64,
    entries: Mutex<Vec<(DisposeKey, Dispose)>>,
}

impl Disposables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 登记一个清理回调
    pub(crate) fn add(&self, dispose: impl FnOnce() + Send + 'static) -> DisposeKey {
        let key = DisposeKey(self.next.fetch_add(1, Ordering::SeqCst));
        self.lock().push((key, Box::new(dispose)));
        key
    }

    /// 取消登记但不执行回调（资源已自然结束）
    pub(crate) fn forget(&self, key: DisposeKey) -> bool {
        let mut entries = self.lock();
        match entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// 释放全部资源，按登记顺序执行
    pub(crate) fn dispose(&self) {
        // 先取出再执行，回调中可以安全地再次访问本列表
        let drained: Vec<_> = self.lock().drain(..).collect();
        for (_, dispose) in drained {
            dispose();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(DisposeKey, Dispose)>> {
        // 回调 panic 不应让后续清理失效
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Disposables {
    fn drop(&mut self) {
        self.dispose();
    }
}
