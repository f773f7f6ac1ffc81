use parking_lot::Mutex;
use std::future::Future;
use tokio::task::JoinHandle;

/// 视图模型的任务作用域
///
/// 通过 `launch` 启动的任务归作用域所有，作用域被释放时全部中止，
/// 与界面离开时取消未完成请求的行为一致。
#[derive(Default)]
pub struct ViewModelScope {
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewModelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在当前 tokio 运行时中启动任务
    pub fn launch<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(fut);
        let mut tasks = self.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// 中止所有未完成的任务
    pub fn cancel_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        let mut aborted = 0usize;
        for task in tasks {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        if aborted > 0 {
            log::debug!("已取消 {} 个未完成的任务", aborted);
        }
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.lock().iter().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for ViewModelScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
