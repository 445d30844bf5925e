use serde::{Deserialize, Serialize};

/// Итоги обработки одного пакета синхронизации
///
/// Только счётчики: подробности по отдельным предложениям пишутся в лог.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncSummary {
    pub total: usize,
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
