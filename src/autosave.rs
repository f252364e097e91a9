//! 自動保存タスク
//!
//! 一定間隔で通常の保存先と控えの両方へ保存する。
//! 1つのタスク内で順に実行するため、保存が重なって走ることはない。

use crate::config::Config;
use crate::manager::ProjectManager;
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct AutoSave {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl AutoSave {
    /// 自動保存を開始する（最初の保存は1周期後）
    pub fn start<S>(manager: Arc<Mutex<ProjectManager<S>>>, period: Duration) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            log::info!("自動保存を開始しました ({}秒間隔)", period.as_secs());

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let mut manager = match manager.lock() {
                            Ok(guard) => guard,
                            Err(_) => {
                                log::error!("プロジェクト管理のロックが破損したため自動保存を停止します");
                                break;
                            }
                        };
                        if let Err(e) = manager.autosave() {
                            log::warn!("自動保存に失敗しました: {}", e);
                        }
                    }
                }
            }
            log::info!("自動保存を停止しました");
        });

        Self {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// `autosave_on_start` が有効なら設定の間隔で開始する
    pub fn from_config<S>(manager: Arc<Mutex<ProjectManager<S>>>, config: &Config) -> Option<Self>
    where
        S: KeyValueStore + 'static,
    {
        config
            .autosave_on_start
            .then(|| Self::start(manager, config.autosave_interval()))
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// 停止し、実行中の保存が終わるまで待つ
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            log::warn!("自動保存タスクの終了待ちに失敗: {}", e);
        }
    }
}

impl Drop for AutoSave {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}
