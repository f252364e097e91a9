//! プロジェクト管理
//!
//! プロジェクト状態を1つだけ保持し、変更はすべてここの操作を経由する。
//! 変更操作は状態をメモリ上で完全に更新してから保存を要求する。
//! 保存に失敗しても状態は変更後のまま残り、`ProjectEvent::SaveFailed` で通知される。
//!
//! 描画側は `subscribe` で変更通知を受け取り、`view()` で表示内容を取得する。

use crate::config::Config;
use crate::error::{Result, ToshootError};
use crate::persistence::{LoadOutcome, ProjectStore};
use crate::storage::{FileStore, KeyValueStore};
use toshoot_common::filter::{distinct_values, filter_global, paginate, Filter, FilterField, FilterGroup, Page};
use toshoot_common::{
    parse_project_file, project_file_json, ItemId, ProjectInfo, ProjectState, SceneFields, SceneId, SceneRecord,
    Sequence,
};

/// 起動時の読み込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupState {
    Loaded,
    /// 保存データなし（初回起動画面を出す）
    FirstRun { backup_available: bool },
    /// 保存データが壊れている（破棄か再試行を選ばせる）
    Corrupt(String),
    /// 保存領域を読めない（再試行を選ばせる）
    StorageError(String),
}

/// 変更通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    /// 状態・フィルタ・ページのいずれかが変わった
    Changed,
    Saved,
    SaveFailed(String),
}

/// 画面に表示する内容
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleView<'a> {
    NoActiveSequence,
    /// アクティブなシーケンス（ページ分割済み）
    Sequence {
        sequence: &'a Sequence,
        page: Page<'a, SceneRecord>,
    },
    /// 有効なフィルタによる全シーケンス横断の結果
    Filtered {
        filter: &'a Filter,
        groups: Vec<FilterGroup<'a>>,
    },
}

type Listener = Box<dyn FnMut(&ProjectEvent, &ProjectState) + Send>;

pub struct ProjectManager<S> {
    state: ProjectState,
    store: ProjectStore<S>,
    filter: Filter,
    page: usize,
    scenes_per_page: usize,
    listeners: Vec<Listener>,
    last_save_error: Option<String>,
}

impl ProjectManager<FileStore> {
    /// 設定ファイルを読み、その保存領域から開始する
    pub fn open_default() -> Result<(Self, StartupState)> {
        let config = Config::load()?;
        Self::open_with_config(&config)
    }

    /// 設定の保存領域ディレクトリから開始する
    pub fn open_with_config(config: &Config) -> Result<(Self, StartupState)> {
        let dir = config.storage_dir()?;
        log::info!("保存領域: {}", dir.display());
        let backend = FileStore::open(dir)?;
        Ok(Self::open(backend, config.scenes_per_page))
    }
}

impl<S: KeyValueStore> ProjectManager<S> {
    /// 保存領域から読み込んで開始する
    pub fn open(backend: S, scenes_per_page: usize) -> (Self, StartupState) {
        let mut manager = Self {
            state: ProjectState::new(),
            store: ProjectStore::new(backend),
            filter: Filter::all(),
            page: 1,
            scenes_per_page: scenes_per_page.max(1),
            listeners: Vec::new(),
            last_save_error: None,
        };
        let startup = manager.load_from_store();
        (manager, startup)
    }

    fn load_from_store(&mut self) -> StartupState {
        match self.store.load() {
            Ok(LoadOutcome::Loaded(state)) => {
                self.replace_state(state);
                StartupState::Loaded
            }
            Ok(LoadOutcome::NoProject { backup_available }) => {
                self.replace_state(ProjectState::new());
                StartupState::FirstRun { backup_available }
            }
            Err(e) if e.is_corrupt_data() => {
                log::warn!("保存データが壊れています: {}", e);
                self.replace_state(ProjectState::new());
                StartupState::Corrupt(e.to_string())
            }
            Err(e) => {
                log::warn!("保存領域を読み込めません: {}", e);
                self.replace_state(ProjectState::new());
                StartupState::StorageError(e.to_string())
            }
        }
    }

    fn replace_state(&mut self, state: ProjectState) {
        self.state = state;
        self.filter = Filter::all();
        self.page = 1;
    }

    // =============================================
    // 参照
    // =============================================

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn new_scene_template(&self) -> SceneFields {
        self.state.new_scene_template()
    }

    pub fn distinct_values(&self, field: FilterField) -> Vec<String> {
        distinct_values(&self.state, field)
    }

    /// 表示内容
    ///
    /// フィルタが有効なら全シーケンス横断、そうでなければアクティブなシーケンスのページ。
    pub fn view(&self) -> ScheduleView<'_> {
        if self.filter.is_active() {
            return ScheduleView::Filtered {
                filter: &self.filter,
                groups: filter_global(&self.state, &self.filter),
            };
        }
        match self.state.active_sequence() {
            Some(sequence) => ScheduleView::Sequence {
                sequence,
                page: paginate(&sequence.scenes, self.page, self.scenes_per_page),
            },
            None => ScheduleView::NoActiveSequence,
        }
    }

    // =============================================
    // 通知と保存
    // =============================================

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ProjectEvent, &ProjectState) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: ProjectEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event, &self.state);
        }
    }

    /// 変更を通知し、保存を要求する（失敗は通知のみ）
    fn commit(&mut self) {
        self.notify(ProjectEvent::Changed);
        if let Err(e) = self.save_now() {
            log::warn!("保存に失敗しました: {}", e);
        }
    }

    /// 通常の保存先へ保存
    pub fn save_now(&mut self) -> Result<()> {
        match self.store.save(&self.state) {
            Ok(()) => {
                self.last_save_error = None;
                self.notify(ProjectEvent::Saved);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.last_save_error = Some(message.clone());
                self.notify(ProjectEvent::SaveFailed(message));
                Err(e)
            }
        }
    }

    /// 自動保存の1回分（通常の保存先と控えの両方）
    ///
    /// 通常の保存先に失敗しても控えへの書き込みは試み、最初のエラーを返す。
    pub fn autosave(&mut self) -> Result<()> {
        let primary = self.save_now();
        let backup = self.store.save_backup(&self.state);
        if let Err(e) = &backup {
            log::warn!("控えの保存に失敗しました: {}", e);
        }
        primary.and(backup)
    }

    // =============================================
    // パネル項目
    // =============================================

    pub fn create_sequence(&mut self, name: Option<&str>) -> ItemId {
        let id = self.state.create_sequence(name);
        self.filter = Filter::all();
        self.page = 1;
        self.commit();
        id
    }

    pub fn create_schedule_break(&mut self, name: &str) -> Result<ItemId> {
        let id = self.state.create_schedule_break(name)?;
        self.commit();
        Ok(id)
    }

    pub fn rename_item(&mut self, id: ItemId, new_name: &str) -> Result<()> {
        self.state.rename_item(id, new_name)?;
        self.commit();
        Ok(())
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<()> {
        self.state.remove_item(id)?;
        self.page = 1;
        self.commit();
        Ok(())
    }

    /// アクティブなシーケンスを切り替え、フィルタを解除する
    pub fn set_active(&mut self, id: ItemId) -> Result<()> {
        self.state.set_active(id)?;
        self.filter = Filter::all();
        self.page = 1;
        self.commit();
        Ok(())
    }

    /// ドラッグ終了時の並べ替え（表示位置）
    pub fn reorder_items(&mut self, old_position: usize, new_position: usize) -> bool {
        let changed = self.state.reorder_items(old_position, new_position);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_project_info(&mut self, info: ProjectInfo) {
        self.state.set_project_info(info);
        self.commit();
    }

    // =============================================
    // シーン
    // =============================================

    pub fn add_scene(&mut self, fields: SceneFields) -> Result<SceneId> {
        let id = self.state.add_scene(fields)?;
        self.commit();
        Ok(id)
    }

    pub fn update_scene(&mut self, id: SceneId, fields: SceneFields) -> bool {
        let found = self.state.update_scene(id, fields);
        if found {
            self.commit();
        }
        found
    }

    pub fn delete_scene(&mut self, id: SceneId) -> bool {
        let found = self.state.delete_scene(id);
        if found {
            self.clamp_page();
            self.commit();
        }
        found
    }

    // =============================================
    // フィルタとページ
    // =============================================

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.page = 1;
        self.notify(ProjectEvent::Changed);
    }

    pub fn reset_filter(&mut self) {
        self.set_filter(Filter::all());
    }

    fn total_pages(&self) -> usize {
        let len = self.state.active_sequence().map(|s| s.scenes.len()).unwrap_or(0);
        len.div_ceil(self.scenes_per_page).max(1)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn set_page(&mut self, page: usize) {
        let before = self.page;
        self.page = page;
        self.clamp_page();
        if self.page != before {
            self.notify(ProjectEvent::Changed);
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    // =============================================
    // プロジェクト全体
    // =============================================

    /// 空のプロジェクトに戻し、保存データと控えを削除する
    pub fn clear(&mut self) -> Result<()> {
        self.state.clear();
        self.filter = Filter::all();
        self.page = 1;
        self.notify(ProjectEvent::Changed);
        self.store.clear()?;
        log::info!("プロジェクトをクリアしました");
        Ok(())
    }

    /// 保存領域から読み直す
    pub fn reload(&mut self) -> StartupState {
        let startup = self.load_from_store();
        self.notify(ProjectEvent::Changed);
        startup
    }

    /// 壊れた保存データを破棄して空から始める
    pub fn discard_stored_data(&mut self) -> Result<()> {
        self.clear()
    }

    /// 控えから復元する
    pub fn restore_backup(&mut self) -> Result<()> {
        let state = self.store.restore_backup()?;
        self.replace_state(state);
        self.notify(ProjectEvent::Changed);
        Ok(())
    }

    /// プロジェクトファイルを読み込んで置き換える
    ///
    /// 形式が不正なら現在の状態は変更しない。
    pub fn import_project_file(&mut self, text: &str) -> Result<()> {
        let state = parse_project_file(text).map_err(|e| {
            log::warn!("プロジェクトファイルを読み込めません: {}", e);
            ToshootError::from(e)
        })?;
        self.replace_state(state);
        log::info!("プロジェクトファイルを読み込みました");
        self.commit();
        Ok(())
    }

    /// プロジェクトファイルの内容
    pub fn project_file_json(&self) -> Result<String> {
        Ok(project_file_json(&self.state)?)
    }
}
