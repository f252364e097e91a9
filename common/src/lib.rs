//! ToshooT Common Library
//!
//! 撮影スケジュールのプロジェクトモデル・フィルタ・並べ替え・エクスポート用データセット

pub mod error;
pub mod ids;
pub mod scene;
pub mod panel;
pub mod project;
pub mod reorder;
pub mod filter;
pub mod normalize;
pub mod format;
pub mod export;

pub use error::{Error, Result, ValidationError};
pub use ids::{IdGenerator, ItemId, SceneId};
pub use scene::{DayNight, SceneFields, SceneRecord, SceneStatus, SceneType};
pub use panel::{PanelItem, ScheduleBreak, Sequence, UNCATEGORIZED};
pub use project::{ProjectInfo, ProjectState};
pub use reorder::{reorder, Reorderable};
pub use filter::{distinct_values, filter_global, filter_scoped, paginate, Filter, FilterField, FilterGroup, Page};
pub use normalize::{normalize, parse_project_file, parse_stored_blob, project_file_json};
