pub mod chromium_page;
pub mod js_executor;
pub mod page;
pub mod scripted_page;

pub use chromium_page::ChromiumPage;
pub use js_executor::JsExecutor;
pub use page::{is_upload_disabled, ControlState, PageProbe, RemoteSession};
pub use scripted_page::{CallLog, Faults, Frame, ScriptedPage};
