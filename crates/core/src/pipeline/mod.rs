pub mod infrastructure;
pub mod overlay_executor;
pub mod overlay_logger;
pub mod overlay_video_use_case;
