pub mod threaded_overlay_executor;
