pub mod overlay_renderer;
