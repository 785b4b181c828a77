pub mod box_label_renderer;
