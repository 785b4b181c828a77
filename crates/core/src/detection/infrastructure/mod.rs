pub mod sidecar_detector;
