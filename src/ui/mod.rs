/// User interface
///
/// - Entry view: image selection and extraction parameters (entry.rs)
/// - Loading overlay shown while a request is in flight (loading.rs)
/// - Results view: swatches and markers over the image (results.rs, overlay.rs, palette_bar.rs)

pub mod entry;
pub mod loading;
pub mod overlay;
pub mod palette_bar;
pub mod results;
