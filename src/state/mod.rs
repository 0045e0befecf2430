/// State management module
///
/// This module holds the client-side pipeline, leaf first:
/// - Selected image and its preview lifecycle (asset.rs, preview.rs)
/// - User-tunable parameters (params.rs)
/// - Request snapshot and wire fields (request.rs)
/// - Service response shapes (result.rs)
/// - Single-flight submission lifecycle (submission.rs)
/// - Hand-off to the results view (carrier.rs)

pub mod asset;
pub mod carrier;
pub mod params;
pub mod preview;
pub mod request;
pub mod result;
pub mod submission;
