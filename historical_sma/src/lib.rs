//! Historical-window resolution and simple-moving-average aggregation.
//!
//! Given "N bars of this size ending at this instant", this crate computes
//! what a bulk historical-data request must look like - the exact start
//! instant of the window, counting only time the exchange actually trades,
//! and the coarse duration descriptor the upstream source accepts - and then
//! reduces the delivered bars to a single SMA value.
//!
//! The two core boundary functions are:
//! - [`plan_request`]: end-instant normalization → bar-size parsing →
//!   window resolution, bundled as a [`HistoricalRequest`] with the exact
//!   wire strings the external data-request collaborator forwards upstream.
//! - [`aggregate`]: strict sufficiency check plus arithmetic mean over the
//!   newest `count` bars of a finalized batch.
//!
//! Everything in between is pure and synchronous. The broker connection,
//! request-ID bookkeeping, and asynchronous bar delivery live with the
//! collaborator; this crate is handed one immutable batch of [`Bar`]s once
//! delivery has completed.

pub mod aggregate;
pub mod endtime;
pub mod errors;
pub mod models;
pub mod request;
pub mod window;

pub use aggregate::{InsufficientDataError, aggregate};
pub use endtime::{EndTime, EndTimeError, ResolvedEnd};
pub use errors::Error;
pub use models::bar::{Bar, BarField, UnknownFieldError};
pub use models::barsize::{BarSize, BarSizeError, BarUnit};
pub use models::duration::{DurationDescriptor, DurationUnit};
pub use request::{HistoricalRequest, plan_request, plan_request_at};
pub use window::{RequestWindow, WindowError, resolve};
