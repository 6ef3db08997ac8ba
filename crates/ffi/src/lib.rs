//! C ABI for the snow surface energy balance
//!
//! Callers register static rasters once through [`snowflux_datasets_new`], then call
//! [`snowflux_evaluate`] per time step with caller-owned input and output arrays.
//! Every function returns a [`SnowFluxErrorCode`]; details of the last failure on the
//! calling thread are available from [`snowflux_get_last_error`].

mod datasets;
mod error;
mod evaluate;
mod helpers;

pub use datasets::{
    snowflux_datasets_destroy, snowflux_datasets_new, snowflux_datasets_preload, SnowFluxDatasets,
    SnowFluxRaster,
};
pub use error::{snowflux_get_last_error, snowflux_get_last_error_code, SnowFluxErrorCode};
pub use evaluate::{snowflux_evaluate, snowflux_relative_humidity, SnowFluxInput, SnowFluxOutput};
