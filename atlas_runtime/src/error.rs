// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use atlas_grid::GridError;
use atlas_host::LoadError;
use atlas_pool::PoolError;
use atlas_world::{ObjectId, WorldError};
use thiserror::Error;

/// Errors returned synchronously by [`Runtime`](crate::Runtime).
///
/// Asynchronous load failures are stored on the image or tile they belong
/// to, not returned here.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuntimeError {
    /// Tree edit failed.
    #[error(transparent)]
    World(#[from] WorldError),
    /// A cache could not be built or pinned.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// A tile pyramid was malformed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A load failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The object is not a tiled image managed by this runtime.
    #[error("object {0:?} is not a tiled image")]
    NotAnImage(ObjectId),
}
