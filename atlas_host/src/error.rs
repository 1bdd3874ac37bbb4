// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Why a load did not produce a resource.
///
/// Stored on the host that issued the load; never returned into the frame
/// loop. An aborted load is not an error (see
/// [`LoadOutcome::Aborted`](crate::LoadOutcome::Aborted)).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The loader rejected the request.
    #[error("load failed: {0}")]
    Failed(String),
    /// The image resolver could not describe the image.
    #[error("resolver error: {0}")]
    Resolver(String),
    /// Bytes arrived but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}
