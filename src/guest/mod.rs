// SPDX-License-Identifier: Apache-2.0

//! Guest-side thunks.
//!
//! Guest-facing registry wrappers funnel into [`Handler`]: one provided
//! method per wrapped call, which packs the arguments into the call's record,
//! forwards the record through the transport seam and unpacks the results.
//! The only guest memory the thunks touch themselves are the out-pointers the
//! wrapped interfaces return handles through, behind [`Platform`].

mod handler;
mod platform;

pub use handler::Handler;
pub use platform::Platform;
