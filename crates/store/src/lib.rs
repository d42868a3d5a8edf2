// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! s3io-store: object store adapters for publishing run artifacts

mod error;
mod fs;
mod http;
mod router;
mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

pub use error::StoreError;
pub use fs::{escape_key, FsStore};
pub use http::HttpStore;
pub use router::StoreRouter;
pub use store::{ObjectReader, ObjectStore};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, PutCall, StoredObject, FAKE_ENDPOINT};
