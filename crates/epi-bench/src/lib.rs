// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

// Benchmark-only crate; see benches/.
