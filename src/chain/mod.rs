// SPDX-License-Identifier: MIT

pub mod config;
pub mod session;
pub mod workflow;
